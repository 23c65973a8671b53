use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{VESTING_PRINCIPAL_SEED, VESTING_REVENUE_SEED, VESTING_VAULT_SEED};
use crate::events::VestingVaultInitialized;
use crate::state::VestingVault;

#[derive(Accounts)]
#[instruction(vault_id: u64)]
pub struct InitVestingVault<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + VestingVault::INIT_SPACE,
        seeds = [
            VESTING_VAULT_SEED,
            principal_mint.key().as_ref(),
            revenue_mint.key().as_ref(),
            &vault_id.to_le_bytes()
        ],
        bump
    )]
    pub vault: Box<Account<'info, VestingVault>>,

    pub principal_mint: Box<InterfaceAccount<'info, Mint>>,

    pub revenue_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = owner,
        seeds = [VESTING_PRINCIPAL_SEED, vault.key().as_ref()],
        bump,
        token::mint = principal_mint,
        token::authority = vault,
        token::token_program = token_program,
    )]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        seeds = [VESTING_REVENUE_SEED, vault.key().as_ref()],
        bump,
        token::mint = revenue_mint,
        token::authority = vault,
        token::token_program = revenue_token_program,
    )]
    pub revenue_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub revenue_token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitVestingVault>, vault_id: u64, vesting_updater: Pubkey) -> Result<()> {
    let now = clock::now_unix()?;
    let vault = &mut ctx.accounts.vault;
    vault.owner = ctx.accounts.owner.key();
    vault.pending_owner = None;
    vault.vesting_updater = vesting_updater;
    vault.vault_id = vault_id;
    vault.principal_mint = ctx.accounts.principal_mint.key();
    vault.principal_vault = ctx.accounts.principal_vault.key();
    vault.revenue_mint = ctx.accounts.revenue_mint.key();
    vault.revenue_vault = ctx.accounts.revenue_vault.key();
    vault.total_assets = 0;
    vault.issuance_rate = 0;
    vault.vesting_period_finish = now;
    vault.last_updated = now;
    vault.total_claimable = 0;
    vault.unvested = 0;
    vault.revenue = VestingVault::new_revenue_ledger(now);
    vault.staker_count = 0;
    vault.bump = ctx.bumps.vault;

    emit!(VestingVaultInitialized {
        vault: vault.key(),
        owner: vault.owner,
        vesting_updater,
        principal_mint: vault.principal_mint,
        revenue_mint: vault.revenue_mint,
        timestamp: clock::timestamp()?,
    });

    msg!("Vesting vault {} initialized", vault_id);
    msg!("Principal: {}, revenue: {}", vault.principal_mint, vault.revenue_mint);

    Ok(())
}
