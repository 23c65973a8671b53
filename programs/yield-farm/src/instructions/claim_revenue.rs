use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{VESTING_POSITION_SEED, VESTING_VAULT_SEED};
use crate::errors::FarmError;
use crate::events::RevenueClaimed;
use crate::state::{VestingPosition, VestingVault};
use crate::transfers;

#[derive(Accounts)]
pub struct ClaimRevenue<'info> {
    #[account(
        mut,
        seeds = [
            VESTING_VAULT_SEED,
            vault.principal_mint.as_ref(),
            vault.revenue_mint.as_ref(),
            &vault.vault_id.to_le_bytes()
        ],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, VestingVault>>,

    #[account(
        mut,
        seeds = [VESTING_POSITION_SEED, vault.key().as_ref(), position.owner.as_ref()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, VestingPosition>>,

    #[account(address = vault.revenue_mint @ FarmError::InvalidMint)]
    pub revenue_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = vault.revenue_vault @ FarmError::RewardAccountMismatch)]
    pub revenue_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Must belong to the holder; a third-party caller cannot redirect funds
    #[account(
        mut,
        token::mint = revenue_mint,
        token::authority = position.owner
    )]
    pub holder_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub caller: Signer<'info>,

    pub revenue_token_program: Interface<'info, TokenInterface>,
}

/// Pays a holder's unlocked revenue. Anyone may trigger it.
pub fn handler(ctx: Context<ClaimRevenue>) -> Result<()> {
    let now = clock::now_unix()?;

    let vault = &mut ctx.accounts.vault;
    let position = &mut ctx.accounts.position;
    let paid = vault.claim(position, ctx.accounts.revenue_vault.amount, now)?;

    let vault = &ctx.accounts.vault;
    let vault_id = vault.vault_id.to_le_bytes();
    let seeds: &[&[u8]] = &[
        VESTING_VAULT_SEED,
        vault.principal_mint.as_ref(),
        vault.revenue_mint.as_ref(),
        &vault_id,
        &[vault.bump],
    ];
    transfers::transfer_signed(
        &ctx.accounts.revenue_token_program,
        &ctx.accounts.revenue_mint,
        &ctx.accounts.revenue_vault,
        &ctx.accounts.holder_token_account,
        vault.to_account_info(),
        &[seeds],
        paid,
    )?;

    emit!(RevenueClaimed {
        vault: vault.key(),
        owner: position.owner,
        caller: ctx.accounts.caller.key(),
        amount: paid,
        total_claimable: vault.total_claimable,
        timestamp: clock::timestamp()?,
    });

    msg!("Paid {} revenue to {}", paid, position.owner);

    Ok(())
}
