use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{FEE_VAULT_PRINCIPAL_SEED, FEE_VAULT_SEED};
use crate::events::FeeVaultInitialized;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct InitFeeVault<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + FeeVault::INIT_SPACE,
        seeds = [FEE_VAULT_SEED, owner.key().as_ref(), deposit_mint.key().as_ref()],
        bump
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = owner,
        seeds = [FEE_VAULT_PRINCIPAL_SEED, fee_vault.key().as_ref()],
        bump,
        token::mint = deposit_mint,
        token::authority = fee_vault,
        token::token_program = token_program,
    )]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(token::mint = deposit_mint)]
    pub fee_collector: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitFeeVault>, deposit_fee_bps: u16) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    fee_vault.owner = ctx.accounts.owner.key();
    fee_vault.deposit_mint = ctx.accounts.deposit_mint.key();
    fee_vault.principal_vault = ctx.accounts.principal_vault.key();
    fee_vault.fee_collector = ctx.accounts.fee_collector.key();
    fee_vault.set_deposit_fee(deposit_fee_bps)?;
    fee_vault.total_shares = 0;
    fee_vault.total_assets = 0;
    fee_vault.staker_count = 0;
    fee_vault.reward_tokens = Vec::new();
    fee_vault.bump = ctx.bumps.fee_vault;

    emit!(FeeVaultInitialized {
        vault: fee_vault.key(),
        owner: fee_vault.owner,
        deposit_mint: fee_vault.deposit_mint,
        fee_collector: fee_vault.fee_collector,
        deposit_fee_bps,
        timestamp: clock::timestamp()?,
    });

    msg!("Initialized fee vault {} with {} bps deposit fee", fee_vault.key(), deposit_fee_bps);

    Ok(())
}
