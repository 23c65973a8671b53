use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::FEE_VAULT_POSITION_SEED;
use crate::errors::FarmError;
use crate::events::VaultDeposited;
use crate::math::sub_u64;
use crate::state::{FeeVault, VaultPosition};
use crate::transfers;

#[derive(Accounts)]
pub struct VaultDeposit<'info> {
    #[account(mut)]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + VaultPosition::INIT_SPACE,
        seeds = [FEE_VAULT_POSITION_SEED, fee_vault.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, VaultPosition>>,

    #[account(address = fee_vault.deposit_mint @ FarmError::InvalidMint)]
    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = fee_vault.principal_vault @ FarmError::RewardAccountMismatch)]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = fee_vault.fee_collector @ FarmError::Unauthorized)]
    pub fee_collector: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = deposit_mint,
        token::authority = owner
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
    // remaining_accounts: every registered reward vault, in registration order
}

pub fn handler(ctx: Context<VaultDeposit>, amount: u64) -> Result<()> {
    require!(amount > 0, FarmError::ZeroAmount);

    let fee_vault = &mut ctx.accounts.fee_vault;
    let vaults: Vec<Pubkey> = fee_vault.reward_tokens.iter().map(|t| t.vault).collect();
    let balances = transfers::read_balances(&vaults, ctx.remaining_accounts)?;
    fee_vault.update_rewards(&balances)?;

    let fee = fee_vault.deposit_fee(amount)?;
    transfers::transfer_from_user(
        &ctx.accounts.token_program,
        &ctx.accounts.deposit_mint,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.fee_collector,
        &ctx.accounts.owner,
        fee,
    )?;
    let net_amount = transfers::transfer_in(
        &ctx.accounts.token_program,
        &ctx.accounts.deposit_mint,
        &ctx.accounts.owner_token_account,
        &mut ctx.accounts.principal_vault,
        &ctx.accounts.owner,
        sub_u64(amount, fee)?,
    )?;

    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.vault = ctx.accounts.fee_vault.key();
        position.owner = ctx.accounts.owner.key();
        position.bump = ctx.bumps.position;
    }

    let fee_vault = &mut ctx.accounts.fee_vault;
    let shares = fee_vault.deposit(position, net_amount)?;

    emit!(VaultDeposited {
        vault: fee_vault.key(),
        owner: position.owner,
        gross_amount: amount,
        fee,
        net_amount,
        shares,
        user_shares: position.shares,
        total_shares: fee_vault.total_shares,
        total_assets: fee_vault.total_assets,
        timestamp: clock::timestamp()?,
    });

    msg!("Deposited {} ({} fee) for {} shares", net_amount, fee, shares);
    msg!("Vault total shares: {}, assets: {}", fee_vault.total_shares, fee_vault.total_assets);

    Ok(())
}
