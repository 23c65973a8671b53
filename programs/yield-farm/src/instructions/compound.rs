use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{FEE_VAULT_POSITION_SEED, FEE_VAULT_SEED};
use crate::errors::FarmError;
use crate::events::VaultCompounded;
use crate::state::{FeeVault, VaultPosition};
use crate::transfers;

#[derive(Accounts)]
pub struct Compound<'info> {
    #[account(
        mut,
        seeds = [FEE_VAULT_SEED, fee_vault.owner.as_ref(), fee_vault.deposit_mint.as_ref()],
        bump = fee_vault.bump
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    #[account(
        mut,
        seeds = [FEE_VAULT_POSITION_SEED, fee_vault.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub position: Box<Account<'info, VaultPosition>>,

    #[account(address = fee_vault.deposit_mint @ FarmError::InvalidMint)]
    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = fee_vault.principal_vault @ FarmError::RewardAccountMismatch)]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Reward vault of the deposit token itself
    #[account(mut, token::mint = deposit_mint)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    // remaining_accounts: every registered reward vault, in registration order
}

/// Restakes the holder's reward in the deposit token as new shares. No
/// deposit fee is charged.
pub fn handler(ctx: Context<Compound>) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let index = fee_vault.token_index(fee_vault.deposit_mint)?;
    require_keys_eq!(
        fee_vault.reward_tokens[index].vault,
        ctx.accounts.reward_vault.key(),
        FarmError::RewardAccountMismatch
    );

    let vaults: Vec<Pubkey> = fee_vault.reward_tokens.iter().map(|t| t.vault).collect();
    let balances = transfers::read_balances(&vaults, ctx.remaining_accounts)?;
    fee_vault.update_rewards(&balances)?;

    let position = &mut ctx.accounts.position;
    let (amount, shares) = fee_vault.compound(position, ctx.accounts.reward_vault.amount)?;

    let fee_vault = &ctx.accounts.fee_vault;
    let seeds: &[&[u8]] = &[
        FEE_VAULT_SEED,
        fee_vault.owner.as_ref(),
        fee_vault.deposit_mint.as_ref(),
        &[fee_vault.bump],
    ];
    transfers::transfer_signed(
        &ctx.accounts.token_program,
        &ctx.accounts.deposit_mint,
        &ctx.accounts.reward_vault,
        &ctx.accounts.principal_vault,
        fee_vault.to_account_info(),
        &[seeds],
        amount,
    )?;

    emit!(VaultCompounded {
        vault: fee_vault.key(),
        owner: position.owner,
        amount,
        shares,
        user_shares: position.shares,
        timestamp: clock::timestamp()?,
    });

    msg!("Compounded {} into {} shares", amount, shares);

    Ok(())
}
