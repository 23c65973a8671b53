use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{VESTING_POSITION_SEED, VESTING_VAULT_SEED};
use crate::errors::FarmError;
use crate::events::PrincipalWithdrawn;
use crate::state::{VestingPosition, VestingVault};
use crate::transfers;

#[derive(Accounts)]
pub struct VestingWithdraw<'info> {
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
        seeds = [VESTING_POSITION_SEED, vault.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub position: Box<Account<'info, VestingPosition>>,

    #[account(address = vault.principal_mint @ FarmError::InvalidMint)]
    pub principal_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = vault.principal_vault @ FarmError::RewardAccountMismatch)]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = principal_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Redeems `shares` for principal. Revenue unlocked so far stays credited
/// to the holder.
pub fn handler(ctx: Context<VestingWithdraw>, shares: u64) -> Result<()> {
    require!(shares > 0, FarmError::ZeroAmount);
    let now = clock::now_unix()?;

    let vault = &mut ctx.accounts.vault;
    let position = &mut ctx.accounts.position;
    let amount = vault.withdraw(position, shares, now)?;

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
        &ctx.accounts.token_program,
        &ctx.accounts.principal_mint,
        &ctx.accounts.principal_vault,
        &ctx.accounts.recipient_token_account,
        vault.to_account_info(),
        &[seeds],
        amount,
    )?;

    emit!(PrincipalWithdrawn {
        vault: vault.key(),
        owner: position.owner,
        shares,
        amount,
        user_shares: position.shares(),
        total_shares: vault.total_shares(),
        total_assets: vault.total_assets,
        timestamp: clock::timestamp()?,
    });

    msg!("Withdrew {} principal for {} shares", amount, shares);

    Ok(())
}
