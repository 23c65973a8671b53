use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{FEE_VAULT_POSITION_SEED, FEE_VAULT_SEED};
use crate::errors::FarmError;
use crate::events::VaultWithdrawn;
use crate::state::{FeeVault, VaultPosition};
use crate::transfers;

#[derive(Accounts)]
pub struct VaultWithdraw<'info> {
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

    #[account(mut, token::mint = deposit_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub reward_token_program: Interface<'info, TokenInterface>,
    // remaining_accounts: [reward_vault, reward_mint, recipient] for every
    // registered reward token, in registration order
}

/// Burns `shares` for principal and pays out every reward token the position
/// has earned, capped by what each reward vault holds. Whatever is not paid
/// stays claimable. Zero shares only settles and pays rewards.
pub fn handler<'info>(ctx: Context<'_, '_, '_, 'info, VaultWithdraw<'info>>, shares: u64) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let legs = transfers::reward_legs(&fee_vault.reward_tokens, ctx.accounts.owner.key(), ctx.remaining_accounts)?;
    let balances: Vec<u64> = legs.iter().map(|leg| leg.balance).collect();
    fee_vault.update_rewards(&balances)?;

    let position = &mut ctx.accounts.position;
    let amount = fee_vault.withdraw(position, shares)?;

    let reward_program = ctx.accounts.reward_token_program.key();
    let available: Vec<u64> = legs.iter().map(|leg| leg.available(&reward_program)).collect();
    let rewards_paid = fee_vault.claim_all(position, &available)?;

    let fee_vault = &ctx.accounts.fee_vault;
    let seeds: &[&[u8]] = &[
        FEE_VAULT_SEED,
        fee_vault.owner.as_ref(),
        fee_vault.deposit_mint.as_ref(),
        &[fee_vault.bump],
    ];
    for (leg, paid) in legs.iter().zip(&rewards_paid) {
        transfers::pay_reward_leg(
            &ctx.accounts.reward_token_program,
            leg,
            fee_vault.to_account_info(),
            &[seeds],
            *paid,
        )?;
    }
    transfers::transfer_signed(
        &ctx.accounts.token_program,
        &ctx.accounts.deposit_mint,
        &ctx.accounts.principal_vault,
        &ctx.accounts.recipient_token_account,
        fee_vault.to_account_info(),
        &[seeds],
        amount,
    )?;

    emit!(VaultWithdrawn {
        vault: fee_vault.key(),
        owner: position.owner,
        shares,
        amount,
        rewards_paid,
        user_shares: position.shares,
        total_shares: fee_vault.total_shares,
        total_assets: fee_vault.total_assets,
        timestamp: clock::timestamp()?,
    });

    msg!("Withdrew {} for {} shares", amount, shares);

    Ok(())
}
