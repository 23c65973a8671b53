use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{FEE_VAULT_POSITION_SEED, FEE_VAULT_SEED};
use crate::errors::FarmError;
use crate::events::VaultRewardClaimed;
use crate::state::{FeeVault, VaultPosition};
use crate::transfers;

#[derive(Accounts)]
pub struct ClaimVaultReward<'info> {
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

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = reward_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Pays the holder's reward in one token, capped by the reward vault
/// balance; any remainder stays owed.
pub fn handler(ctx: Context<ClaimVaultReward>) -> Result<()> {
    let reward_mint = ctx.accounts.reward_mint.key();
    let available = ctx.accounts.reward_vault.amount;

    let fee_vault = &mut ctx.accounts.fee_vault;
    let index = fee_vault.token_index(reward_mint)?;
    require_keys_eq!(
        fee_vault.reward_tokens[index].vault,
        ctx.accounts.reward_vault.key(),
        FarmError::RewardAccountMismatch
    );

    let position = &mut ctx.accounts.position;
    fee_vault.update_reward(index, available)?;
    fee_vault.settle_position(position)?;
    let paid = fee_vault.claim(position, reward_mint, available)?;
    let remaining_unpaid = position.record(reward_mint).map(|r| r.unpaid).unwrap_or(0);

    let fee_vault = &ctx.accounts.fee_vault;
    let seeds: &[&[u8]] = &[
        FEE_VAULT_SEED,
        fee_vault.owner.as_ref(),
        fee_vault.deposit_mint.as_ref(),
        &[fee_vault.bump],
    ];
    transfers::transfer_signed(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.reward_vault,
        &ctx.accounts.recipient_token_account,
        fee_vault.to_account_info(),
        &[seeds],
        paid,
    )?;

    emit!(VaultRewardClaimed {
        vault: fee_vault.key(),
        owner: position.owner,
        reward_mint,
        amount: paid,
        remaining_unpaid,
        timestamp: clock::timestamp()?,
    });

    msg!("Claimed {} of {}, {} still owed", paid, reward_mint, remaining_unpaid);

    Ok(())
}
