use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{CHEF_SEED, POOL_VAULT_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::EmergencyWithdrawn;
use crate::state::{Chef, OverlayHook, OverlayUser, RewardHook, Rewarder, UserInfo};
use crate::transfers;

#[derive(Accounts)]
#[instruction(pid: u32)]
pub struct EmergencyWithdraw<'info> {
    #[account(
        mut,
        seeds = [CHEF_SEED, chef.authority.as_ref(), &chef.chef_id.to_le_bytes()],
        bump = chef.bump
    )]
    pub chef: Box<Account<'info, Chef>>,

    #[account(
        mut,
        seeds = [USER_INFO_SEED, chef.key().as_ref(), &pid.to_le_bytes(), owner.key().as_ref()],
        bump = user_info.bump,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub user_info: Box<Account<'info, UserInfo>>,

    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [POOL_VAULT_SEED, chef.key().as_ref(), &pid.to_le_bytes()],
        bump
    )]
    pub pool_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = deposit_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pass these when the pool has an overlay so it drops the position now;
    /// otherwise the record is reconciled at its next use
    #[account(mut)]
    pub rewarder: Option<Box<Account<'info, Rewarder>>>,

    #[account(mut)]
    pub overlay_user: Option<Box<Account<'info, OverlayUser>>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Returns the whole stake and forfeits pending reward. Reward accounting
/// can not make this fail.
pub fn handler(ctx: Context<EmergencyWithdraw>, pid: u32) -> Result<()> {
    let now = clock::now_slot()?;
    let now_unix = clock::now_unix()?;
    let owner = ctx.accounts.owner.key();

    let pool = ctx.accounts.chef.pool(pid)?.clone();
    require_keys_eq!(pool.deposit_mint, ctx.accounts.deposit_mint.key(), FarmError::InvalidMint);

    let user_info = &mut ctx.accounts.user_info;
    let chef = &mut ctx.accounts.chef;
    let amount = chef.emergency_withdraw(pid, &mut user_info.position, now)?;
    user_info.last_action_slot = now;
    let pool_total_shares = chef.pool(pid)?.accumulator.total_shares;

    // Missing or wrong overlay accounts never block the exit
    let mut overlay = OverlayHook::resolve_for_exit(
        &pool,
        owner,
        ctx.accounts.rewarder.as_deref_mut(),
        ctx.accounts.overlay_user.as_deref_mut(),
    );
    overlay.on_emergency_exit(now_unix);

    let chef = &ctx.accounts.chef;
    let chef_id = chef.chef_id.to_le_bytes();
    let seeds: &[&[u8]] = &[CHEF_SEED, chef.authority.as_ref(), &chef_id, &[chef.bump]];
    transfers::transfer_signed(
        &ctx.accounts.token_program,
        &ctx.accounts.deposit_mint,
        &ctx.accounts.pool_vault,
        &ctx.accounts.recipient_token_account,
        chef.to_account_info(),
        &[seeds],
        amount,
    )?;

    emit!(EmergencyWithdrawn {
        chef: chef.key(),
        pid,
        owner,
        amount,
        pool_total_shares,
        timestamp: clock::timestamp()?,
    });

    msg!("Emergency withdrew {} from pool {}, pending reward forfeited", amount, pid);

    Ok(())
}
