use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{CHEF_SEED, POOL_VAULT_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::Withdrawn;
use crate::state::{Chef, OverlayHook, OverlayUser, RewardHook, Rewarder, UserInfo};
use crate::transfers;

#[derive(Accounts)]
#[instruction(pid: u32)]
pub struct Withdraw<'info> {
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

    /// Receives the withdrawn stake
    #[account(mut, token::mint = deposit_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = chef.reward_mint @ FarmError::InvalidMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, token::mint = reward_mint)]
    pub recipient_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub chef_reward_vault: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    #[account(mut)]
    pub rewarder: Option<Box<Account<'info, Rewarder>>>,

    #[account(mut)]
    pub overlay_user: Option<Box<Account<'info, OverlayUser>>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub reward_token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Withdraw>, pid: u32, amount: u64) -> Result<()> {
    let now = clock::now_slot()?;
    let now_unix = clock::now_unix()?;
    let owner = ctx.accounts.owner.key();

    let pool = ctx.accounts.chef.pool(pid)?.clone();
    require_keys_eq!(pool.deposit_mint, ctx.accounts.deposit_mint.key(), FarmError::InvalidMint);

    let user_info = &mut ctx.accounts.user_info;
    let chef = &mut ctx.accounts.chef;
    let stake_before = user_info.position.amount;
    let payout = chef.withdraw(pid, &mut user_info.position, amount, now)?;
    chef.record_paid(payout);
    user_info.last_action_slot = now;
    let user_amount = user_info.position.amount;
    let acc = chef.pool(pid)?.accumulator;

    let mut overlay = OverlayHook::resolve(
        &pool,
        owner,
        stake_before,
        now_unix,
        ctx.accounts.rewarder.as_deref_mut(),
        ctx.accounts.overlay_user.as_deref_mut(),
    )?;
    overlay.on_withdraw(user_amount, now_unix)?;

    // Return stake, signed by the chef PDA
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

    transfers::pay_chef_reward(
        chef,
        &ctx.accounts.reward_token_program,
        &ctx.accounts.reward_mint,
        ctx.accounts.chef_reward_vault.as_deref(),
        &ctx.accounts.recipient_reward_account,
        payout,
    )?;

    emit!(Withdrawn {
        chef: chef.key(),
        pid,
        owner,
        amount,
        reward_paid: payout,
        user_amount,
        pool_total_shares: acc.total_shares,
        acc_reward_per_share: acc.acc_reward_per_share,
        timestamp: clock::timestamp()?,
    });

    msg!("Withdrew {} from pool {}", amount, pid);
    msg!("Remaining stake: {}, reward paid: {}", user_amount, payout);

    Ok(())
}
