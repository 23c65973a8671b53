use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{CHEF_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::Harvested;
use crate::state::{Chef, OverlayHook, OverlayUser, RewardHook, Rewarder, UserInfo};
use crate::transfers;

#[derive(Accounts)]
#[instruction(pid: u32)]
pub struct Harvest<'info> {
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

    pub reward_token_program: Interface<'info, TokenInterface>,
}

/// Pays pending reward without touching the stake. Nothing pending is a
/// valid no-op.
pub fn handler(ctx: Context<Harvest>, pid: u32) -> Result<()> {
    let now = clock::now_slot()?;
    let now_unix = clock::now_unix()?;
    let owner = ctx.accounts.owner.key();
    let pool = ctx.accounts.chef.pool(pid)?.clone();

    let user_info = &mut ctx.accounts.user_info;
    let chef = &mut ctx.accounts.chef;
    let stake_before = user_info.position.amount;
    let payout = chef.harvest(pid, &mut user_info.position, now)?;
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
    overlay.on_reward(user_amount, now_unix)?;

    transfers::pay_chef_reward(
        &ctx.accounts.chef,
        &ctx.accounts.reward_token_program,
        &ctx.accounts.reward_mint,
        ctx.accounts.chef_reward_vault.as_deref(),
        &ctx.accounts.recipient_reward_account,
        payout,
    )?;

    emit!(Harvested {
        chef: ctx.accounts.chef.key(),
        pid,
        owner,
        amount: payout,
        acc_reward_per_share: acc.acc_reward_per_share,
        timestamp: clock::timestamp()?,
    });

    msg!("Harvested {} from pool {}", payout, pid);

    Ok(())
}
