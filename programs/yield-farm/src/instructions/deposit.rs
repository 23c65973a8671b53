use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{CHEF_SEED, POOL_VAULT_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::Deposited;
use crate::state::{Chef, OverlayHook, OverlayUser, RewardHook, Rewarder, UserInfo};
use crate::transfers;

#[derive(Accounts)]
#[instruction(pid: u32)]
pub struct Deposit<'info> {
    #[account(
        mut,
        seeds = [CHEF_SEED, chef.authority.as_ref(), &chef.chef_id.to_le_bytes()],
        bump = chef.bump
    )]
    pub chef: Box<Account<'info, Chef>>,

    /// Stake is credited to `recipient`, created on first deposit
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + UserInfo::INIT_SPACE,
        seeds = [USER_INFO_SEED, chef.key().as_ref(), &pid.to_le_bytes(), recipient.key().as_ref()],
        bump
    )]
    pub user_info: Box<Account<'info, UserInfo>>,

    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [POOL_VAULT_SEED, chef.key().as_ref(), &pid.to_le_bytes()],
        bump
    )]
    pub pool_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = deposit_mint,
        token::authority = depositor
    )]
    pub depositor_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = chef.reward_mint @ FarmError::InvalidMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives reward released by this deposit
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = recipient
    )]
    pub recipient_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Required when the chef pays from a delegated reward vault
    #[account(mut)]
    pub chef_reward_vault: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    /// Required when the pool has an overlay
    #[account(mut)]
    pub rewarder: Option<Box<Account<'info, Rewarder>>>,

    #[account(mut)]
    pub overlay_user: Option<Box<Account<'info, OverlayUser>>>,

    /// CHECK: only its key is used, as owner of the credited stake
    pub recipient: UncheckedAccount<'info>,

    #[account(mut)]
    pub depositor: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub reward_token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, pid: u32, amount: u64) -> Result<()> {
    let now = clock::now_slot()?;
    let now_unix = clock::now_unix()?;
    let chef_key = ctx.accounts.chef.key();
    let recipient = ctx.accounts.recipient.key();

    let pool = ctx.accounts.chef.pool(pid)?.clone();
    require_keys_eq!(pool.deposit_mint, ctx.accounts.deposit_mint.key(), FarmError::InvalidMint);

    // Book what the vault actually received, not what was requested
    let received = if amount > 0 {
        transfers::transfer_in(
            &ctx.accounts.token_program,
            &ctx.accounts.deposit_mint,
            &ctx.accounts.depositor_token_account,
            &mut ctx.accounts.pool_vault,
            &ctx.accounts.depositor,
            amount,
        )?
    } else {
        0
    };

    let user_info = &mut ctx.accounts.user_info;
    if !user_info.is_initialized() {
        user_info.chef = chef_key;
        user_info.pid = pid;
        user_info.owner = recipient;
        user_info.bump = ctx.bumps.user_info;
    }

    let chef = &mut ctx.accounts.chef;
    let stake_before = user_info.position.amount;
    let payout = chef.deposit(pid, &mut user_info.position, received, now)?;
    chef.record_paid(payout);
    user_info.last_action_slot = now;
    let user_amount = user_info.position.amount;
    let acc = chef.pool(pid)?.accumulator;

    let mut overlay = OverlayHook::resolve(
        &pool,
        recipient,
        stake_before,
        now_unix,
        ctx.accounts.rewarder.as_deref_mut(),
        ctx.accounts.overlay_user.as_deref_mut(),
    )?;
    overlay.on_deposit(user_amount, now_unix)?;

    transfers::pay_chef_reward(
        &ctx.accounts.chef,
        &ctx.accounts.reward_token_program,
        &ctx.accounts.reward_mint,
        ctx.accounts.chef_reward_vault.as_deref(),
        &ctx.accounts.recipient_reward_account,
        payout,
    )?;

    emit!(Deposited {
        chef: chef_key,
        pid,
        depositor: ctx.accounts.depositor.key(),
        recipient,
        amount: received,
        reward_paid: payout,
        user_amount,
        pool_total_shares: acc.total_shares,
        acc_reward_per_share: acc.acc_reward_per_share,
        timestamp: clock::timestamp()?,
    });

    msg!("Deposited {} into pool {} (requested {})", received, pid, amount);
    msg!("User stake: {}, reward paid: {}", user_amount, payout);

    Ok(())
}
