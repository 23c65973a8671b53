use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{CHEF_REWARD_VAULT_SEED, POOL_VAULT_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::SecondaryInitialized;
use crate::state::{Chef, Emission, UserInfo};
use crate::transfers;

#[derive(Accounts)]
#[instruction(master_pid: u32)]
pub struct InitSecondary<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized
    )]
    pub chef: Box<Account<'info, Chef>>,

    #[account(
        mut,
        constraint = master_chef.key() != chef.key() @ FarmError::InvalidEmissionMode
    )]
    pub master_chef: Box<Account<'info, Chef>>,

    /// The secondary chef's stake in the master pool
    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + UserInfo::INIT_SPACE,
        seeds = [USER_INFO_SEED, master_chef.key().as_ref(), &master_pid.to_le_bytes(), chef.key().as_ref()],
        bump
    )]
    pub sentinel: Box<Account<'info, UserInfo>>,

    /// Deposit token of the master pool, typically a dummy mint
    pub sentinel_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [POOL_VAULT_SEED, master_chef.key().as_ref(), &master_pid.to_le_bytes()],
        bump
    )]
    pub master_pool_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = sentinel_mint,
        token::authority = authority
    )]
    pub authority_sentinel_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = chef.reward_mint @ FarmError::InvalidMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Refilled by `harvest_from_master`, pays this chef's users
    #[account(
        init_if_needed,
        payer = authority,
        seeds = [CHEF_REWARD_VAULT_SEED, chef.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = chef,
        token::token_program = reward_token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub reward_token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Turns `chef` into a headless scheduler funded by `master_pid` of
/// `master_chef`. A chef converts only once.
pub fn handler(ctx: Context<InitSecondary>, master_pid: u32, amount: u64) -> Result<()> {
    let now = clock::now_slot()?;
    let chef_key = ctx.accounts.chef.key();
    let master_key = ctx.accounts.master_chef.key();

    // once per chef, whichever master or sentinel is passed
    require!(
        ctx.accounts.chef.emission == Emission::Minted,
        FarmError::AlreadyInitialized
    );
    require!(
        ctx.accounts.sentinel.position.amount == 0,
        FarmError::AlreadyInitialized
    );
    require!(amount > 0, FarmError::ZeroAmount);
    require_keys_eq!(
        ctx.accounts.master_chef.reward_mint,
        ctx.accounts.chef.reward_mint,
        FarmError::InvalidMint
    );

    let pool = ctx.accounts.master_chef.pool(master_pid)?.clone();
    require_keys_eq!(pool.deposit_mint, ctx.accounts.sentinel_mint.key(), FarmError::InvalidMint);
    // the sentinel has nobody to forward overlay notifications for
    require!(pool.rewarder.is_none(), FarmError::InvalidRewarder);

    let received = transfers::transfer_in(
        &ctx.accounts.token_program,
        &ctx.accounts.sentinel_mint,
        &ctx.accounts.authority_sentinel_account,
        &mut ctx.accounts.master_pool_vault,
        &ctx.accounts.authority,
        amount,
    )?;
    require!(received > 0, FarmError::ZeroAmount);

    let sentinel = &mut ctx.accounts.sentinel;
    if !sentinel.is_initialized() {
        sentinel.chef = master_key;
        sentinel.pid = master_pid;
        sentinel.owner = chef_key;
        sentinel.bump = ctx.bumps.sentinel;
    }

    // An empty position has nothing to pay out
    let master = &mut ctx.accounts.master_chef;
    master.deposit(master_pid, &mut sentinel.position, received, now)?;
    sentinel.last_action_slot = now;
    let reward_per_block = master.pool_reward_per_block(master_pid)?;

    let chef = &mut ctx.accounts.chef;
    chef.become_secondary(master_key, master_pid, ctx.accounts.reward_vault.key(), reward_per_block, now)?;

    emit!(SecondaryInitialized {
        chef: chef_key,
        master_chef: master_key,
        master_pid,
        sentinel_amount: received,
        reward_per_block,
        timestamp: clock::timestamp()?,
    });

    msg!("Chef {} now draws from pool {} of {}", chef_key, master_pid, master_key);
    msg!("Sentinel stake: {}, reward per block: {}", received, reward_per_block);

    Ok(())
}
