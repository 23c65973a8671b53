use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::USER_INFO_SEED;
use crate::errors::FarmError;
use crate::events::MasterHarvested;
use crate::state::{Chef, Emission, UserInfo};
use crate::transfers;

#[derive(Accounts)]
pub struct HarvestFromMaster<'info> {
    #[account(mut)]
    pub chef: Box<Account<'info, Chef>>,

    #[account(
        mut,
        constraint = master_chef.key() != chef.key() @ FarmError::InvalidEmissionMode
    )]
    pub master_chef: Box<Account<'info, Chef>>,

    #[account(
        mut,
        seeds = [USER_INFO_SEED, master_chef.key().as_ref(), &sentinel.pid.to_le_bytes(), chef.key().as_ref()],
        bump = sentinel.bump
    )]
    pub sentinel: Box<Account<'info, UserInfo>>,

    #[account(mut, address = master_chef.reward_mint @ FarmError::InvalidMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The secondary chef's reward vault
    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Required when the master itself pays from a delegated vault
    #[account(mut)]
    pub master_reward_vault: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub reward_token_program: Interface<'info, TokenInterface>,
}

/// Permissionless crank: collects the sentinel's reward from the master
/// into the secondary's reward vault and re-syncs the secondary's rate to
/// the master pool's current share of emission.
pub fn handler(ctx: Context<HarvestFromMaster>) -> Result<()> {
    let now = clock::now_slot()?;

    let (master_key, master_pid, reward_vault) = match ctx.accounts.chef.emission {
        Emission::Delegated {
            master_chef,
            master_pid,
            reward_vault,
        } => (master_chef, master_pid, reward_vault),
        Emission::Minted => return err!(FarmError::InvalidEmissionMode),
    };
    require_keys_eq!(ctx.accounts.master_chef.key(), master_key, FarmError::InvalidEmissionMode);
    require_keys_eq!(ctx.accounts.reward_vault.key(), reward_vault, FarmError::RewardAccountMismatch);
    require!(ctx.accounts.sentinel.pid == master_pid, FarmError::InvalidPoolReference);

    let sentinel = &mut ctx.accounts.sentinel;
    let master = &mut ctx.accounts.master_chef;
    let amount = master.harvest(master_pid, &mut sentinel.position, now)?;
    master.record_paid(amount);
    sentinel.last_action_slot = now;
    let reward_per_block = master.pool_reward_per_block(master_pid)?;

    let chef = &mut ctx.accounts.chef;
    let old_rate = chef.reward_per_block;
    chef.set_reward_per_block(reward_per_block, now)?;

    transfers::pay_chef_reward(
        &ctx.accounts.master_chef,
        &ctx.accounts.reward_token_program,
        &ctx.accounts.reward_mint,
        ctx.accounts.master_reward_vault.as_deref(),
        &ctx.accounts.reward_vault,
        amount,
    )?;

    emit!(MasterHarvested {
        chef: ctx.accounts.chef.key(),
        master_chef: master_key,
        master_pid,
        amount,
        reward_per_block,
        timestamp: clock::timestamp()?,
    });

    msg!("Harvested {} from master pool {}", amount, master_pid);
    if old_rate != reward_per_block {
        msg!("Reward per block: {} -> {}", old_rate, reward_per_block);
    }

    Ok(())
}
