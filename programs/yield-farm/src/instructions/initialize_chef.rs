use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::clock;
use crate::constants::CHEF_SEED;
use crate::events::ChefInitialized;
use crate::state::{Chef, Emission, HarvestPolicy};

#[derive(Accounts)]
#[instruction(chef_id: u64)]
pub struct InitializeChef<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + Chef::INIT_SPACE,
        seeds = [CHEF_SEED, authority.key().as_ref(), &chef_id.to_le_bytes()],
        bump
    )]
    pub chef: Box<Account<'info, Chef>>,

    /// Mint authority must be handed to the chef PDA before the first payout
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeChef>,
    chef_id: u64,
    reward_per_block: u64,
    start_slot: u64,
    harvest_policy: HarvestPolicy,
) -> Result<()> {
    let chef = &mut ctx.accounts.chef;

    chef.authority = ctx.accounts.authority.key();
    chef.chef_id = chef_id;
    chef.reward_mint = ctx.accounts.reward_mint.key();
    chef.emission = Emission::Minted;
    chef.harvest_policy = harvest_policy;
    chef.reward_per_block = reward_per_block;
    chef.total_alloc_point = 0;
    chef.start_slot = start_slot;
    chef.total_rewards_paid = 0;
    chef.pools = Vec::new();
    chef.bump = ctx.bumps.chef;

    emit!(ChefInitialized {
        chef: chef.key(),
        authority: chef.authority,
        reward_mint: chef.reward_mint,
        reward_per_block,
        start_slot,
        timestamp: clock::timestamp()?,
    });

    msg!("Initialized chef {} ({:?})", chef.key(), harvest_policy);
    msg!("Reward per block: {}, start slot: {}", reward_per_block, start_slot);

    Ok(())
}
