use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::EmissionRateUpdated;
use crate::state::{Chef, Emission};

#[derive(Accounts)]
pub struct SetRewardPerBlock<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized,
        constraint = chef.emission == Emission::Minted @ FarmError::InvalidEmissionMode
    )]
    pub chef: Box<Account<'info, Chef>>,

    pub authority: Signer<'info>,
}

/// Delegated chefs take their rate from the master pool instead; see
/// `harvest_from_master`.
pub fn handler(ctx: Context<SetRewardPerBlock>, reward_per_block: u64) -> Result<()> {
    let now = clock::now_slot()?;
    let chef = &mut ctx.accounts.chef;
    let old = chef.reward_per_block;
    chef.set_reward_per_block(reward_per_block, now)?;

    emit!(EmissionRateUpdated {
        chef: chef.key(),
        old_reward_per_block: old,
        new_reward_per_block: reward_per_block,
        timestamp: clock::timestamp()?,
    });

    msg!("Reward per block: {} -> {}", old, reward_per_block);

    Ok(())
}
