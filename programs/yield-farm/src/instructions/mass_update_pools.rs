use anchor_lang::prelude::*;

use crate::clock;
use crate::events::PoolSettled;
use crate::state::Chef;

#[derive(Accounts)]
pub struct MassUpdatePools<'info> {
    #[account(mut)]
    pub chef: Box<Account<'info, Chef>>,
}

/// Permissionless. An out-of-range id fails the whole call.
pub fn handler(ctx: Context<MassUpdatePools>, pids: Vec<u32>) -> Result<()> {
    let now = clock::now_slot()?;
    let chef = &mut ctx.accounts.chef;
    chef.mass_update_pools(&pids, now)?;

    for &pid in &pids {
        let acc = chef.pool(pid)?.accumulator;
        emit!(PoolSettled {
            chef: chef.key(),
            pid,
            last_update_slot: acc.last_update,
            total_shares: acc.total_shares,
            acc_reward_per_share: acc.acc_reward_per_share,
        });
    }

    msg!("Settled {} pools at slot {}", pids.len(), now);

    Ok(())
}
