use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::PoolUpdated;
use crate::state::{Chef, Rewarder};

#[derive(Accounts)]
pub struct SetPool<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized
    )]
    pub chef: Box<Account<'info, Chef>>,

    /// New overlay; omit together with `overwrite_rewarder` to detach
    pub rewarder: Option<Account<'info, Rewarder>>,

    pub authority: Signer<'info>,
}

pub fn handler(
    ctx: Context<SetPool>,
    pid: u32,
    alloc_point: u64,
    overwrite_rewarder: bool,
) -> Result<()> {
    let now = clock::now_slot()?;
    let chef_key = ctx.accounts.chef.key();

    let rewarder = match &ctx.accounts.rewarder {
        Some(rewarder) => {
            require_keys_eq!(rewarder.chef, chef_key, FarmError::InvalidRewarder);
            require!(rewarder.pid == pid, FarmError::InvalidRewarder);
            Some(rewarder.key())
        }
        None => None,
    };

    let chef = &mut ctx.accounts.chef;
    chef.set_pool(pid, alloc_point, rewarder, overwrite_rewarder, now)?;
    let pool = chef.pool(pid)?;

    emit!(PoolUpdated {
        chef: chef_key,
        pid,
        alloc_point,
        total_alloc_point: chef.total_alloc_point,
        rewarder: pool.rewarder,
        overwrite_rewarder,
        timestamp: clock::timestamp()?,
    });

    msg!("Pool {} alloc point set to {}", pid, alloc_point);

    Ok(())
}
