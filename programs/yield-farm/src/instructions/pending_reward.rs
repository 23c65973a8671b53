use anchor_lang::prelude::*;

use crate::clock;
use crate::constants::USER_INFO_SEED;
use crate::state::{Chef, UserInfo};

#[derive(Accounts)]
#[instruction(pid: u32)]
pub struct PendingReward<'info> {
    pub chef: Box<Account<'info, Chef>>,

    #[account(
        seeds = [USER_INFO_SEED, chef.key().as_ref(), &pid.to_le_bytes(), user_info.owner.as_ref()],
        bump = user_info.bump
    )]
    pub user_info: Box<Account<'info, UserInfo>>,
}

pub fn handler(ctx: Context<PendingReward>, pid: u32) -> Result<u64> {
    let now = clock::now_slot()?;
    ctx.accounts
        .chef
        .pending_reward(pid, &ctx.accounts.user_info.position, now)
}
