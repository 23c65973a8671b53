use anchor_lang::prelude::*;

use crate::clock;
use crate::constants::{OVERLAY_USER_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::state::{Chef, OverlayUser, Rewarder, UserInfo};

#[derive(Accounts)]
pub struct PendingOverlay<'info> {
    #[account(address = rewarder.chef @ FarmError::InvalidRewarder)]
    pub chef: Box<Account<'info, Chef>>,

    pub rewarder: Box<Account<'info, Rewarder>>,

    #[account(
        seeds = [OVERLAY_USER_SEED, rewarder.key().as_ref(), overlay_user.owner.as_ref()],
        bump = overlay_user.bump
    )]
    pub overlay_user: Box<Account<'info, OverlayUser>>,

    #[account(
        seeds = [USER_INFO_SEED, chef.key().as_ref(), &rewarder.pid.to_le_bytes(), overlay_user.owner.as_ref()],
        bump = user_info.bump
    )]
    pub user_info: Option<Box<Account<'info, UserInfo>>>,
}

pub fn handler(ctx: Context<PendingOverlay>, index: u8) -> Result<u64> {
    let now = clock::now_unix()?;
    let rewarder = &ctx.accounts.rewarder;
    let attached = ctx.accounts.chef.pool(rewarder.pid)?.rewarder == Some(rewarder.key());
    let stake = ctx
        .accounts
        .user_info
        .as_ref()
        .map_or(0, |info| info.position.amount);
    rewarder.claimable(&ctx.accounts.overlay_user, index, attached, stake, now)
}
