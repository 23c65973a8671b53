use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::state::{VestingPosition, VestingVault};

#[derive(Accounts)]
pub struct ClaimableRevenue<'info> {
    pub vault: Box<Account<'info, VestingVault>>,

    #[account(constraint = position.vault == vault.key() @ FarmError::Unauthorized)]
    pub position: Box<Account<'info, VestingPosition>>,
}

pub fn handler(ctx: Context<ClaimableRevenue>) -> Result<u64> {
    let now = clock::now_unix()?;
    ctx.accounts.vault.claimable(&ctx.accounts.position, now)
}
