use anchor_lang::prelude::*;

use crate::clock;
use crate::constants::REWARDER_SEED;
use crate::events::RewarderCreated;
use crate::state::{Chef, Rewarder};

#[derive(Accounts)]
#[instruction(pid: u32, nonce: u64)]
pub struct CreateRewarder<'info> {
    pub chef: Box<Account<'info, Chef>>,

    #[account(
        init,
        payer = authority,
        space = 8 + Rewarder::INIT_SPACE,
        seeds = [REWARDER_SEED, chef.key().as_ref(), &pid.to_le_bytes(), &nonce.to_le_bytes()],
        bump
    )]
    pub rewarder: Box<Account<'info, Rewarder>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Creates an overlay for `pid`. It only receives notifications once the
/// chef authority attaches it with `add_pool` or `set_pool`.
pub fn handler(ctx: Context<CreateRewarder>, pid: u32, nonce: u64) -> Result<()> {
    let rewarder = &mut ctx.accounts.rewarder;
    rewarder.chef = ctx.accounts.chef.key();
    rewarder.pid = pid;
    rewarder.authority = ctx.accounts.authority.key();
    rewarder.nonce = nonce;
    rewarder.total_shares = 0;
    rewarder.streams = Vec::new();
    rewarder.bump = ctx.bumps.rewarder;

    emit!(RewarderCreated {
        rewarder: rewarder.key(),
        chef: rewarder.chef,
        pid,
        authority: rewarder.authority,
        timestamp: clock::timestamp()?,
    });

    msg!("Created rewarder {} for pool {}", rewarder.key(), pid);

    Ok(())
}
