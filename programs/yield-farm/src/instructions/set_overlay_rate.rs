use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::OverlayRateUpdated;
use crate::state::Rewarder;

#[derive(Accounts)]
pub struct SetOverlayRate<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized
    )]
    pub rewarder: Box<Account<'info, Rewarder>>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<SetOverlayRate>, index: u8, reward_per_second: u64) -> Result<()> {
    let now = clock::now_unix()?;
    let rewarder = &mut ctx.accounts.rewarder;
    let old = rewarder.stream(index)?.reward_per_second;
    rewarder.set_rate(index, reward_per_second, now)?;
    let stream = rewarder.stream(index)?;

    emit!(OverlayRateUpdated {
        rewarder: rewarder.key(),
        index,
        old_reward_per_second: old,
        new_reward_per_second: reward_per_second,
        acc_reward_per_share: stream.accumulator.acc_reward_per_share,
        timestamp: clock::timestamp()?,
    });

    msg!("Overlay stream {} rate: {} -> {}", index, old, reward_per_second);

    Ok(())
}
