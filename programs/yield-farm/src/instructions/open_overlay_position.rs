use anchor_lang::prelude::*;

use crate::constants::OVERLAY_USER_SEED;
use crate::state::{OverlayUser, Rewarder};

#[derive(Accounts)]
pub struct OpenOverlayPosition<'info> {
    pub rewarder: Box<Account<'info, Rewarder>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + OverlayUser::INIT_SPACE,
        seeds = [OVERLAY_USER_SEED, rewarder.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub overlay_user: Box<Account<'info, OverlayUser>>,

    /// CHECK: only its key is used
    pub owner: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Creates the record chef actions report to once the pool carries this
/// overlay. Idempotent. A stake that predates the record starts earning
/// from the owner's next chef action.
pub fn handler(ctx: Context<OpenOverlayPosition>) -> Result<()> {
    let overlay_user = &mut ctx.accounts.overlay_user;
    if overlay_user.rewarder == Pubkey::default() {
        overlay_user.rewarder = ctx.accounts.rewarder.key();
        overlay_user.owner = ctx.accounts.owner.key();
        overlay_user.bump = ctx.bumps.overlay_user;
        msg!("Opened overlay position for {}", overlay_user.owner);
    }

    Ok(())
}
