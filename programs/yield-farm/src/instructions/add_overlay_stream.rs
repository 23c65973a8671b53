use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::OVERLAY_VAULT_SEED;
use crate::errors::FarmError;
use crate::events::OverlayStreamAdded;
use crate::state::Rewarder;

#[derive(Accounts)]
pub struct AddOverlayStream<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized
    )]
    pub rewarder: Box<Account<'info, Rewarder>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Funded by plain transfers; pays `claim_overlay`
    #[account(
        init,
        payer = authority,
        seeds = [OVERLAY_VAULT_SEED, rewarder.key().as_ref(), reward_mint.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = rewarder,
        token::token_program = token_program,
    )]
    pub stream_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddOverlayStream>, reward_per_second: u64) -> Result<()> {
    let now = clock::now_unix()?;
    let reward_mint = ctx.accounts.reward_mint.key();
    let rewarder = &mut ctx.accounts.rewarder;
    let index = rewarder.add_stream(
        reward_mint,
        ctx.accounts.stream_vault.key(),
        reward_per_second,
        now,
    )?;

    emit!(OverlayStreamAdded {
        rewarder: rewarder.key(),
        index,
        reward_mint,
        reward_per_second,
        timestamp: clock::timestamp()?,
    });

    msg!("Added overlay stream {} paying {} per second", index, reward_per_second);

    Ok(())
}
