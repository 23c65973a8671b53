use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::{OVERLAY_USER_SEED, REWARDER_SEED, USER_INFO_SEED};
use crate::errors::FarmError;
use crate::events::OverlayClaimed;
use crate::state::{Chef, OverlayUser, Rewarder, UserInfo};
use crate::transfers;

#[derive(Accounts)]
pub struct ClaimOverlay<'info> {
    #[account(address = rewarder.chef @ FarmError::InvalidRewarder)]
    pub chef: Box<Account<'info, Chef>>,

    /// The owner's stake in the rewarder's pool; omitted when there is none
    #[account(
        seeds = [USER_INFO_SEED, chef.key().as_ref(), &rewarder.pid.to_le_bytes(), owner.key().as_ref()],
        bump = user_info.bump
    )]
    pub user_info: Option<Box<Account<'info, UserInfo>>>,

    #[account(
        mut,
        seeds = [REWARDER_SEED, rewarder.chef.as_ref(), &rewarder.pid.to_le_bytes(), &rewarder.nonce.to_le_bytes()],
        bump = rewarder.bump
    )]
    pub rewarder: Box<Account<'info, Rewarder>>,

    #[account(
        mut,
        seeds = [OVERLAY_USER_SEED, rewarder.key().as_ref(), owner.key().as_ref()],
        bump = overlay_user.bump,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub overlay_user: Box<Account<'info, OverlayUser>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub stream_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = reward_mint)]
    pub recipient_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Pays the owner's overlay reward of stream `index`, at most what the
/// stream vault holds; the rest stays owed. Accrual is credited at the
/// owner's chef stake, and only while the pool still points to this rewarder.
pub fn handler(ctx: Context<ClaimOverlay>, index: u8) -> Result<()> {
    let now = clock::now_unix()?;
    let stake = ctx
        .accounts
        .user_info
        .as_ref()
        .map_or(0, |info| info.position.amount);
    let rewarder = &mut ctx.accounts.rewarder;
    let attached = ctx.accounts.chef.pool(rewarder.pid)?.rewarder == Some(rewarder.key());
    let stream = rewarder.stream(index)?;
    require_keys_eq!(stream.reward_mint, ctx.accounts.reward_mint.key(), FarmError::InvalidMint);
    require_keys_eq!(stream.reward_vault, ctx.accounts.stream_vault.key(), FarmError::RewardAccountMismatch);

    let overlay_user = &mut ctx.accounts.overlay_user;
    rewarder.refresh_position(overlay_user, attached, stake, now)?;
    let paid = overlay_user.take_unpaid(index, ctx.accounts.stream_vault.amount)?;
    let remaining_unpaid = overlay_user.unpaid[index as usize];

    let rewarder = &ctx.accounts.rewarder;
    let pid = rewarder.pid.to_le_bytes();
    let nonce = rewarder.nonce.to_le_bytes();
    let seeds: &[&[u8]] = &[REWARDER_SEED, rewarder.chef.as_ref(), &pid, &nonce, &[rewarder.bump]];
    transfers::transfer_signed(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.stream_vault,
        &ctx.accounts.recipient_token_account,
        rewarder.to_account_info(),
        &[seeds],
        paid,
    )?;

    emit!(OverlayClaimed {
        rewarder: rewarder.key(),
        index,
        owner: ctx.accounts.owner.key(),
        amount: paid,
        remaining_unpaid,
        timestamp: clock::timestamp()?,
    });

    msg!("Claimed {} from overlay stream {}, {} still owed", paid, index, remaining_unpaid);

    Ok(())
}
