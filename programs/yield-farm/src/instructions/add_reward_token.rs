use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::FEE_VAULT_REWARD_SEED;
use crate::errors::FarmError;
use crate::events::RewardTokenAdded;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct AddRewardToken<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = owner,
        seeds = [FEE_VAULT_REWARD_SEED, fee_vault.key().as_ref(), reward_mint.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = fee_vault,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddRewardToken>) -> Result<()> {
    let now = clock::now_unix()?;
    let reward_mint = ctx.accounts.reward_mint.key();
    let reward_vault = ctx.accounts.reward_vault.key();
    let fee_vault = &mut ctx.accounts.fee_vault;
    fee_vault.add_reward_token(reward_mint, reward_vault, now)?;

    emit!(RewardTokenAdded {
        vault: fee_vault.key(),
        reward_mint,
        reward_vault,
        timestamp: clock::timestamp()?,
    });

    msg!("Reward token {} registered ({} total)", reward_mint, fee_vault.reward_tokens.len());

    Ok(())
}
