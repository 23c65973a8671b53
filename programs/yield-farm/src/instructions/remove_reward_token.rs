use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::clock;
use crate::errors::FarmError;
use crate::events::RewardTokenRemoved;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct RemoveRewardToken<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,
}

/// Distributes what already arrived for `reward_mint`, then stops its
/// accrual. Holders keep claiming what they earned.
pub fn handler(ctx: Context<RemoveRewardToken>, reward_mint: Pubkey) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let index = fee_vault.token_index(reward_mint)?;
    require_keys_eq!(
        fee_vault.reward_tokens[index].vault,
        ctx.accounts.reward_vault.key(),
        FarmError::RewardAccountMismatch
    );
    fee_vault.update_reward(index, ctx.accounts.reward_vault.amount)?;
    fee_vault.remove_reward_token(reward_mint)?;

    emit!(RewardTokenRemoved {
        vault: fee_vault.key(),
        reward_mint,
        timestamp: clock::timestamp()?,
    });

    msg!("Reward token {} removed", reward_mint);

    Ok(())
}
