use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::clock;
use crate::errors::FarmError;
use crate::events::VaultRewardUpdated;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct UpdateReward<'info> {
    #[account(mut)]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

/// Permissionless: distributes what arrived in one reward vault since the
/// last update.
pub fn handler(ctx: Context<UpdateReward>, reward_mint: Pubkey) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let index = fee_vault.token_index(reward_mint)?;
    require_keys_eq!(
        fee_vault.reward_tokens[index].vault,
        ctx.accounts.reward_vault.key(),
        FarmError::RewardAccountMismatch
    );

    let distributed = fee_vault.update_reward(index, ctx.accounts.reward_vault.amount)?;
    let acc = fee_vault.reward_tokens[index].accumulator;

    emit!(VaultRewardUpdated {
        vault: fee_vault.key(),
        reward_mint,
        distributed,
        acc_reward_per_share: acc.acc_reward_per_share,
        total_shares: acc.total_shares,
        timestamp: clock::timestamp()?,
    });

    msg!("Distributed {} of reward {}", distributed, reward_mint);

    Ok(())
}
