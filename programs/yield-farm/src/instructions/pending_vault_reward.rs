use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::errors::FarmError;
use crate::state::{FeeVault, VaultPosition};

#[derive(Accounts)]
pub struct PendingVaultReward<'info> {
    pub fee_vault: Box<Account<'info, FeeVault>>,

    #[account(constraint = position.vault == fee_vault.key() @ FarmError::Unauthorized)]
    pub position: Box<Account<'info, VaultPosition>>,

    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

pub fn handler(ctx: Context<PendingVaultReward>, reward_mint: Pubkey) -> Result<u64> {
    let fee_vault = &ctx.accounts.fee_vault;
    let index = fee_vault.token_index(reward_mint)?;
    require_keys_eq!(
        fee_vault.reward_tokens[index].vault,
        ctx.accounts.reward_vault.key(),
        FarmError::RewardAccountMismatch
    );
    fee_vault.pending(&ctx.accounts.position, reward_mint, ctx.accounts.reward_vault.amount)
}
