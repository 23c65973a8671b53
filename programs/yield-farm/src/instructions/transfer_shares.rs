use anchor_lang::prelude::*;

use crate::clock;
use crate::constants::FEE_VAULT_POSITION_SEED;
use crate::errors::FarmError;
use crate::events::SharesTransferred;
use crate::state::{FeeVault, VaultPosition};
use crate::transfers;

#[derive(Accounts)]
pub struct TransferShares<'info> {
    #[account(mut)]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    #[account(
        mut,
        seeds = [FEE_VAULT_POSITION_SEED, fee_vault.key().as_ref(), owner.key().as_ref()],
        bump = from_position.bump,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub from_position: Box<Account<'info, VaultPosition>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + VaultPosition::INIT_SPACE,
        seeds = [FEE_VAULT_POSITION_SEED, fee_vault.key().as_ref(), recipient.key().as_ref()],
        bump
    )]
    pub to_position: Box<Account<'info, VaultPosition>>,

    /// CHECK: only its key is used
    #[account(constraint = recipient.key() != owner.key() @ FarmError::Unauthorized)]
    pub recipient: UncheckedAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
    // remaining_accounts: every registered reward vault, in registration order
}

/// Moves shares to `recipient`. Both sides are settled at the current
/// reward state first, so reward already earned stays with the sender.
pub fn handler(ctx: Context<TransferShares>, shares: u64) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let vaults: Vec<Pubkey> = fee_vault.reward_tokens.iter().map(|t| t.vault).collect();
    let balances = transfers::read_balances(&vaults, ctx.remaining_accounts)?;
    fee_vault.update_rewards(&balances)?;

    let to_position = &mut ctx.accounts.to_position;
    if to_position.owner == Pubkey::default() {
        to_position.vault = fee_vault.key();
        to_position.owner = ctx.accounts.recipient.key();
        to_position.bump = ctx.bumps.to_position;
    }

    let from_position = &mut ctx.accounts.from_position;
    fee_vault.transfer_shares(from_position, to_position, shares)?;

    emit!(SharesTransferred {
        vault: fee_vault.key(),
        from: from_position.owner,
        to: to_position.owner,
        shares,
        from_shares: from_position.shares,
        to_shares: to_position.shares,
        timestamp: clock::timestamp()?,
    });

    msg!("Transferred {} shares to {}", shares, to_position.owner);

    Ok(())
}
