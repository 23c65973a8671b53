use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::clock;
use crate::errors::FarmError;
use crate::events::FeeCollectorUpdated;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct SetFeeCollector<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    #[account(constraint = fee_collector.mint == fee_vault.deposit_mint @ FarmError::InvalidMint)]
    pub fee_collector: Box<InterfaceAccount<'info, TokenAccount>>,

    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<SetFeeCollector>) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let old = fee_vault.fee_collector;
    fee_vault.fee_collector = ctx.accounts.fee_collector.key();

    emit!(FeeCollectorUpdated {
        vault: fee_vault.key(),
        old_collector: old,
        new_collector: fee_vault.fee_collector,
        timestamp: clock::timestamp()?,
    });

    msg!("Fee collector: {} -> {}", old, fee_vault.fee_collector);

    Ok(())
}
