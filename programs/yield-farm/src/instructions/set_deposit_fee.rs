use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::DepositFeeUpdated;
use crate::state::FeeVault;

#[derive(Accounts)]
pub struct SetDepositFee<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub fee_vault: Box<Account<'info, FeeVault>>,

    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<SetDepositFee>, deposit_fee_bps: u16) -> Result<()> {
    let fee_vault = &mut ctx.accounts.fee_vault;
    let old = fee_vault.deposit_fee_bps;
    fee_vault.set_deposit_fee(deposit_fee_bps)?;

    emit!(DepositFeeUpdated {
        vault: fee_vault.key(),
        old_fee_bps: old,
        new_fee_bps: deposit_fee_bps,
        timestamp: clock::timestamp()?,
    });

    msg!("Deposit fee: {} -> {} bps", old, deposit_fee_bps);

    Ok(())
}
