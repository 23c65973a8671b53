use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::clock;
use crate::errors::FarmError;
use crate::events::VestingScheduleUpdated;
use crate::state::VestingVault;

#[derive(Accounts)]
pub struct UpdateVestingSchedule<'info> {
    #[account(
        mut,
        constraint = vault.vesting_updater == updater.key() @ FarmError::Unauthorized
    )]
    pub vault: Box<Account<'info, VestingVault>>,

    #[account(address = vault.revenue_vault @ FarmError::RewardAccountMismatch)]
    pub revenue_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub updater: Signer<'info>,
}

/// Releases everything in the revenue vault that is not yet claimable
/// linearly over the next `period` seconds.
pub fn handler(ctx: Context<UpdateVestingSchedule>, period: u64) -> Result<()> {
    let now = clock::now_unix()?;
    let vault = &mut ctx.accounts.vault;
    vault.update_vesting_schedule(period, ctx.accounts.revenue_vault.amount, now)?;

    emit!(VestingScheduleUpdated {
        vault: vault.key(),
        issuance_rate: vault.issuance_rate,
        vesting_period_finish: vault.vesting_period_finish,
        unvested: vault.unvested,
        total_claimable: vault.total_claimable,
        timestamp: clock::timestamp()?,
    });

    msg!("Vesting {} over {}s, finish at {}", vault.unvested, period, vault.vesting_period_finish);

    Ok(())
}
