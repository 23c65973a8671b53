use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::VestingUpdaterChanged;
use crate::state::VestingVault;

#[derive(Accounts)]
pub struct SetVestingUpdater<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub vault: Box<Account<'info, VestingVault>>,

    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<SetVestingUpdater>, new_updater: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let old = vault.vesting_updater;
    vault.vesting_updater = new_updater;

    emit!(VestingUpdaterChanged {
        vault: vault.key(),
        old_updater: old,
        new_updater,
        timestamp: clock::timestamp()?,
    });

    msg!("Vesting updater: {} -> {}", old, new_updater);

    Ok(())
}
