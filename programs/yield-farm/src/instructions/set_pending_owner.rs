use anchor_lang::prelude::*;

use crate::clock;
use crate::errors::FarmError;
use crate::events::OwnershipTransferStarted;
use crate::state::VestingVault;

#[derive(Accounts)]
pub struct SetPendingOwner<'info> {
    #[account(
        mut,
        has_one = owner @ FarmError::Unauthorized
    )]
    pub vault: Box<Account<'info, VestingVault>>,

    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<SetPendingOwner>, new_owner: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_pending_owner(new_owner);

    emit!(OwnershipTransferStarted {
        vault: vault.key(),
        owner: vault.owner,
        pending_owner: new_owner,
        timestamp: clock::timestamp()?,
    });

    msg!("Pending owner set to {}", new_owner);

    Ok(())
}
