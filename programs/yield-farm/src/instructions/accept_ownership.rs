use anchor_lang::prelude::*;

use crate::clock;
use crate::events::OwnershipTransferred;
use crate::state::VestingVault;

#[derive(Accounts)]
pub struct AcceptOwnership<'info> {
    #[account(mut)]
    pub vault: Box<Account<'info, VestingVault>>,

    pub pending_owner: Signer<'info>,
}

pub fn handler(ctx: Context<AcceptOwnership>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let previous_owner = vault.accept_ownership(ctx.accounts.pending_owner.key())?;

    emit!(OwnershipTransferred {
        vault: vault.key(),
        previous_owner,
        new_owner: vault.owner,
        timestamp: clock::timestamp()?,
    });

    msg!("Ownership transferred: {} -> {}", previous_owner, vault.owner);

    Ok(())
}
