use anchor_lang::prelude::*;

use crate::ledger::Participant;

/// A user's stake in one chef pool
/// PDA: ["user-info", chef, pid, owner]
#[account]
#[derive(Default, InitSpace)]
pub struct UserInfo {
    pub chef: Pubkey,

    pub pid: u32,

    /// Holder of the stake, the only signer allowed to withdraw it
    pub owner: Pubkey,

    /// Staked amount and signed reward debt
    pub position: Participant,

    /// Slot of the last deposit, withdraw or harvest
    pub last_action_slot: u64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl UserInfo {
    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }
}
