use anchor_lang::prelude::*;

use crate::errors::FarmError;

/// Current slot, the block clock of chef pools
pub fn now_slot() -> Result<u64> {
    Ok(Clock::get()?.slot)
}

/// Current unix time in seconds, the clock of overlays and vaults
pub fn now_unix() -> Result<u64> {
    let ts = Clock::get()?.unix_timestamp;
    u64::try_from(ts).map_err(|_| error!(FarmError::Overflow))
}

pub fn timestamp() -> Result<i64> {
    Ok(Clock::get()?.unix_timestamp)
}
