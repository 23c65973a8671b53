use anchor_lang::prelude::*;

// ---------------------------------------------------------------------------
// Chef
// ---------------------------------------------------------------------------

#[event]
pub struct ChefInitialized {
    pub chef: Pubkey,
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_per_block: u64,
    pub start_slot: u64,
    pub timestamp: i64,
}

/// Emitted when a secondary chef stakes its sentinel in a master pool
#[event]
pub struct SecondaryInitialized {
    pub chef: Pubkey,
    pub master_chef: Pubkey,
    pub master_pid: u32,
    pub sentinel_amount: u64,
    pub reward_per_block: u64,
    pub timestamp: i64,
}

#[event]
pub struct MasterHarvested {
    pub chef: Pubkey,
    pub master_chef: Pubkey,
    pub master_pid: u32,
    pub amount: u64,
    pub reward_per_block: u64,
    pub timestamp: i64,
}

#[event]
pub struct PoolAdded {
    pub chef: Pubkey,
    pub pid: u32,
    pub deposit_mint: Pubkey,
    pub alloc_point: u64,
    pub total_alloc_point: u64,
    pub rewarder: Option<Pubkey>,
    pub timestamp: i64,
}

#[event]
pub struct PoolUpdated {
    pub chef: Pubkey,
    pub pid: u32,
    pub alloc_point: u64,
    pub total_alloc_point: u64,
    pub rewarder: Option<Pubkey>,
    pub overwrite_rewarder: bool,
    pub timestamp: i64,
}

/// Accumulator snapshot after a settlement
#[event]
pub struct PoolSettled {
    pub chef: Pubkey,
    pub pid: u32,
    pub last_update_slot: u64,
    pub total_shares: u64,
    pub acc_reward_per_share: u128,
}

#[event]
pub struct EmissionRateUpdated {
    pub chef: Pubkey,
    pub old_reward_per_block: u64,
    pub new_reward_per_block: u64,
    pub timestamp: i64,
}

#[event]
pub struct Deposited {
    pub chef: Pubkey,
    pub pid: u32,
    pub depositor: Pubkey,
    pub recipient: Pubkey,
    /// Amount actually received by the pool vault
    pub amount: u64,
    pub reward_paid: u64,
    pub user_amount: u64,
    pub pool_total_shares: u64,
    pub acc_reward_per_share: u128,
    pub timestamp: i64,
}

#[event]
pub struct Withdrawn {
    pub chef: Pubkey,
    pub pid: u32,
    pub owner: Pubkey,
    pub amount: u64,
    pub reward_paid: u64,
    pub user_amount: u64,
    pub pool_total_shares: u64,
    pub acc_reward_per_share: u128,
    pub timestamp: i64,
}

#[event]
pub struct Harvested {
    pub chef: Pubkey,
    pub pid: u32,
    pub owner: Pubkey,
    pub amount: u64,
    pub acc_reward_per_share: u128,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyWithdrawn {
    pub chef: Pubkey,
    pub pid: u32,
    pub owner: Pubkey,
    pub amount: u64,
    pub pool_total_shares: u64,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Overlay rewarder
// ---------------------------------------------------------------------------

#[event]
pub struct RewarderCreated {
    pub rewarder: Pubkey,
    pub chef: Pubkey,
    pub pid: u32,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OverlayStreamAdded {
    pub rewarder: Pubkey,
    pub index: u8,
    pub reward_mint: Pubkey,
    pub reward_per_second: u64,
    pub timestamp: i64,
}

#[event]
pub struct OverlayRateUpdated {
    pub rewarder: Pubkey,
    pub index: u8,
    pub old_reward_per_second: u64,
    pub new_reward_per_second: u64,
    pub acc_reward_per_share: u128,
    pub timestamp: i64,
}

#[event]
pub struct OverlayClaimed {
    pub rewarder: Pubkey,
    pub index: u8,
    pub owner: Pubkey,
    pub amount: u64,
    pub remaining_unpaid: u64,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Fee vault
// ---------------------------------------------------------------------------

#[event]
pub struct FeeVaultInitialized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub deposit_mint: Pubkey,
    pub fee_collector: Pubkey,
    pub deposit_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct VaultDeposited {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub gross_amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub shares: u64,
    pub user_shares: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultWithdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub amount: u64,
    /// Reward paid per token, in registration order
    pub rewards_paid: Vec<u64>,
    pub user_shares: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultRewardUpdated {
    pub vault: Pubkey,
    pub reward_mint: Pubkey,
    pub distributed: u64,
    pub acc_reward_per_share: u128,
    pub total_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultRewardClaimed {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub reward_mint: Pubkey,
    pub amount: u64,
    pub remaining_unpaid: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultCompounded {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub user_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct SharesTransferred {
    pub vault: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub shares: u64,
    pub from_shares: u64,
    pub to_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct RewardTokenAdded {
    pub vault: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct RewardTokenRemoved {
    pub vault: Pubkey,
    pub reward_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DepositFeeUpdated {
    pub vault: Pubkey,
    pub old_fee_bps: u16,
    pub new_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct FeeCollectorUpdated {
    pub vault: Pubkey,
    pub old_collector: Pubkey,
    pub new_collector: Pubkey,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Vesting vault
// ---------------------------------------------------------------------------

#[event]
pub struct VestingVaultInitialized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub vesting_updater: Pubkey,
    pub principal_mint: Pubkey,
    pub revenue_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PrincipalDeposited {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub user_shares: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct PrincipalWithdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub amount: u64,
    pub user_shares: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct VestingScheduleUpdated {
    pub vault: Pubkey,
    pub issuance_rate: u128,
    pub vesting_period_finish: u64,
    pub unvested: u64,
    pub total_claimable: u64,
    pub timestamp: i64,
}

/// `caller` may differ from `owner`; funds always go to `owner`
#[event]
pub struct RevenueClaimed {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub caller: Pubkey,
    pub amount: u64,
    pub total_claimable: u64,
    pub timestamp: i64,
}

#[event]
pub struct VestingUpdaterChanged {
    pub vault: Pubkey,
    pub old_updater: Pubkey,
    pub new_updater: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferStarted {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub pending_owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferred {
    pub vault: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
    pub timestamp: i64,
}
