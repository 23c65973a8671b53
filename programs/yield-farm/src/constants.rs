/// Fixed-point scale of chef pools and overlay streams (1e12).
///
/// Each accrual truncates less than `total_shares / ACC_PRECISION` reward units
/// and each settlement truncates less than one unit per participant.
pub const ACC_PRECISION: u128 = 1_000_000_000_000;

/// Fixed-point scale of fee-vault and vesting-vault accumulators (1e18)
pub const VAULT_ACC_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Scale applied to `VestingVault::issuance_rate` (revenue units per second)
pub const ISSUANCE_PRECISION: u128 = 1_000_000_000_000_000_000;

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Deposit fee ceiling: 50%
pub const MAX_DEPOSIT_FEE_BPS: u16 = 5_000;

pub const MAX_POOLS: usize = 24;
pub const MAX_OVERLAY_STREAMS: usize = 4;
pub const MAX_REWARD_TOKENS: usize = 8;

pub const CHEF_SEED: &[u8] = b"chef";
pub const POOL_VAULT_SEED: &[u8] = b"pool-vault";
pub const CHEF_REWARD_VAULT_SEED: &[u8] = b"chef-reward-vault";
pub const USER_INFO_SEED: &[u8] = b"user-info";
pub const REWARDER_SEED: &[u8] = b"rewarder";
pub const OVERLAY_VAULT_SEED: &[u8] = b"overlay-vault";
pub const OVERLAY_USER_SEED: &[u8] = b"overlay-user";
pub const FEE_VAULT_SEED: &[u8] = b"fee-vault";
pub const FEE_VAULT_PRINCIPAL_SEED: &[u8] = b"fee-vault-principal";
pub const FEE_VAULT_REWARD_SEED: &[u8] = b"fee-vault-reward";
pub const FEE_VAULT_POSITION_SEED: &[u8] = b"fee-vault-position";
pub const VESTING_VAULT_SEED: &[u8] = b"vesting-vault";
pub const VESTING_PRINCIPAL_SEED: &[u8] = b"vesting-principal";
pub const VESTING_REVENUE_SEED: &[u8] = b"vesting-revenue";
pub const VESTING_POSITION_SEED: &[u8] = b"vesting-position";
