use anchor_lang::prelude::*;

pub mod clock;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
pub mod transfers;

use instructions::*;
use state::HarvestPolicy;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Yield Farm
///
/// Accumulator-based reward distribution:
/// - Chef pools emitting a per-slot reward split by allocation points
/// - Overlay rewarders paying extra tokens per second on top of a pool
/// - Fee vaults: deposit-fee share vaults with several reward tokens
/// - Vesting vaults releasing revenue linearly to share holders
#[program]
pub mod yield_farm {
    use super::*;

    // ------------------------------------------------------------------
    // Chef
    // ------------------------------------------------------------------

    /// Create a chef that mints `reward_per_block` reward tokens per slot
    /// from `start_slot` on.
    pub fn initialize_chef(
        ctx: Context<InitializeChef>,
        chef_id: u64,
        reward_per_block: u64,
        start_slot: u64,
        harvest_policy: HarvestPolicy,
    ) -> Result<()> {
        instructions::initialize_chef::handler(ctx, chef_id, reward_per_block, start_slot, harvest_policy)
    }

    /// Register a pool for a new deposit token (authority only)
    pub fn add_pool(ctx: Context<AddPool>, alloc_point: u64) -> Result<()> {
        instructions::add_pool::handler(ctx, alloc_point)
    }

    /// Change a pool's allocation and optionally replace its rewarder
    pub fn set_pool(
        ctx: Context<SetPool>,
        pid: u32,
        alloc_point: u64,
        overwrite_rewarder: bool,
    ) -> Result<()> {
        instructions::set_pool::handler(ctx, pid, alloc_point, overwrite_rewarder)
    }

    pub fn set_reward_per_block(ctx: Context<SetRewardPerBlock>, reward_per_block: u64) -> Result<()> {
        instructions::set_reward_per_block::handler(ctx, reward_per_block)
    }

    /// Settle the listed pools up to the current slot (permissionless)
    pub fn mass_update_pools(ctx: Context<MassUpdatePools>, pids: Vec<u32>) -> Result<()> {
        instructions::mass_update_pools::handler(ctx, pids)
    }

    /// View: reward a user could harvest from a pool right now
    pub fn pending_reward(ctx: Context<PendingReward>, pid: u32) -> Result<u64> {
        instructions::pending_reward::handler(ctx, pid)
    }

    /// Stake deposit tokens into a pool on behalf of `recipient`
    ///
    /// Under the on-action harvest policy the recipient's pending reward is
    /// paid out first.
    pub fn deposit(ctx: Context<Deposit>, pid: u32, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, pid, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>, pid: u32, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, pid, amount)
    }

    pub fn harvest(ctx: Context<Harvest>, pid: u32) -> Result<()> {
        instructions::harvest::handler(ctx, pid)
    }

    /// Withdraw the whole stake and forfeit every pending reward
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, pid: u32) -> Result<()> {
        instructions::emergency_withdraw::handler(ctx, pid)
    }

    /// Turn a chef into a secondary farm fed by a sentinel stake in a
    /// master chef pool
    pub fn init_secondary(ctx: Context<InitSecondary>, master_pid: u32, amount: u64) -> Result<()> {
        instructions::init_secondary::handler(ctx, master_pid, amount)
    }

    /// Pull the sentinel's reward from the master chef (permissionless)
    pub fn harvest_from_master(ctx: Context<HarvestFromMaster>) -> Result<()> {
        instructions::harvest_from_master::handler(ctx)
    }

    // ------------------------------------------------------------------
    // Overlay rewarder
    // ------------------------------------------------------------------

    pub fn create_rewarder(ctx: Context<CreateRewarder>, pid: u32, nonce: u64) -> Result<()> {
        instructions::create_rewarder::handler(ctx, pid, nonce)
    }

    pub fn add_overlay_stream(ctx: Context<AddOverlayStream>, reward_per_second: u64) -> Result<()> {
        instructions::add_overlay_stream::handler(ctx, reward_per_second)
    }

    pub fn set_overlay_rate(ctx: Context<SetOverlayRate>, index: u8, reward_per_second: u64) -> Result<()> {
        instructions::set_overlay_rate::handler(ctx, index, reward_per_second)
    }

    /// Create the caller's overlay record (idempotent)
    pub fn open_overlay_position(ctx: Context<OpenOverlayPosition>) -> Result<()> {
        instructions::open_overlay_position::handler(ctx)
    }

    pub fn claim_overlay(ctx: Context<ClaimOverlay>, index: u8) -> Result<()> {
        instructions::claim_overlay::handler(ctx, index)
    }

    /// View: overlay reward of one stream owed to a user
    pub fn pending_overlay(ctx: Context<PendingOverlay>, index: u8) -> Result<u64> {
        instructions::pending_overlay::handler(ctx, index)
    }

    // ------------------------------------------------------------------
    // Fee vault
    // ------------------------------------------------------------------

    /// Create a share vault over `deposit_mint` charging `deposit_fee_bps`
    /// on every deposit (max 5000 = 50%)
    pub fn init_fee_vault(ctx: Context<InitFeeVault>, deposit_fee_bps: u16) -> Result<()> {
        instructions::init_fee_vault::handler(ctx, deposit_fee_bps)
    }

    pub fn vault_deposit(ctx: Context<VaultDeposit>, amount: u64) -> Result<()> {
        instructions::vault_deposit::handler(ctx, amount)
    }

    pub fn vault_withdraw<'info>(ctx: Context<'_, '_, '_, 'info, VaultWithdraw<'info>>, shares: u64) -> Result<()> {
        instructions::vault_withdraw::handler(ctx, shares)
    }

    /// Distribute newly arrived reward of one token (permissionless)
    pub fn update_reward(ctx: Context<UpdateReward>, reward_mint: Pubkey) -> Result<()> {
        instructions::update_reward::handler(ctx, reward_mint)
    }

    pub fn add_reward_token(ctx: Context<AddRewardToken>) -> Result<()> {
        instructions::add_reward_token::handler(ctx)
    }

    pub fn remove_reward_token(ctx: Context<RemoveRewardToken>, reward_mint: Pubkey) -> Result<()> {
        instructions::remove_reward_token::handler(ctx, reward_mint)
    }

    pub fn set_deposit_fee(ctx: Context<SetDepositFee>, deposit_fee_bps: u16) -> Result<()> {
        instructions::set_deposit_fee::handler(ctx, deposit_fee_bps)
    }

    pub fn set_fee_collector(ctx: Context<SetFeeCollector>) -> Result<()> {
        instructions::set_fee_collector::handler(ctx)
    }

    /// Move vault shares to another holder; earned reward stays with the sender
    pub fn transfer_shares(ctx: Context<TransferShares>, shares: u64) -> Result<()> {
        instructions::transfer_shares::handler(ctx, shares)
    }

    pub fn claim_vault_reward(ctx: Context<ClaimVaultReward>) -> Result<()> {
        instructions::claim_vault_reward::handler(ctx)
    }

    /// Restake reward paid in the deposit token, fee free
    pub fn compound(ctx: Context<Compound>) -> Result<()> {
        instructions::compound::handler(ctx)
    }

    pub fn pending_vault_reward(ctx: Context<PendingVaultReward>, reward_mint: Pubkey) -> Result<u64> {
        instructions::pending_vault_reward::handler(ctx, reward_mint)
    }

    // ------------------------------------------------------------------
    // Vesting vault
    // ------------------------------------------------------------------

    pub fn init_vesting_vault(
        ctx: Context<InitVestingVault>,
        vault_id: u64,
        vesting_updater: Pubkey,
    ) -> Result<()> {
        instructions::init_vesting_vault::handler(ctx, vault_id, vesting_updater)
    }

    pub fn vesting_deposit(ctx: Context<VestingDeposit>, amount: u64) -> Result<()> {
        instructions::vesting_deposit::handler(ctx, amount)
    }

    pub fn vesting_withdraw(ctx: Context<VestingWithdraw>, shares: u64) -> Result<()> {
        instructions::vesting_withdraw::handler(ctx, shares)
    }

    /// Release the revenue vault's undistributed balance over `period`
    /// seconds (vesting updater only)
    pub fn update_vesting_schedule(ctx: Context<UpdateVestingSchedule>, period: u64) -> Result<()> {
        instructions::update_vesting_schedule::handler(ctx, period)
    }

    /// Pay a holder's unlocked revenue to the holder (any caller)
    pub fn claim_revenue(ctx: Context<ClaimRevenue>) -> Result<()> {
        instructions::claim_revenue::handler(ctx)
    }

    pub fn claimable_revenue(ctx: Context<ClaimableRevenue>) -> Result<u64> {
        instructions::claimable_revenue::handler(ctx)
    }

    pub fn set_vesting_updater(ctx: Context<SetVestingUpdater>, new_updater: Pubkey) -> Result<()> {
        instructions::set_vesting_updater::handler(ctx, new_updater)
    }

    /// First step of a two-step ownership transfer
    pub fn set_pending_owner(ctx: Context<SetPendingOwner>, new_owner: Pubkey) -> Result<()> {
        instructions::set_pending_owner::handler(ctx, new_owner)
    }

    pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
        instructions::accept_ownership::handler(ctx)
    }
}
