// Chef
pub mod initialize_chef;
pub mod add_pool;
pub mod set_pool;
pub mod set_reward_per_block;
pub mod mass_update_pools;
pub mod pending_reward;
pub mod deposit;
pub mod withdraw;
pub mod harvest;
pub mod emergency_withdraw;
pub mod init_secondary;
pub mod harvest_from_master;

// Overlay rewarder
pub mod create_rewarder;
pub mod add_overlay_stream;
pub mod set_overlay_rate;
pub mod open_overlay_position;
pub mod claim_overlay;
pub mod pending_overlay;

// Fee vault
pub mod init_fee_vault;
pub mod vault_deposit;
pub mod vault_withdraw;
pub mod update_reward;
pub mod add_reward_token;
pub mod remove_reward_token;
pub mod set_deposit_fee;
pub mod set_fee_collector;
pub mod transfer_shares;
pub mod claim_vault_reward;
pub mod compound;
pub mod pending_vault_reward;

// Vesting vault
pub mod init_vesting_vault;
pub mod vesting_deposit;
pub mod vesting_withdraw;
pub mod update_vesting_schedule;
pub mod claim_revenue;
pub mod claimable_revenue;
pub mod set_vesting_updater;
pub mod set_pending_owner;
pub mod accept_ownership;

pub use initialize_chef::*;
pub use add_pool::*;
pub use set_pool::*;
pub use set_reward_per_block::*;
pub use mass_update_pools::*;
pub use pending_reward::*;
pub use deposit::*;
pub use withdraw::*;
pub use harvest::*;
pub use emergency_withdraw::*;
pub use init_secondary::*;
pub use harvest_from_master::*;

pub use create_rewarder::*;
pub use add_overlay_stream::*;
pub use set_overlay_rate::*;
pub use open_overlay_position::*;
pub use claim_overlay::*;
pub use pending_overlay::*;

pub use init_fee_vault::*;
pub use vault_deposit::*;
pub use vault_withdraw::*;
pub use update_reward::*;
pub use add_reward_token::*;
pub use remove_reward_token::*;
pub use set_deposit_fee::*;
pub use set_fee_collector::*;
pub use transfer_shares::*;
pub use claim_vault_reward::*;
pub use compound::*;
pub use pending_vault_reward::*;

pub use init_vesting_vault::*;
pub use vesting_deposit::*;
pub use vesting_withdraw::*;
pub use update_vesting_schedule::*;
pub use claim_revenue::*;
pub use claimable_revenue::*;
pub use set_vesting_updater::*;
pub use set_pending_owner::*;
pub use accept_ownership::*;
