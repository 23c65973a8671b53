pub mod chef;
pub mod fee_vault;
pub mod rewarder;
pub mod user_info;
pub mod vesting_vault;

pub use chef::*;
pub use fee_vault::*;
pub use rewarder::*;
pub use user_info::*;
pub use vesting_vault::*;
