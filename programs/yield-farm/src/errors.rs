use anchor_lang::prelude::*;

#[error_code]
pub enum FarmError {
    #[msg("Amount exceeds recorded balance")]
    InsufficientBalance,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Pool id is out of range")]
    InvalidPoolReference,

    #[msg("Deposit token is already registered in another pool")]
    DuplicatePool,

    #[msg("Pool registry is full")]
    TooManyPools,

    #[msg("Already initialized")]
    AlreadyInitialized,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Arithmetic overflow")]
    Overflow,

    #[msg("Rewarder does not match the pool")]
    InvalidRewarder,

    #[msg("Rewarder already carries the maximum number of streams")]
    TooManyStreams,

    #[msg("Overlay stream index is out of range")]
    InvalidStream,

    #[msg("Deposit fee exceeds 50%")]
    DepositFeeTooHigh,

    #[msg("Reward token is already registered")]
    RewardTokenExists,

    #[msg("Reward token is not registered")]
    RewardTokenNotFound,

    #[msg("Too many reward tokens")]
    TooManyRewardTokens,

    #[msg("Reward vault accounts do not match the registered reward tokens")]
    RewardAccountMismatch,

    #[msg("Operation is not available in this emission mode")]
    InvalidEmissionMode,

    #[msg("Signer is not the pending owner")]
    NotPendingOwner,

    #[msg("Vesting period must be greater than zero")]
    InvalidVestingPeriod,

    #[msg("Token mint does not match")]
    InvalidMint,
}
