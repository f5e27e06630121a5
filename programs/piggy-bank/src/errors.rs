use anchor_lang::prelude::*;

#[error_code]
pub enum PiggyBankError {
    #[msg("Only the manager can perform this action")]
    Unauthorized,
    #[msg("Withdrawal date has not been reached")]
    TooEarly,
    #[msg("Token or reward mint has not been configured")]
    CollaboratorNotConfigured,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Token transfer was rejected")]
    TransferFailed,
    #[msg("Reward mint was rejected")]
    MintFailed,
    #[msg("Withdrawal date must be in the future")]
    InvalidWithdrawalDate,
    #[msg("Reward mint must have zero decimals")]
    InvalidRewardMint,
    #[msg("Mint does not match the configured token")]
    InvalidMint,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Token cannot be rebound once contributions were accepted")]
    PoolAlreadyFunded,
    #[msg("Mints with a transfer fee are not supported")]
    UnsupportedMint,
}
