pub const PIGGY_BANK_SEED: &[u8] = b"piggy_bank";
pub const CONTRIBUTION_SEED: &[u8] = b"contribution";
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Qualifying deposits (each at least one whole token) needed before the reward is minted.
pub const REWARD_DEPOSIT_THRESHOLD: u32 = 2;

/// Reward tokens minted per rewarded account.
pub const REWARD_AMOUNT: u64 = 1;
