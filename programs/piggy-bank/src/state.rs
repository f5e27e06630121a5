use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;

use crate::errors::PiggyBankError;

/// Vault configuration and pool counters (PDA, seeds = [b"piggy_bank", manager])
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct PiggyBank {
    /// The only account allowed to withdraw or rebind collaborators
    pub manager: Pubkey,
    /// Pool size the savers are aiming for. Reported, not enforced.
    pub target_amount: u64,
    /// Unix timestamp from which the manager may withdraw
    pub withdrawal_date: i64,
    /// Token being saved; `Pubkey::default()` until bound
    pub token_mint: Pubkey,
    /// Custody token account for `token_mint`, owned by this PDA
    pub custody: Pubkey,
    /// One whole token in base units (10^decimals)
    pub reward_unit: u64,
    /// Zero-decimal reward mint; `Pubkey::default()` until bound
    pub reward_mint: Pubkey,
    /// Lifetime contributions accepted
    pub total_contributed: u64,
    /// Lifetime amount paid out to the manager
    pub total_withdrawn: u64,
    pub bump: u8,
}

impl PiggyBank {
    pub const LEN: usize = 8 // discriminator
        + 32 + 8 + 8        // manager, target_amount, withdrawal_date
        + 32 + 32 + 8       // token_mint, custody, reward_unit
        + 32                // reward_mint
        + 8 + 8             // total_contributed, total_withdrawn
        + 1; // bump

    pub fn new(
        manager: Pubkey,
        target_amount: u64,
        withdrawal_date: i64,
        now: i64,
        bump: u8,
    ) -> Result<Self> {
        require!(target_amount > 0, PiggyBankError::InvalidAmount);
        require!(withdrawal_date > now, PiggyBankError::InvalidWithdrawalDate);

        Ok(Self {
            manager,
            target_amount,
            withdrawal_date,
            bump,
            ..Self::default()
        })
    }

    pub fn token_configured(&self) -> bool {
        self.token_mint != Pubkey::default()
    }

    pub fn reward_configured(&self) -> bool {
        self.reward_mint != Pubkey::default()
    }

    pub fn authorize_manager(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.manager, PiggyBankError::Unauthorized);
        Ok(())
    }

    /// Identity is checked before time, so a stranger always sees `Unauthorized`.
    pub fn authorize_withdrawal(&self, caller: &Pubkey, now: i64) -> Result<()> {
        self.authorize_manager(caller)?;
        require!(now >= self.withdrawal_date, PiggyBankError::TooEarly);
        Ok(())
    }

    pub fn bind_token(
        &mut self,
        caller: &Pubkey,
        mint: Pubkey,
        custody: Pubkey,
        decimals: u8,
    ) -> Result<()> {
        self.authorize_manager(caller)?;
        // Counters are kept in base units of the bound mint.
        require!(
            self.total_contributed == 0 || mint == self.token_mint,
            PiggyBankError::PoolAlreadyFunded
        );
        let reward_unit = 10u64
            .checked_pow(u32::from(decimals))
            .ok_or(PiggyBankError::Overflow)?;

        self.token_mint = mint;
        self.custody = custody;
        self.reward_unit = reward_unit;
        Ok(())
    }

    pub fn bind_reward(&mut self, caller: &Pubkey, mint: Pubkey, decimals: u8) -> Result<()> {
        self.authorize_manager(caller)?;
        require!(decimals == 0, PiggyBankError::InvalidRewardMint);

        self.reward_mint = mint;
        Ok(())
    }

    pub fn target_met(&self, held: u64) -> bool {
        held >= self.target_amount
    }
}

/// Per-account ledger entry (PDA, seeds = [b"contribution", piggy_bank, contributor])
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct Contribution {
    pub piggy_bank: Pubkey,
    pub contributor: Pubkey,
    /// Cumulative amount contributed, never decreases
    pub amount: u64,
    /// Deposits of at least one whole token
    pub deposits: u32,
    /// Set once the reward has been minted; never cleared
    pub has_minted: bool,
    pub bump: u8,
}

impl Contribution {
    pub const LEN: usize = 8 // discriminator
        + 32 + 32           // piggy_bank, contributor
        + 8 + 4             // amount, deposits
        + 1 + 1; // has_minted, bump

    /// Reads a ledger entry that may not have been created yet.
    pub fn load(info: &AccountInfo) -> Result<Option<Self>> {
        let data = info.try_borrow_data()?;
        Self::decode(info.owner, &data)
    }

    pub fn decode(owner: &Pubkey, data: &[u8]) -> Result<Option<Self>> {
        if data.is_empty() {
            return Ok(None);
        }
        require_keys_eq!(*owner, crate::ID, ErrorCode::AccountOwnedByWrongProgram);
        Self::try_deserialize(&mut &data[..]).map(Some)
    }

    /// Cumulative amount reported for a possibly absent entry.
    pub fn amount_of(entry: Option<&Self>) -> u64 {
        entry.map_or(0, |entry| entry.amount)
    }

    pub fn minted(entry: Option<&Self>) -> bool {
        entry.is_some_and(|entry| entry.has_minted)
    }
}
