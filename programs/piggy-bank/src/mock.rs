//! In-memory collaborators for host tests and fuzzing.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::{
    constants::REWARD_AMOUNT,
    errors::PiggyBankError,
    services::{RewardService, TokenService},
};

/// Allowance-based token ledger; pulls need a prior [`MockToken::approve`].
#[derive(Debug, Clone, Default)]
pub struct MockToken {
    custody: Pubkey,
    balances: BTreeMap<Pubkey, u64>,
    allowances: BTreeMap<Pubkey, u64>,
}

impl MockToken {
    pub fn new(custody: Pubkey) -> Self {
        Self {
            custody,
            ..Self::default()
        }
    }

    pub fn fund(&mut self, account: Pubkey, amount: u64) {
        *self.balances.entry(account).or_default() += amount;
    }

    pub fn approve(&mut self, owner: Pubkey, amount: u64) {
        self.allowances.insert(owner, amount);
    }

    fn shift(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
        let available = self.balance_of(&from);
        require!(available >= amount, PiggyBankError::TransferFailed);
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

impl TokenService for MockToken {
    fn transfer_from(&mut self, owner: &Pubkey, amount: u64) -> Result<()> {
        let allowance = self.allowances.get(owner).copied().unwrap_or_default();
        require!(allowance >= amount, PiggyBankError::TransferFailed);

        self.shift(*owner, self.custody, amount)?;
        self.allowances.insert(*owner, allowance - amount);
        Ok(())
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.shift(self.custody, *to, amount)
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn custody_balance(&self) -> u64 {
        self.balance_of(&self.custody)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockReward {
    has_authority: bool,
    owners: BTreeMap<Pubkey, u64>,
    minted: u64,
}

impl MockReward {
    pub fn with_authority() -> Self {
        Self {
            has_authority: true,
            ..Self::default()
        }
    }

    /// Mint authority was never handed to the vault.
    pub fn without_authority() -> Self {
        Self::default()
    }

    pub fn minted(&self) -> u64 {
        self.minted
    }
}

impl RewardService for MockReward {
    fn ensure_can_mint(&self, _to: &Pubkey) -> Result<()> {
        require!(self.has_authority, PiggyBankError::MintFailed);
        Ok(())
    }

    fn mint(&mut self, to: &Pubkey) -> Result<()> {
        self.ensure_can_mint(to)?;
        *self.owners.entry(*to).or_default() += REWARD_AMOUNT;
        self.minted += REWARD_AMOUNT;
        Ok(())
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        self.owners.get(account).copied().unwrap_or_default()
    }
}
