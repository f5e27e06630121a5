#![allow(unexpected_cfgs)]

//! # Piggy Bank
//!
//! Shared savings vault for a single SPL token:
//!  - anyone contributes; the vault keeps a per-account ledger
//!  - an account's second full-unit deposit earns one reward token, once
//!  - the manager drains the pool once the withdrawal date has passed

use anchor_lang::prelude::*;

declare_id!("DbqMfZcQr9v86wZ7eJYKGJAiHiJsZvs8hFdFng4MMLVg");

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod services;
pub mod state;
pub mod vault;

#[cfg(any(test, feature = "mock-services"))]
pub mod mock;

pub use instructions::*;
pub use state::*;

#[program]
pub mod piggy_bank {
    use super::*;

    /// Create the piggy bank for `manager` with a target and a withdrawal date.
    pub fn initialize(
        ctx: Context<Initialize>,
        target_amount: u64,
        withdrawal_date: i64,
        manager: Pubkey,
    ) -> Result<()> {
        instructions::initialize(ctx, target_amount, withdrawal_date, manager)
    }

    /// Bind the token being saved and open the custody account for it.
    pub fn set_token_mint(ctx: Context<SetTokenMint>) -> Result<()> {
        instructions::set_token_mint(ctx)
    }

    /// Bind the reward mint. The piggy bank PDA must already be its mint authority.
    pub fn set_reward_mint(ctx: Context<SetRewardMint>) -> Result<()> {
        instructions::set_reward_mint(ctx)
    }

    /// Move `amount` tokens from the caller into custody.
    pub fn contribute(ctx: Context<Contribute>, amount: u64) -> Result<()> {
        instructions::contribute(ctx, amount)
    }

    /// Manager-only: drain custody once the withdrawal date is reached.
    /// Returns the amount moved.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<u64> {
        instructions::withdraw(ctx)
    }

    pub fn manager(ctx: Context<ReadPiggyBank>) -> Result<Pubkey> {
        instructions::manager(ctx)
    }

    pub fn contributions(ctx: Context<ReadContribution>, owner: Pubkey) -> Result<u64> {
        instructions::contributions(ctx, owner)
    }

    pub fn has_minted(ctx: Context<ReadContribution>, owner: Pubkey) -> Result<bool> {
        instructions::has_minted(ctx, owner)
    }
}
