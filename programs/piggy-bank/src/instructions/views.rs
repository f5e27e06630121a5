use anchor_lang::prelude::*;
use crate::{
    constants::{CONTRIBUTION_SEED, PIGGY_BANK_SEED},
    state::{Contribution, PiggyBank},
};

pub fn manager(ctx: Context<ReadPiggyBank>) -> Result<Pubkey> {
    Ok(ctx.accounts.piggy_bank.manager)
}

/// Cumulative contribution of `owner`; zero if they never contributed.
pub fn contributions(ctx: Context<ReadContribution>, _owner: Pubkey) -> Result<u64> {
    let entry = Contribution::load(&ctx.accounts.contribution.to_account_info())?;
    Ok(Contribution::amount_of(entry.as_ref()))
}

pub fn has_minted(ctx: Context<ReadContribution>, _owner: Pubkey) -> Result<bool> {
    let entry = Contribution::load(&ctx.accounts.contribution.to_account_info())?;
    Ok(Contribution::minted(entry.as_ref()))
}

#[derive(Accounts)]
pub struct ReadPiggyBank<'info> {
    #[account(
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct ReadContribution<'info> {
    #[account(
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    /// CHECK: ledger PDA for `owner`, possibly not created yet; decoded by `Contribution::load`
    #[account(
        seeds = [CONTRIBUTION_SEED, piggy_bank.key().as_ref(), owner.as_ref()],
        bump,
    )]
    pub contribution: UncheckedAccount<'info>,
}
