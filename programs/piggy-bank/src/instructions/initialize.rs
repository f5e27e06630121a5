use anchor_lang::prelude::*;
use crate::{constants::PIGGY_BANK_SEED, state::PiggyBank};

/// Create the piggy bank for `manager`.
///
/// The payer does not have to be the manager. `init` makes a second call
/// for the same manager fail, so the configuration can never be overwritten.
pub fn initialize(
    ctx: Context<Initialize>,
    target_amount: u64,
    withdrawal_date: i64,
    manager: Pubkey,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let bank = PiggyBank::new(
        manager,
        target_amount,
        withdrawal_date,
        now,
        ctx.bumps.piggy_bank,
    )?;
    ctx.accounts.piggy_bank.set_inner(bank);

    msg!(
        "[piggy_bank] initialised manager={} target={} withdrawal_date={}",
        manager,
        target_amount,
        withdrawal_date
    );
    Ok(())
}

#[derive(Accounts)]
#[instruction(target_amount: u64, withdrawal_date: i64, manager: Pubkey)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = PiggyBank::LEN,
        seeds = [PIGGY_BANK_SEED, manager.as_ref()],
        bump
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    pub system_program: Program<'info, System>,
}
