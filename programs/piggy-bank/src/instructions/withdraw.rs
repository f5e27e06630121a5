use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::{
    constants::{CUSTODY_SEED, PIGGY_BANK_SEED},
    errors::PiggyBankError,
    services::{load_spl, SplTokenService},
    state::PiggyBank,
    vault,
};

/// Drain custody into the manager's token account.
///
/// Anyone may send the instruction. An unbound vault fails account validation
/// with `CollaboratorNotConfigured`; otherwise the caller is checked against
/// the stored manager before the withdrawal date, so strangers get
/// `Unauthorized`.
pub fn withdraw(ctx: Context<Withdraw>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = &mut *ctx.accounts;

    let caller = accounts.caller.key();
    let vault_authority = accounts.piggy_bank.to_account_info();
    let manager = accounts.piggy_bank.manager;
    let bump = [accounts.piggy_bank.bump];
    let seeds: &[&[u8]] = &[PIGGY_BANK_SEED, manager.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let token_program = accounts.token_program.key();
    let mint = load_spl::<Mint>(&accounts.token_mint, &token_program)?;
    let custody = load_spl::<TokenAccount>(&accounts.custody, &token_program)?;

    let mut token = SplTokenService {
        token_program: &accounts.token_program,
        mint: accounts.token_mint.to_account_info(),
        decimals: mint.decimals,
        custody: accounts.custody.to_account_info(),
        custody_amount: custody.amount,
        counterparty: &accounts.manager_token_account,
        counterparty_authority: accounts.caller.to_account_info(),
        vault_authority,
        signer_seeds,
    };

    let event = vault::withdraw(&mut accounts.piggy_bank, caller, now, &mut token)?;
    let target_met = accounts.piggy_bank.target_met(event.amount);

    msg!(
        "[piggy_bank] withdraw amount={} total_withdrawn={} target_met={}",
        event.amount,
        accounts.piggy_bank.total_withdrawn,
        target_met
    );
    let amount = event.amount;
    emit!(event);
    Ok(amount)
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
        constraint = piggy_bank.token_configured() @ PiggyBankError::CollaboratorNotConfigured,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    /// CHECK: pinned to `piggy_bank.token_mint`; decoded by `load_spl`
    #[account(address = piggy_bank.token_mint @ PiggyBankError::InvalidMint)]
    pub token_mint: UncheckedAccount<'info>,

    /// CHECK: custody PDA created by `set_token_mint`; decoded by `load_spl`
    #[account(
        mut,
        seeds = [CUSTODY_SEED, piggy_bank.key().as_ref(), token_mint.key().as_ref()],
        bump,
    )]
    pub custody: UncheckedAccount<'info>,

    /// Must belong to the manager; checked by the token service
    #[account(mut, token::mint = token_mint)]
    pub manager_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}
