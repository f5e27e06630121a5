use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::{
    constants::{CUSTODY_SEED, PIGGY_BANK_SEED},
    services::reject_transfer_fee,
    state::PiggyBank,
};

/// Bind the saved token and make sure its custody account exists.
///
/// Rebinding is allowed until the first contribution; a new mint gets a fresh
/// custody account because the mint is part of the custody seeds. Token-2022
/// mints charging a transfer fee are refused.
pub fn set_token_mint(ctx: Context<SetTokenMint>) -> Result<()> {
    let mint = &ctx.accounts.token_mint;
    let custody = ctx.accounts.custody.key();
    reject_transfer_fee(&mint.to_account_info().try_borrow_data()?)?;

    ctx.accounts.piggy_bank.bind_token(
        &ctx.accounts.manager.key(),
        mint.key(),
        custody,
        mint.decimals,
    )?;

    msg!(
        "[piggy_bank] token mint={} custody={} unit={}",
        mint.key(),
        custody,
        ctx.accounts.piggy_bank.reward_unit
    );
    Ok(())
}

#[derive(Accounts)]
pub struct SetTokenMint<'info> {
    /// Checked against `piggy_bank.manager` in the handler
    #[account(mut)]
    pub manager: Signer<'info>,

    #[account(
        mut,
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init_if_needed,
        payer = manager,
        seeds = [CUSTODY_SEED, piggy_bank.key().as_ref(), token_mint.key().as_ref()],
        bump,
        token::mint = token_mint,
        token::authority = piggy_bank,
        token::token_program = token_program,
    )]
    pub custody: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}
