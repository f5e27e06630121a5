use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::{
    constants::{CONTRIBUTION_SEED, CUSTODY_SEED, PIGGY_BANK_SEED},
    errors::PiggyBankError,
    services::{load_spl, SplRewardService, SplTokenService},
    state::{Contribution, PiggyBank},
    vault,
};

/// Pull `amount` from the contributor into custody and credit their ledger
/// entry. The entry is created on the first contribution.
///
/// The reward accounts are only needed on the deposit that earns the reward;
/// clients that cannot tell may always pass them.
pub fn contribute(ctx: Context<Contribute>, amount: u64) -> Result<()> {
    let entry_bump = ctx.bumps.contribution;
    let accounts = &mut *ctx.accounts;

    let contributor = accounts.contributor.key();
    let bank_key = accounts.piggy_bank.key();
    let vault_authority = accounts.piggy_bank.to_account_info();
    let manager = accounts.piggy_bank.manager;
    let bump = [accounts.piggy_bank.bump];
    let seeds: &[&[u8]] = &[PIGGY_BANK_SEED, manager.as_ref(), &bump];
    let signer_seeds = &[seeds];

    if accounts.contribution.piggy_bank == Pubkey::default() {
        accounts.contribution.piggy_bank = bank_key;
        accounts.contribution.bump = entry_bump;
    }

    let token_program = accounts.token_program.key();
    let mint = load_spl::<Mint>(&accounts.token_mint, &token_program)?;
    let custody = load_spl::<TokenAccount>(&accounts.custody, &token_program)?;

    let mut token = SplTokenService {
        token_program: &accounts.token_program,
        mint: accounts.token_mint.to_account_info(),
        decimals: mint.decimals,
        custody: accounts.custody.to_account_info(),
        custody_amount: custody.amount,
        counterparty: &accounts.contributor_token_account,
        counterparty_authority: accounts.contributor.to_account_info(),
        vault_authority: vault_authority.clone(),
        signer_seeds,
    };
    let mut reward = SplRewardService {
        token_program: &accounts.token_program,
        reward_mint: accounts.reward_mint.as_ref(),
        recipient: accounts.contributor_reward_account.as_ref(),
        vault_authority,
        signer_seeds,
    };

    let receipt = vault::contribute(
        &mut accounts.piggy_bank,
        &mut accounts.contribution,
        contributor,
        amount,
        &mut token,
        &mut reward,
    )?;

    msg!(
        "[piggy_bank] contribute contributor={} amount={} total={}",
        contributor,
        amount,
        receipt.total
    );
    if receipt.rewarded {
        msg!("[piggy_bank] reward minted to {}", contributor);
    }
    Ok(())
}

#[derive(Accounts)]
pub struct Contribute<'info> {
    #[account(mut)]
    pub contributor: Signer<'info>,

    #[account(
        mut,
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
        constraint = piggy_bank.token_configured() @ PiggyBankError::CollaboratorNotConfigured,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    #[account(
        init_if_needed,
        payer = contributor,
        space = Contribution::LEN,
        seeds = [CONTRIBUTION_SEED, piggy_bank.key().as_ref(), contributor.key().as_ref()],
        bump
    )]
    pub contribution: Account<'info, Contribution>,

    /// CHECK: pinned to `piggy_bank.token_mint`; decoded by `load_spl` once the token is known to be bound
    #[account(address = piggy_bank.token_mint @ PiggyBankError::InvalidMint)]
    pub token_mint: UncheckedAccount<'info>,

    /// CHECK: custody PDA created by `set_token_mint`; decoded by `load_spl`
    #[account(
        mut,
        seeds = [CUSTODY_SEED, piggy_bank.key().as_ref(), token_mint.key().as_ref()],
        bump,
    )]
    pub custody: UncheckedAccount<'info>,

    /// Owner is checked by the token service so a mismatch reports `TransferFailed`
    #[account(mut, token::mint = token_mint)]
    pub contributor_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, address = piggy_bank.reward_mint @ PiggyBankError::InvalidRewardMint)]
    pub reward_mint: Option<InterfaceAccount<'info, Mint>>,

    /// Must belong to the contributor and hold `reward_mint`; checked by the reward service
    #[account(mut)]
    pub contributor_reward_account: Option<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}
