use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;
use crate::{constants::PIGGY_BANK_SEED, state::PiggyBank};

/// Bind the reward mint.
///
/// Mint authority is handed to the piggy bank PDA out of band; without it the
/// rewarding deposit fails with `MintFailed`.
pub fn set_reward_mint(ctx: Context<SetRewardMint>) -> Result<()> {
    let mint = &ctx.accounts.reward_mint;

    ctx.accounts
        .piggy_bank
        .bind_reward(&ctx.accounts.manager.key(), mint.key(), mint.decimals)?;

    let authority: Option<Pubkey> = mint.mint_authority.into();
    if authority != Some(ctx.accounts.piggy_bank.key()) {
        msg!("[piggy_bank] warning: vault is not yet the reward mint authority");
    }

    msg!("[piggy_bank] reward mint={}", mint.key());
    Ok(())
}

#[derive(Accounts)]
pub struct SetRewardMint<'info> {
    /// Checked against `piggy_bank.manager` in the handler
    pub manager: Signer<'info>,

    #[account(
        mut,
        seeds = [PIGGY_BANK_SEED, piggy_bank.manager.as_ref()],
        bump = piggy_bank.bump,
    )]
    pub piggy_bank: Account<'info, PiggyBank>,

    pub reward_mint: InterfaceAccount<'info, Mint>,
}
