//! Collaborator seams.
//!
//! The vault never talks to a concrete token program directly. Instruction
//! handlers wrap their validated accounts in [`SplTokenService`] /
//! [`SplRewardService`] and hand them to the logic in [`crate::vault`].

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::spl_token_2022::{
    extension::{transfer_fee::TransferFeeConfig, BaseStateWithExtensions, StateWithExtensions},
    state::Mint as MintState,
};
use anchor_spl::token_interface::{self, MintTo, TokenAccount, TokenInterface, TransferChecked};

use crate::{constants::REWARD_AMOUNT, errors::PiggyBankError};

/// Fungible token ledger holding the pooled funds.
pub trait TokenService {
    /// Pull `amount` from `owner` into vault custody.
    fn transfer_from(&mut self, owner: &Pubkey, amount: u64) -> Result<()>;

    /// Push `amount` out of vault custody to `to`.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

    fn balance_of(&self, account: &Pubkey) -> u64;

    /// Tokens currently held by the vault.
    fn custody_balance(&self) -> u64;
}

/// Non-fungible registry the vault holds minting authority over.
pub trait RewardService {
    /// Fails if a later [`RewardService::mint`] to `to` would be rejected.
    /// Runs before any funds move.
    fn ensure_can_mint(&self, to: &Pubkey) -> Result<()>;

    /// Issue exactly one reward unit to `to`.
    fn mint(&mut self, to: &Pubkey) -> Result<()>;

    fn balance_of(&self, account: &Pubkey) -> u64;
}

/// Decodes an SPL account that was passed unchecked, once `token_program`
/// is confirmed as its owner.
pub fn load_spl<T: AccountDeserialize>(info: &AccountInfo, token_program: &Pubkey) -> Result<T> {
    let data = info.try_borrow_data()?;
    decode_spl(info.owner, token_program, &data)
}

pub fn decode_spl<T: AccountDeserialize>(
    owner: &Pubkey,
    token_program: &Pubkey,
    data: &[u8],
) -> Result<T> {
    require_keys_eq!(*owner, *token_program, ErrorCode::AccountOwnedByWrongProgram);
    T::try_deserialize(&mut &data[..])
}

/// Custody would receive less than the ledger records on a fee-charging
/// Token-2022 mint, so those are refused at binding time.
pub fn reject_transfer_fee(mint_data: &[u8]) -> Result<()> {
    let mint = StateWithExtensions::<MintState>::unpack(mint_data)?;
    require!(
        mint.get_extension::<TransferFeeConfig>().is_err(),
        PiggyBankError::UnsupportedMint
    );
    Ok(())
}

/// A debit of `amount` from a token account owned by `account_owner` holding
/// `held`, on behalf of `expected`.
fn check_debit(account_owner: &Pubkey, expected: &Pubkey, held: u64, amount: u64) -> Result<()> {
    require_keys_eq!(*account_owner, *expected, PiggyBankError::TransferFailed);
    require!(held >= amount, PiggyBankError::TransferFailed);
    Ok(())
}

fn check_reward_recipient(
    recipient: &TokenAccount,
    to: &Pubkey,
    reward_mint: &Pubkey,
    mint_authority: Option<Pubkey>,
    vault_authority: &Pubkey,
) -> Result<()> {
    require_keys_eq!(recipient.owner, *to, PiggyBankError::MintFailed);
    require_keys_eq!(recipient.mint, *reward_mint, PiggyBankError::MintFailed);
    require!(
        mint_authority == Some(*vault_authority),
        PiggyBankError::MintFailed
    );
    Ok(())
}

/// SPL Token / Token-2022 ledger seen through one counterparty token account.
///
/// Pulls debit `counterparty` (signed by `counterparty_authority`); pushes
/// credit it (signed by the piggy bank PDA). The mint and custody arrive as
/// raw accounts together with their decoded `decimals` / `custody_amount`.
pub struct SplTokenService<'a, 'info> {
    pub token_program: &'a Interface<'info, TokenInterface>,
    pub mint: AccountInfo<'info>,
    pub decimals: u8,
    pub custody: AccountInfo<'info>,
    pub custody_amount: u64,
    pub counterparty: &'a InterfaceAccount<'info, TokenAccount>,
    pub counterparty_authority: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl TokenService for SplTokenService<'_, '_> {
    fn transfer_from(&mut self, owner: &Pubkey, amount: u64) -> Result<()> {
        // Surface the rejection as our own error rather than a failed CPI.
        check_debit(&self.counterparty.owner, owner, self.counterparty.amount, amount)?;

        let cpi_ctx = CpiContext::new(
            self.token_program.to_account_info(),
            TransferChecked {
                from: self.counterparty.to_account_info(),
                mint: self.mint.clone(),
                to: self.custody.clone(),
                authority: self.counterparty_authority.clone(),
            },
        );
        token_interface::transfer_checked(cpi_ctx, amount, self.decimals)?;
        self.custody_amount = self
            .custody_amount
            .checked_add(amount)
            .ok_or(PiggyBankError::Overflow)?;
        Ok(())
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(self.counterparty.owner, *to, PiggyBankError::TransferFailed);
        require!(self.custody_amount >= amount, PiggyBankError::TransferFailed);
        if amount == 0 {
            return Ok(());
        }

        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            TransferChecked {
                from: self.custody.clone(),
                mint: self.mint.clone(),
                to: self.counterparty.to_account_info(),
                authority: self.vault_authority.clone(),
            },
            self.signer_seeds,
        );
        token_interface::transfer_checked(cpi_ctx, amount, self.decimals)?;
        self.custody_amount -= amount;
        Ok(())
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        if *account == self.vault_authority.key() {
            self.custody_amount
        } else if *account == self.counterparty.owner {
            self.counterparty.amount
        } else {
            0
        }
    }

    fn custody_balance(&self) -> u64 {
        self.custody_amount
    }
}

/// Zero-decimal SPL mint whose mint authority is the piggy bank PDA.
///
/// Both accounts are optional on `contribute`; they only have to be supplied
/// on the deposit that earns the reward.
pub struct SplRewardService<'a, 'info> {
    pub token_program: &'a Interface<'info, TokenInterface>,
    pub reward_mint: Option<&'a InterfaceAccount<'info, token_interface::Mint>>,
    pub recipient: Option<&'a InterfaceAccount<'info, TokenAccount>>,
    pub vault_authority: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl RewardService for SplRewardService<'_, '_> {
    fn ensure_can_mint(&self, to: &Pubkey) -> Result<()> {
        let (Some(reward_mint), Some(recipient)) = (self.reward_mint, self.recipient) else {
            return err!(PiggyBankError::MintFailed);
        };
        check_reward_recipient(
            recipient,
            to,
            &reward_mint.key(),
            reward_mint.mint_authority.into(),
            &self.vault_authority.key(),
        )
    }

    fn mint(&mut self, to: &Pubkey) -> Result<()> {
        self.ensure_can_mint(to)?;
        let (Some(reward_mint), Some(recipient)) = (self.reward_mint, self.recipient) else {
            return err!(PiggyBankError::MintFailed);
        };

        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            MintTo {
                mint: reward_mint.to_account_info(),
                to: recipient.to_account_info(),
                authority: self.vault_authority.clone(),
            },
            self.signer_seeds,
        );
        token_interface::mint_to(cpi_ctx, REWARD_AMOUNT)
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        match self.recipient {
            Some(recipient) if recipient.owner == *account => recipient.amount,
            _ => 0,
        }
    }
}
