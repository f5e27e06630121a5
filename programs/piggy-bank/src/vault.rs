//! Contribution accounting, reward trigger and withdrawal gate.
//!
//! Every operation stages its writes to vault-owned state before calling out
//! to a collaborator, and puts the previous state back if the call fails.

use anchor_lang::prelude::*;

use crate::{
    constants::REWARD_DEPOSIT_THRESHOLD,
    errors::PiggyBankError,
    events::Withdrawn,
    services::{RewardService, TokenService},
    state::{Contribution, PiggyBank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Contributor's cumulative amount after this deposit
    pub total: u64,
    /// Whether this deposit minted the reward
    pub rewarded: bool,
}

pub fn contribute<T: TokenService, R: RewardService>(
    bank: &mut PiggyBank,
    entry: &mut Contribution,
    contributor: Pubkey,
    amount: u64,
    token: &mut T,
    reward: &mut R,
) -> Result<Receipt> {
    require!(amount > 0, PiggyBankError::InvalidAmount);
    require!(bank.token_configured(), PiggyBankError::CollaboratorNotConfigured);

    let total = entry
        .amount
        .checked_add(amount)
        .ok_or(PiggyBankError::Overflow)?;
    let pooled = bank
        .total_contributed
        .checked_add(amount)
        .ok_or(PiggyBankError::Overflow)?;
    let deposits = if amount >= bank.reward_unit {
        entry.deposits.saturating_add(1)
    } else {
        entry.deposits
    };
    let rewarded = !entry.has_minted && deposits >= REWARD_DEPOSIT_THRESHOLD;
    if rewarded {
        require!(bank.reward_configured(), PiggyBankError::CollaboratorNotConfigured);
        // Nothing may be pulled for a deposit whose reward cannot be issued.
        reward.ensure_can_mint(&contributor)?;
    }

    let bank_before = bank.clone();
    let entry_before = entry.clone();

    entry.contributor = contributor;
    entry.amount = total;
    entry.deposits = deposits;
    entry.has_minted |= rewarded;
    bank.total_contributed = pooled;

    let outcome = token.transfer_from(&contributor, amount).and_then(|()| {
        if rewarded {
            reward.mint(&contributor)
        } else {
            Ok(())
        }
    });
    if let Err(err) = outcome {
        *bank = bank_before;
        *entry = entry_before;
        return Err(err);
    }

    Ok(Receipt { total, rewarded })
}

/// Moves the whole custody balance to the manager.
///
/// `target_amount` is not checked here; see [`PiggyBank::target_met`].
pub fn withdraw<T: TokenService>(
    bank: &mut PiggyBank,
    caller: Pubkey,
    now: i64,
    token: &mut T,
) -> Result<Withdrawn> {
    bank.authorize_withdrawal(&caller, now)?;
    require!(bank.token_configured(), PiggyBankError::CollaboratorNotConfigured);

    let amount = token.custody_balance();
    let withdrawn = bank
        .total_withdrawn
        .checked_add(amount)
        .ok_or(PiggyBankError::Overflow)?;

    let withdrawn_before = bank.total_withdrawn;
    bank.total_withdrawn = withdrawn;

    if let Err(err) = token.transfer(&bank.manager, amount) {
        bank.total_withdrawn = withdrawn_before;
        return Err(err);
    }

    Ok(Withdrawn {
        amount,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockReward, MockToken};

    const UNIT: u64 = 1_000_000_000;
    const NOW: i64 = 1_700_000_000;
    const EIGHT_DAYS: i64 = 8 * 24 * 60 * 60;

    struct Fixture {
        bank: PiggyBank,
        token: MockToken,
        reward: MockReward,
        manager: Pubkey,
        alice: Pubkey,
        bob: Pubkey,
    }

    impl Fixture {
        fn new() -> Self {
            let manager = Pubkey::new_unique();
            let alice = Pubkey::new_unique();
            let bob = Pubkey::new_unique();
            let custody = Pubkey::new_unique();

            let mut bank = PiggyBank::new(manager, UNIT, NOW + EIGHT_DAYS, NOW, 254).unwrap();
            bank.bind_token(&manager, Pubkey::new_unique(), custody, 9).unwrap();
            bank.bind_reward(&manager, Pubkey::new_unique(), 0).unwrap();

            let mut token = MockToken::new(custody);
            token.fund(alice, 10 * UNIT);
            token.fund(bob, 10 * UNIT);

            Self {
                bank,
                token,
                reward: MockReward::with_authority(),
                manager,
                alice,
                bob,
            }
        }

        fn save(&mut self, entry: &mut Contribution, who: Pubkey, amount: u64) -> Result<Receipt> {
            self.token.approve(who, amount);
            contribute(
                &mut self.bank,
                entry,
                who,
                amount,
                &mut self.token,
                &mut self.reward,
            )
        }
    }

    #[test]
    fn first_contribution_is_recorded_without_reward() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();

        let receipt = fx.save(&mut alice, fx.alice, UNIT).unwrap();

        assert_eq!(receipt, Receipt { total: UNIT, rewarded: false });
        assert_eq!(alice.amount, UNIT);
        assert_eq!(alice.contributor, fx.alice);
        assert!(!alice.has_minted);
        assert_eq!(fx.token.custody_balance(), UNIT);
        assert_eq!(fx.token.balance_of(&fx.alice), 9 * UNIT);
        assert_eq!(fx.bank.total_contributed, UNIT);
    }

    #[test]
    fn second_unit_deposit_mints_the_reward() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();

        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        assert_eq!(fx.reward.balance_of(&fx.alice), 0);

        let receipt = fx.save(&mut alice, fx.alice, UNIT).unwrap();

        assert!(receipt.rewarded);
        assert!(alice.has_minted);
        assert_eq!(fx.reward.balance_of(&fx.alice), 1);
    }

    #[test]
    fn reward_is_never_minted_twice() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();

        for _ in 0..5 {
            fx.save(&mut alice, fx.alice, UNIT).unwrap();
        }

        assert_eq!(fx.reward.balance_of(&fx.alice), 1);
        assert_eq!(fx.reward.minted(), 1);
        assert_eq!(alice.amount, 5 * UNIT);
        assert!(alice.has_minted);
    }

    #[test]
    fn ledger_is_sum_of_amounts() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        let amounts = [3, UNIT / 2, 2 * UNIT, 17];

        for amount in amounts {
            fx.save(&mut alice, fx.alice, amount).unwrap();
        }

        assert_eq!(alice.amount, amounts.iter().sum::<u64>());
        assert_eq!(fx.bank.total_contributed, alice.amount);
        assert_eq!(fx.token.custody_balance(), alice.amount);
    }

    #[test]
    fn partial_unit_deposits_do_not_count_towards_reward() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();

        fx.save(&mut alice, fx.alice, UNIT - 1).unwrap();
        fx.save(&mut alice, fx.alice, UNIT - 1).unwrap();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        assert_eq!(alice.deposits, 1);
        assert!(!alice.has_minted);

        let receipt = fx.save(&mut alice, fx.alice, 3 * UNIT).unwrap();
        assert!(receipt.rewarded);
        assert_eq!(alice.deposits, 2);
    }

    #[test]
    fn accounts_are_rewarded_independently() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        let mut bob = Contribution::default();

        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        fx.save(&mut bob, fx.bob, UNIT).unwrap();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();

        assert!(alice.has_minted);
        assert!(!bob.has_minted);
        assert_eq!(fx.reward.balance_of(&fx.bob), 0);

        fx.save(&mut bob, fx.bob, UNIT).unwrap();
        assert_eq!(fx.reward.balance_of(&fx.bob), 1);
        assert_eq!(fx.bank.total_contributed, 4 * UNIT);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();

        let err = fx.save(&mut alice, fx.alice, 0).unwrap_err();
        assert_eq!(err, PiggyBankError::InvalidAmount.into());
        assert_eq!(alice, Contribution::default());
    }

    #[test]
    fn contribution_requires_token_binding() {
        let manager = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let mut bank = PiggyBank::new(manager, UNIT, NOW + EIGHT_DAYS, NOW, 254).unwrap();
        let mut entry = Contribution::default();

        let err = contribute(
            &mut bank,
            &mut entry,
            alice,
            UNIT,
            &mut MockToken::new(Pubkey::new_unique()),
            &mut MockReward::with_authority(),
        )
        .unwrap_err();

        assert_eq!(err, PiggyBankError::CollaboratorNotConfigured.into());
    }

    #[test]
    fn rejected_pull_leaves_state_untouched() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();

        let bank_before = fx.bank.clone();
        let alice_before = alice.clone();

        // no approval
        let err = contribute(
            &mut fx.bank,
            &mut alice,
            fx.alice,
            UNIT,
            &mut fx.token,
            &mut fx.reward,
        )
        .unwrap_err();
        assert_eq!(err, PiggyBankError::TransferFailed.into());

        // approved but over balance
        let err = fx.save(&mut alice, fx.alice, 100 * UNIT).unwrap_err();
        assert_eq!(err, PiggyBankError::TransferFailed.into());

        assert_eq!(fx.bank, bank_before);
        assert_eq!(alice, alice_before);
        assert_eq!(fx.reward.balance_of(&fx.alice), 0);
    }

    #[test]
    fn failed_mint_rolls_back_the_deposit() {
        let mut fx = Fixture::new();
        fx.reward = MockReward::without_authority();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();

        let bank_before = fx.bank.clone();
        let alice_before = alice.clone();
        let custody_before = fx.token.custody_balance();
        let balance_before = fx.token.balance_of(&fx.alice);

        let err = fx.save(&mut alice, fx.alice, UNIT).unwrap_err();

        assert_eq!(err, PiggyBankError::MintFailed.into());
        assert_eq!(fx.bank, bank_before);
        assert_eq!(alice, alice_before);
        assert!(!alice.has_minted);
        assert_eq!(fx.token.custody_balance(), custody_before);
        assert_eq!(fx.token.balance_of(&fx.alice), balance_before);
        assert_eq!(
            fx.token.custody_balance(),
            fx.bank.total_contributed - fx.bank.total_withdrawn
        );
        assert_eq!(fx.reward.minted(), 0);
    }

    #[test]
    fn unmintable_reward_leaves_the_deposit_retryable() {
        let mut fx = Fixture::new();
        fx.reward = MockReward::without_authority();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        fx.save(&mut alice, fx.alice, UNIT).unwrap_err();

        // authority handed over afterwards
        fx.reward = MockReward::with_authority();
        let receipt = fx.save(&mut alice, fx.alice, UNIT).unwrap();

        assert!(receipt.rewarded);
        assert_eq!(alice.amount, 2 * UNIT);
        assert_eq!(fx.token.custody_balance(), 2 * UNIT);
        assert_eq!(fx.token.balance_of(&fx.alice), 8 * UNIT);
    }

    #[test]
    fn reward_requires_reward_binding() {
        let mut fx = Fixture::new();
        fx.bank.reward_mint = Pubkey::default();
        let mut alice = Contribution::default();

        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        let custody_before = fx.token.custody_balance();

        let err = fx.save(&mut alice, fx.alice, UNIT).unwrap_err();

        assert_eq!(err, PiggyBankError::CollaboratorNotConfigured.into());
        assert_eq!(alice.amount, UNIT);
        assert_eq!(alice.deposits, 1);
        assert_eq!(fx.token.custody_balance(), custody_before);
    }

    #[test]
    fn manager_withdraws_everything_at_the_deadline() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        let manager_before = fx.token.balance_of(&fx.manager);

        let event = withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS, &mut fx.token).unwrap();

        assert_eq!(
            event,
            Withdrawn {
                amount: UNIT,
                timestamp: NOW + EIGHT_DAYS
            }
        );
        assert_eq!(fx.token.balance_of(&fx.manager) - manager_before, UNIT);
        assert_eq!(fx.token.custody_balance(), 0);
        assert_eq!(fx.bank.total_withdrawn, UNIT);
        // the ledger keeps its history
        assert_eq!(alice.amount, UNIT);
    }

    #[test]
    fn withdrawal_before_deadline_is_too_early() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();

        let err = withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS - 1, &mut fx.token)
            .unwrap_err();

        assert_eq!(err, PiggyBankError::TooEarly.into());
        assert_eq!(fx.token.custody_balance(), UNIT);
        assert_eq!(fx.bank.total_withdrawn, 0);
    }

    #[test]
    fn strangers_cannot_withdraw() {
        let mut fx = Fixture::new();
        let stranger = fx.alice;

        for now in [NOW, NOW + EIGHT_DAYS, NOW + 2 * EIGHT_DAYS] {
            let err = withdraw(&mut fx.bank, stranger, now, &mut fx.token).unwrap_err();
            assert_eq!(err, PiggyBankError::Unauthorized.into());
        }
    }

    #[test]
    fn withdrawal_ignores_target() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT / 4).unwrap();
        assert!(!fx.bank.target_met(fx.token.custody_balance()));

        let event = withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS, &mut fx.token).unwrap();
        assert_eq!(event.amount, UNIT / 4);
    }

    #[test]
    fn repeated_withdrawal_moves_nothing() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, 2 * UNIT).unwrap();

        withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS, &mut fx.token).unwrap();
        let event = withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS + 60, &mut fx.token).unwrap();

        assert_eq!(event.amount, 0);
        assert_eq!(fx.bank.total_withdrawn, 2 * UNIT);
        assert_eq!(fx.token.balance_of(&fx.manager), 2 * UNIT);
    }

    #[test]
    fn pool_keeps_accepting_after_withdrawal() {
        let mut fx = Fixture::new();
        let mut alice = Contribution::default();
        fx.save(&mut alice, fx.alice, UNIT).unwrap();
        withdraw(&mut fx.bank, fx.manager, NOW + EIGHT_DAYS, &mut fx.token).unwrap();

        fx.save(&mut alice, fx.alice, UNIT).unwrap();

        assert!(alice.has_minted);
        assert_eq!(
            fx.token.custody_balance(),
            fx.bank.total_contributed - fx.bank.total_withdrawn
        );
    }
}
