#![no_main]

use anchor_lang::prelude::Pubkey;
use libfuzzer_sys::fuzz_target;
use piggy_bank::{
    mock::{MockReward, MockToken},
    services::{RewardService, TokenService},
    state::{Contribution, PiggyBank},
    vault,
};

const UNIT: u64 = 1_000;
const NOW: i64 = 1_700_000_000;

fuzz_target!(|data: &[u8]| {
    let manager = Pubkey::new_unique();
    let savers = [Pubkey::new_unique(), Pubkey::new_unique()];
    let custody = Pubkey::new_unique();

    let Ok(mut bank) = PiggyBank::new(manager, UNIT, NOW + 1, NOW, 255) else {
        return;
    };
    if bank.bind_token(&manager, Pubkey::new_unique(), custody, 3).is_err()
        || bank.bind_reward(&manager, Pubkey::new_unique(), 0).is_err()
    {
        return;
    }

    let mut token = MockToken::new(custody);
    let mut reward = MockReward::with_authority();
    let mut entries = [Contribution::default(), Contribution::default()];
    let mut sums = [0u64; 2];

    // Each 3-byte chunk: saver index, approve flag, amount in tenths of a unit.
    for chunk in data.chunks_exact(3) {
        let who = usize::from(chunk[0] & 1);
        let amount = u64::from(u16::from_le_bytes([chunk[1], chunk[2]]) >> 1) * UNIT / 10;
        let approve = chunk[1] & 1 == 1;

        token.fund(savers[who], amount);
        if approve {
            token.approve(savers[who], amount);
        }

        let before = entries[who].clone();
        match vault::contribute(
            &mut bank,
            &mut entries[who],
            savers[who],
            amount,
            &mut token,
            &mut reward,
        ) {
            Ok(receipt) => {
                sums[who] += amount;
                assert_eq!(receipt.total, sums[who]);
            }
            Err(_) => assert_eq!(entries[who], before),
        }
    }

    for (who, entry) in entries.iter().enumerate() {
        assert_eq!(entry.amount, sums[who]);
        assert!(reward.balance_of(&savers[who]) <= 1);
        assert_eq!(entry.has_minted, reward.balance_of(&savers[who]) == 1);
        if entry.has_minted {
            assert!(entry.amount >= 2 * UNIT);
        }
    }
    assert_eq!(token.custody_balance(), sums.iter().sum::<u64>());
});
