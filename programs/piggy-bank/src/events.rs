use anchor_lang::prelude::*;

/// Emitted once per successful manager withdrawal.
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawn {
    pub amount: u64,
    pub timestamp: i64,
}
