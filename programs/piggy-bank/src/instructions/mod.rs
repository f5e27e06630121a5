pub mod contribute;
pub mod initialize;
pub mod set_reward_mint;
pub mod set_token_mint;
pub mod views;
pub mod withdraw;

pub use contribute::*;
pub use initialize::*;
pub use set_reward_mint::*;
pub use set_token_mint::*;
pub use views::*;
pub use withdraw::*;
