//! End-to-end buy and withdraw flows against an [`Exchange`](crate::common::traits::Exchange)

mod buy;
mod withdraw;

pub use buy::{buy_crypto, BuyOutcome, BuyRequest};
pub use withdraw::{withdraw_crypto, WithdrawOutcome, WithdrawRequest};
