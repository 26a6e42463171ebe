//! Data models for Edenred API responses.
//!
//! - `BenefitWallet`: one wallet from the user-benefits endpoint
//! - `RawBalance`: a wallet balance as the provider serialized it
//! - `Balances`: the lunch and Virike amounts reported to the user

pub mod balances;
pub mod benefit;

pub use balances::Balances;
pub use benefit::{
    BenefitWallet, ParseBalanceError, RawBalance, UserBenefitsResponse, WalletParseError,
    WalletType,
};
