//! Core library for the Edenred balance tool.
//!
//! Signs in to the Edenred Finland API, fetches the user's benefit wallets,
//! and folds them into the lunch and Virike balances.

pub mod api;
pub mod auth;
pub mod models;

pub use api::{ApiClient, ApiError, BalanceError, Stage, DEFAULT_BASE_URL};
pub use auth::{Credentials, Session};
pub use models::{Balances, BenefitWallet, RawBalance, WalletType};
