//! REST API client module for the Edenred Finland service.
//!
//! This module provides the `ApiClient` which signs in with a username and
//! password and then fetches the user's benefit wallets.
//!
//! The API hands out a session token and a refresh token at sign-in. The
//! benefits endpoint expects both back as cookies, not as an
//! `Authorization` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, BalanceError, Stage};
