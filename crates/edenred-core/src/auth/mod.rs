//! Authentication types.
//!
//! - `Credentials`: username and password for one invocation
//! - `Session`: tokens returned by sign-in
//!
//! Nothing here is written to disk; a session lives for a single lookup.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::Session;
