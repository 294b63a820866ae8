//! Bounded-use verification tokens.
//!
//! A token lets a third party verify one document a limited number of
//! times without an account. The bearer secret is the credential; usage
//! is claimed atomically so concurrent redemptions can never push the
//! counter past its limit.

pub mod store;
pub mod types;

pub use store::TokenStore;
pub use types::{OwnedToken, TokenUsage, VerificationToken, DEFAULT_USAGE_LIMIT};
