//! Verification flows.
//!
//! Flow one: an authenticated owner re-submits content for a document
//! they own. Flow two: an anonymous caller redeems a bearer token. Both
//! recompute the content digest and check it against the stored
//! commitment, and both leave an audit entry for every attempt that
//! reaches the comparison.

pub mod flow;

pub use flow::{PublicVerificationOutcome, VerificationFlow, VerificationOutcome};
