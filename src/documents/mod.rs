//! Document records and their store.

pub mod store;
pub mod types;

pub use store::DocumentStore;
pub use types::Document;
