pub mod api;
pub mod audit;
pub mod commitment;
pub mod config;
pub mod database;
pub mod documents;
pub mod error;
pub mod identity;
pub mod tokens;
pub mod verification;

pub use error::AttestorError;
