use crate::error::AttestorError;
use std::env;

/// Runtime settings, read once at startup.
///
/// Both secrets are required: startup fails when either is missing.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Key material for content commitments. Never logged or serialized.
    pub commitment_secret: String,
    /// Signing key for caller identity tokens.
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AttestorError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://attestor.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| AttestorError::ConfigError(format!("Invalid SERVER_PORT: {}", e)))?;

        let commitment_secret = env::var("COMMITMENT_SECRET")
            .map_err(|_| AttestorError::ConfigError("COMMITMENT_SECRET must be set".to_string()))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AttestorError::ConfigError("JWT_SECRET must be set".to_string()))?;

        Ok(AppConfig {
            database_url,
            server_host,
            server_port,
            commitment_secret,
            jwt_secret,
        })
    }
}
