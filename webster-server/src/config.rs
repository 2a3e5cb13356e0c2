//! Server configuration from environment variables.
//!
//! A `.env` file is honored when present. Only `DATABASE_URL` is required;
//! everything else has development defaults.

use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum upload size in bytes (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Port the HTTP listener binds.
    pub port: u16,
    /// HMAC secret for JWT signing.
    pub jwt_secret: String,
    /// Token lifetime in hours.
    pub jwt_expiry_hours: i64,
    /// Directory served under `/public`; uploads land beneath it.
    pub public_dir: PathBuf,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let port = std::env::var("WEBSTER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = match std::env::var("WEBSTER_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                // Ephemeral secret: fine for development, sessions die on restart.
                let secret = uuid::Uuid::new_v4().to_string();
                tracing::warn!("WEBSTER_JWT_SECRET not set, using a generated secret");
                secret
            }
        };

        let jwt_expiry_hours = std::env::var("WEBSTER_JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        let public_dir = std::env::var("WEBSTER_PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let max_upload_bytes = std::env::var("WEBSTER_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let allowed_origins = std::env::var("WEBSTER_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(), // Vite
                    "http://127.0.0.1:3000".to_string(),
                    "http://127.0.0.1:5173".to_string(),
                ]
            });

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            jwt_expiry_hours,
            public_dir,
            max_upload_bytes,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_parsing() {
        let raw = "http://a.example, http://b.example ,";
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        assert_eq!(origins, vec!["http://a.example", "http://b.example"]);
    }
}
