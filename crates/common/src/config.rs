//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables (optionally via a
//! `.env` file) to keep code and config separate. LLM settings live in
//! `chronochem_llm::LlmConfig`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default number of prior chat turns included in each completion request
pub const DEFAULT_CHAT_HISTORY_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Comma-separated list of allowed CORS origins; permissive when unset
    pub cors_allowed_origins: Option<String>,

    /// JWT verification (optional; without a secret every caller is anonymous)
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    /// Number of prior turns sent along with a new chat message
    pub chat_history_limit: i64,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            cors_allowed_origins: non_empty_var("CORS_ALLOWED_ORIGINS"),

            jwt_secret: non_empty_var("JWT_SECRET"),
            jwt_issuer: non_empty_var("JWT_ISSUER"),
            jwt_audience: non_empty_var("JWT_AUDIENCE"),

            chat_history_limit: parse_history_limit(env::var("CHAT_HISTORY_LIMIT").ok())?,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "chronochem=debug".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// History limit must be a positive integer; unset falls back to the default.
fn parse_history_limit(raw: Option<String>) -> Result<i64> {
    match raw {
        None => Ok(DEFAULT_CHAT_HISTORY_LIMIT),
        Some(value) => {
            let limit: i64 = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("CHAT_HISTORY_LIMIT must be an integer"))?;
            if limit < 1 {
                return Err(anyhow::anyhow!("CHAT_HISTORY_LIMIT must be at least 1"));
            }
            Ok(limit)
        }
    }
}
