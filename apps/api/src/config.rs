use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which `ResumeStore` implementation the service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{other}' (expected postgres or memory)"),
        }
    }
}

/// How a single-resource read answers a caller who does not own the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Foreign resumes are reported exactly like missing ones (404).
    Conceal,
    /// Foreign resumes are reported as forbidden (403).
    Reveal,
}

impl FromStr for OwnershipPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conceal" => Ok(OwnershipPolicy::Conceal),
            "reveal" => Ok(OwnershipPolicy::Reveal),
            other => bail!("unknown ownership policy '{other}' (expected conceal or reveal)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub auth_user_header: String,
    pub ownership_policy: OwnershipPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage: StorageBackend = env_or("STORAGE_BACKEND", "postgres")
            .parse()
            .context("STORAGE_BACKEND is invalid")?;

        let database_url = match storage {
            StorageBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            storage,
            database_url,
            auth_user_header: env_or("AUTH_USER_HEADER", "x-authenticated-user"),
            ownership_policy: env_or("OWNERSHIP_POLICY", "conceal")
                .parse()
                .context("OWNERSHIP_POLICY is invalid")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
