//! Environment-driven configuration.
//!
//! Every setting arrives through a `MOLT_*` environment variable; the
//! external scheduler owns credential storage and injects the key material
//! per invocation.

use std::fmt;
use std::path::PathBuf;

use crate::error::{MoltError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";

/// The platform serves at most this many posts per timeline sweep.
const DEFAULT_FETCH_CAP: usize = 3200;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Consumer key pair (`MOLT_API_KEY` / `MOLT_API_SECRET`).
    pub consumer: Option<KeyPair>,

    /// User access token pair (`MOLT_ACCESS_TOKEN` / `MOLT_ACCESS_TOKEN_SECRET`).
    pub access: Option<KeyPair>,

    /// Target account ID; resolved via the API when unset.
    pub user_id: Option<String>,

    /// Directory holding the pending queue and last-run marker.
    pub state_dir: PathBuf,

    /// API origin; overridable so tests can point at a local mock.
    pub api_base_url: String,

    /// Ceiling on posts fetched in one retrieval sweep.
    pub fetch_cap: usize,

    pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct KeyPair {
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let state_dir = match env_string("MOLT_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };

        Ok(Self {
            consumer: key_pair("MOLT_API_KEY", "MOLT_API_SECRET")?,
            access: key_pair("MOLT_ACCESS_TOKEN", "MOLT_ACCESS_TOKEN_SECRET")?,
            user_id: env_string("MOLT_USER_ID"),
            state_dir,
            api_base_url: env_string("MOLT_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            fetch_cap: env_usize("MOLT_FETCH_CAP")?.unwrap_or(DEFAULT_FETCH_CAP),
            timeout_secs: env_u64("MOLT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn consumer(&self) -> Result<&KeyPair> {
        self.consumer.as_ref().ok_or_else(|| {
            MoltError::MissingConfig("MOLT_API_KEY / MOLT_API_SECRET".to_string())
        })
    }

    pub fn access(&self) -> Result<&KeyPair> {
        self.access.as_ref().ok_or_else(|| {
            MoltError::MissingConfig("MOLT_ACCESS_TOKEN / MOLT_ACCESS_TOKEN_SECRET".to_string())
        })
    }
}

fn key_pair(key_var: &str, secret_var: &str) -> Result<Option<KeyPair>> {
    match (env_string(key_var), env_string(secret_var)) {
        (Some(key), Some(secret)) => Ok(Some(KeyPair { key, secret })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(MoltError::Config(format!(
            "{key_var} is set but {secret_var} is not"
        ))),
        (None, Some(_)) => Err(MoltError::Config(format!(
            "{secret_var} is set but {key_var} is not"
        ))),
    }
}

fn default_state_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| MoltError::MissingConfig("data directory not found".to_string()))?;
    Ok(data_dir.join("molt"))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| MoltError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| MoltError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
