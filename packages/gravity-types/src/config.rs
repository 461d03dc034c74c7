//! Startup configuration
//!
//! The gravity id is the domain separator mixed into every checkpoint a
//! validator signs. It is loaded once at startup and passed by reference to
//! whatever validates signatures.

use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Deserializer};
use std::env;
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::hash::{bytes32_to_hex, right_pad_bytes32};

/// 32-byte domain separator, `bytes32 gravityId` on the Ethereum contract
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GravityId([u8; 32]);

impl GravityId {
    /// Build from an id string of at most 32 bytes, right-padded with zeros
    pub fn new(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(eyre!("gravity id cannot be empty"));
        }
        let word = right_pad_bytes32(id.as_bytes()).ok_or_else(|| {
            eyre!(
                "gravity id must be at most 32 bytes, got {} bytes",
                id.len()
            )
        })?;
        Ok(GravityId(word))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        GravityId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for GravityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GravityId({})", bytes32_to_hex(&self.0))
    }
}

impl fmt::Display for GravityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..end]))
    }
}

impl<'de> Deserialize<'de> for GravityId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = String::deserialize(deserializer)?;
        GravityId::new(&id).map_err(serde::de::Error::custom)
    }
}

/// Configuration for attestation validation
#[derive(Debug, Clone, Deserialize)]
pub struct GravityConfig {
    pub gravity_id: GravityId,
}

impl GravityConfig {
    /// Load configuration from environment variables
    /// Loads .env file if present, then reads from environment
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env")
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let raw = env::var("GRAVITY_ID")
            .map_err(|_| eyre!("GRAVITY_ID environment variable is required"))?;
        let gravity_id = GravityId::new(raw.trim()).wrap_err("GRAVITY_ID is invalid")?;

        let config = GravityConfig { gravity_id };
        info!(gravity_id = %config.gravity_id, "Gravity configuration loaded");
        Ok(config)
    }
}
