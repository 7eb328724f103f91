//! Server configuration
//!
//! Read through the `config` crate from environment variables on top of
//! built-in defaults.

use std::str::FromStr;

use anyhow::{Context, Result};
use config::{Config, Environment};

use crate::uploads::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Where durable state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// In-process only; everything is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE backend '{}'", other),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub storage: StorageBackend,
    pub upload_dir: String,
    pub upload_max_bytes: usize,
}

impl ServerConfig {
    /// Load from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: listen address (default: `0.0.0.0:5000`)
    /// - `STORAGE`: `postgres` or `memory` (default: `postgres`)
    /// - `UPLOAD_DIR`: payment screenshot directory (default: `uploads`)
    /// - `UPLOAD_MAX_BYTES`: upload ceiling in bytes (default: 5000000)
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("storage", "postgres")?
            .set_default("upload_dir", DEFAULT_UPLOAD_DIR)?
            .set_default("upload_max_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read server configuration")?;

        let upload_max_bytes = settings
            .get_int("upload_max_bytes")
            .context("UPLOAD_MAX_BYTES must be an integer")?;
        if upload_max_bytes <= 0 {
            anyhow::bail!("UPLOAD_MAX_BYTES must be positive");
        }

        Ok(ServerConfig {
            bind_address: settings.get_string("bind_address")?,
            storage: settings.get_string("storage")?.parse()?,
            upload_dir: settings.get_string("upload_dir")?,
            upload_max_bytes: usize::try_from(upload_max_bytes)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        unsafe {
            std::env::remove_var("BIND_ADDRESS");
            std::env::remove_var("STORAGE");
            std::env::remove_var("UPLOAD_DIR");
            std::env::remove_var("UPLOAD_MAX_BYTES");
        }
    }

    #[test]
    #[serial]
    fn defaults() {
        clear();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.upload_dir, DEFAULT_UPLOAD_DIR);
        assert_eq!(config.upload_max_bytes, 5_000_000);
    }

    #[test]
    #[serial]
    fn reads_environment() {
        clear();
        unsafe {
            std::env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            std::env::set_var("STORAGE", "memory");
            std::env::set_var("UPLOAD_MAX_BYTES", "1024");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.upload_max_bytes, 1024);

        unsafe {
            std::env::set_var("STORAGE", "mongodb");
        }
        assert!(ServerConfig::from_env().is_err());

        clear();
    }
}
