//! Authentication configuration loaded from the environment

use anyhow::Result;
use axum::http::HeaderName;

use crate::{jwt::JwtConfig, rate_limiter::RateLimiterConfig};

/// Header clients send the session token in
pub const DEFAULT_TOKEN_HEADER: &str = "x-auth-token";

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    /// Request header carrying the session token
    pub token_header: HeaderName,
    /// Out-of-band key required to reset the operator secret. Reset is
    /// disabled when unset.
    pub recovery_key: Option<String>,
    pub rate_limit: RateLimiterConfig,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - everything read by [`JwtConfig::from_env`]
    /// - `AUTH_TOKEN_HEADER`: token header name (default: `x-auth-token`)
    /// - `ADMIN_RECOVERY_KEY`: operator secret reset key (optional)
    pub fn from_env() -> Result<Self> {
        let jwt = JwtConfig::from_env()?;

        let header = std::env::var("AUTH_TOKEN_HEADER")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());
        let token_header = parse_header_name(&header)?;

        let recovery_key = std::env::var("ADMIN_RECOVERY_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(AuthConfig {
            jwt,
            token_header,
            recovery_key,
            rate_limit: RateLimiterConfig::default(),
        })
    }
}

fn parse_header_name(raw: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(raw.trim().to_ascii_lowercase().as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid AUTH_TOKEN_HEADER '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_to_custom_token_header() {
        unsafe {
            std::env::set_var("JWT_SECRET", "config-test-secret");
            std::env::remove_var("AUTH_TOKEN_HEADER");
            std::env::remove_var("ADMIN_RECOVERY_KEY");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.token_header.as_str(), "x-auth-token");
        assert!(config.recovery_key.is_none());

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }

    #[test]
    #[serial]
    fn header_name_is_configurable() {
        unsafe {
            std::env::set_var("JWT_SECRET", "config-test-secret");
            std::env::set_var("AUTH_TOKEN_HEADER", "X-Session-Token");
            std::env::set_var("ADMIN_RECOVERY_KEY", "recover-me");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.token_header.as_str(), "x-session-token");
        assert_eq!(config.recovery_key.as_deref(), Some("recover-me"));

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("AUTH_TOKEN_HEADER");
            std::env::remove_var("ADMIN_RECOVERY_KEY");
        }
    }

    #[test]
    fn rejects_invalid_header_names() {
        assert!(parse_header_name("bad header").is_err());
    }
}
