//! JWT service for session token issuance and verification
//!
//! Tokens are HS256-signed and self-contained: the payload carries the
//! principal id, its role, the operator username when relevant, a token id
//! for revocation, and an expiry. Nothing is stored server side at issue
//! time.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Principal, Role};

/// Customer tokens live for 48 hours
pub const DEFAULT_CUSTOMER_TOKEN_EXPIRY: u64 = 48 * 60 * 60;
/// Operator tokens live for 24 hours
pub const DEFAULT_OPERATOR_TOKEN_EXPIRY: u64 = 24 * 60 * 60;

const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Customer token lifetime in seconds
    pub customer_token_expiry: u64,
    /// Operator token lifetime in seconds
    pub operator_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (required)
    /// - `JWT_CUSTOMER_TOKEN_EXPIRY`: Customer token expiry in seconds (default: 172800)
    /// - `JWT_OPERATOR_TOKEN_EXPIRY`: Operator token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            warn!(
                "JWT_SECRET is shorter than {} bytes; tokens are easier to forge",
                MIN_RECOMMENDED_SECRET_LEN
            );
        }

        let customer_token_expiry = std::env::var("JWT_CUSTOMER_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CUSTOMER_TOKEN_EXPIRY);

        let operator_token_expiry = std::env::var("JWT_OPERATOR_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_OPERATOR_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            customer_token_expiry,
            operator_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID
    pub sub: Uuid,
    /// Principal role
    pub role: Role,
    /// Operator username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token ID
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal {
            id: claims.sub,
            role: claims.role,
            username: claims.username,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Token verification and signing failures
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, or unexpected claims
    #[error("Token is not valid")]
    InvalidToken,

    /// Signature is fine but the token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Signing failed
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// System clock is before the Unix epoch
    #[error("Failed to get current time: {0}")]
    Clock(String),
}

/// Seconds since the Unix epoch
pub fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Clock(e.to_string()))
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a token for a principal
    pub fn issue(
        &self,
        principal_id: Uuid,
        role: Role,
        username: Option<&str>,
    ) -> Result<String, TokenError> {
        self.issue_at(principal_id, role, username, now_secs()?)
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(
        &self,
        principal_id: Uuid,
        role: Role,
        username: Option<&str>,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: principal_id,
            role,
            username: username.map(str::to_string),
            jti: Uuid::new_v4(),
            iat: issued_at,
            exp: issued_at + self.expiry_for(role),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Validate a token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidToken,
            })
    }

    /// Token lifetime in seconds for a role
    pub fn expiry_for(&self, role: Role) -> u64 {
        match role {
            Role::Customer => self.config.customer_token_expiry,
            Role::Operator => self.config.operator_token_expiry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            customer_token_expiry: DEFAULT_CUSTOMER_TOKEN_EXPIRY,
            operator_token_expiry: DEFAULT_OPERATOR_TOKEN_EXPIRY,
        })
    }

    #[test]
    fn issued_token_verifies_before_expiry() {
        let tokens = service();
        let id = Uuid::new_v4();

        let token = tokens.issue(id, Role::Customer, None).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.username, None);
        assert_eq!(claims.exp - claims.iat, DEFAULT_CUSTOMER_TOKEN_EXPIRY);
    }

    #[test]
    fn operator_token_carries_username_and_shorter_expiry() {
        let tokens = service();
        let token = tokens
            .issue(Uuid::new_v4(), Role::Operator, Some("root"))
            .unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.role, Role::Operator);
        assert_eq!(claims.username.as_deref(), Some("root"));
        assert_eq!(claims.exp - claims.iat, DEFAULT_OPERATOR_TOKEN_EXPIRY);
    }

    #[test]
    fn token_past_expiry_is_expired() {
        let tokens = service();
        let issued_at = now_secs().unwrap() - DEFAULT_CUSTOMER_TOKEN_EXPIRY - 3600;
        let token = tokens
            .issue_at(Uuid::new_v4(), Role::Customer, None, issued_at)
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn operator_token_expires_after_a_day() {
        let tokens = service();
        let issued_at = now_secs().unwrap() - DEFAULT_OPERATOR_TOKEN_EXPIRY - 60;
        let token = tokens
            .issue_at(Uuid::new_v4(), Role::Operator, Some("root"), issued_at)
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn altered_payload_is_invalid() {
        let tokens = service();
        let token = tokens.issue(Uuid::new_v4(), Role::Customer, None).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let other = tokens.issue(Uuid::new_v4(), Role::Operator, Some("x")).unwrap();
        parts[1] = other.split('.').nth(1).unwrap().to_string();
        let forged = parts.join(".");

        assert!(matches!(tokens.verify(&forged), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn altered_signature_is_invalid() {
        let tokens = service();
        let token = tokens.issue(Uuid::new_v4(), Role::Customer, None).unwrap();
        let (head, signature) = token.rsplit_once('.').unwrap();
        let flipped: String = signature.chars().rev().collect();
        let forged = format!("{}.{}", head, flipped);

        assert!(matches!(tokens.verify(&forged), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = TokenService::new(JwtConfig {
            secret: "a-completely-different-signing-secret".to_string(),
            customer_token_expiry: DEFAULT_CUSTOMER_TOKEN_EXPIRY,
            operator_token_expiry: DEFAULT_OPERATOR_TOKEN_EXPIRY,
        });
        let token = other.issue(Uuid::new_v4(), Role::Operator, None).unwrap();

        assert!(matches!(service().verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", "env-secret");
            std::env::remove_var("JWT_CUSTOMER_TOKEN_EXPIRY");
            std::env::set_var("JWT_OPERATOR_TOKEN_EXPIRY", "600");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.customer_token_expiry, DEFAULT_CUSTOMER_TOKEN_EXPIRY);
        assert_eq!(config.operator_token_expiry, 600);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_OPERATOR_TOKEN_EXPIRY");
        }
        assert!(JwtConfig::from_env().is_err());
    }
}
