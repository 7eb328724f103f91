//! Argon2 hashing for customer passwords and the operator secret key

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a secret into a PHC string. Runs on the blocking pool.
pub async fn hash_secret(secret: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_secret_blocking(&secret)).await?
}

/// Check a candidate against a stored PHC string. Runs on the blocking pool.
pub async fn verify_secret(stored_hash: String, candidate: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_secret_blocking(&stored_hash, &candidate)).await?
}

fn hash_secret_blocking(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_secret_blocking(stored_hash: &str, candidate: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Compare two byte strings without short-circuiting on the first mismatch
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
