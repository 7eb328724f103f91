//! Customer account and operator bootstrap routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::error::DatabaseError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    extract::AppJson,
    jwt::now_secs,
    middleware::guarded,
    models::{
        CustomerProfile, CustomerSummary, NewCustomer, NewOperator, Principal, Role,
        UpdateCustomer,
    },
    password::{constant_time_eq, hash_secret, verify_secret},
    policy::Operation,
    state::AuthState,
    validation::{
        normalize_email, validate_email, validate_password, validate_secret_key,
        validate_username,
    },
};

/// The recovery key is one server-wide secret, so every reset attempt shares
/// a single budget no matter which username it names
const RESET_LIMITER_KEY: &str = "admin_reset";

/// Request for customer registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for customer login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response carrying a freshly issued customer token
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: CustomerSummary,
}

/// Request for a profile update
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Operator bootstrap and login payload
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub secret_key: String,
}

/// Operator secret reset payload
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSecretRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub new_secret_key: String,
    #[serde(default)]
    pub recovery_key: String,
}

/// Response for operator login
#[derive(Serialize)]
pub struct OperatorLoginResponse {
    pub success: bool,
    pub token: String,
    pub username: String,
}

/// Create the router for customer accounts and operator bootstrap
pub fn create_router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", guarded(get(me), &state, Operation::ReadProfile))
        .route(
            "/auth/update",
            guarded(put(update_profile), &state, Operation::UpdateProfile),
        )
        .route(
            "/auth/logout",
            guarded(post(logout), &state, Operation::CustomerLogout),
        )
        .route("/admin/check", get(admin_check))
        .route("/admin/init", post(admin_init))
        .route("/admin/login", post(admin_login))
        .route("/admin/reset", post(admin_reset))
        .route(
            "/admin/logout",
            guarded(post(logout), &state, Operation::OperatorLogout),
        )
        .with_state(state)
}

fn check<T>(result: Result<T, String>) -> AuthResult<T> {
    result.map_err(AuthError::Validation)
}

/// Customer registration endpoint
pub async fn register(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AuthResult<impl IntoResponse> {
    let username = payload.username.trim().to_string();
    let email = normalize_email(&payload.email);
    check(validate_username(&username))?;
    check(validate_email(&email))?;
    check(validate_password(&payload.password))?;

    if state.customers.find_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_secret(payload.password)
        .await
        .map_err(AuthError::internal)?;

    let customer = state
        .customers
        .create(NewCustomer {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => AuthError::DuplicateEmail,
            other => AuthError::Database(other),
        })?;

    info!("Registered customer {}", customer.id);

    let token = state.tokens.issue(customer.id, Role::Customer, None)?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user: CustomerSummary::from(&customer),
        }),
    ))
}

/// Customer login endpoint
pub async fn login(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AuthResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let limiter_key = format!("customer:{}", email);
    if !state.rate_limiter.is_allowed(&limiter_key).await {
        warn!("Login throttled for {}", email);
        return Err(AuthError::TooManyAttempts);
    }

    let customer = state
        .customers
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let matches = verify_secret(customer.password_hash.clone(), payload.password)
        .await
        .map_err(AuthError::internal)?;
    if !matches {
        warn!("Failed login for customer {}", customer.id);
        return Err(AuthError::InvalidCredentials);
    }

    state.rate_limiter.reset(&limiter_key).await;

    let token = state.tokens.issue(customer.id, Role::Customer, None)?;
    Ok(Json(TokenResponse {
        token,
        user: CustomerSummary::from(&customer),
    }))
}

/// Current customer profile
pub async fn me(
    State(state): State<AuthState>,
    Extension(principal): Extension<Principal>,
) -> AuthResult<impl IntoResponse> {
    let customer = state
        .customers
        .find_by_id(principal.id)
        .await?
        .ok_or(AuthError::NotFound("User not found"))?;

    Ok(Json(CustomerProfile::from(&customer)))
}

/// Update username and/or password
pub async fn update_profile(
    State(state): State<AuthState>,
    Extension(principal): Extension<Principal>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AuthResult<impl IntoResponse> {
    let mut changes = UpdateCustomer::default();

    if let Some(username) = payload.username.filter(|u| !u.trim().is_empty()) {
        let username = username.trim().to_string();
        check(validate_username(&username))?;
        changes.username = Some(username);
    }

    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        check(validate_password(&password))?;
        changes.password_hash = Some(hash_secret(password).await.map_err(AuthError::internal)?);
    }

    if !changes.is_empty() {
        state
            .customers
            .update(principal.id, changes)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound => AuthError::NotFound("User not found"),
                other => AuthError::Database(other),
            })?;
        info!("Updated profile for customer {}", principal.id);
    }

    Ok(Json(json!({ "message": "Profile updated successfully" })))
}

/// Revoke the caller's token until it would have expired
pub async fn logout(
    State(state): State<AuthState>,
    Extension(principal): Extension<Principal>,
) -> AuthResult<impl IntoResponse> {
    let remaining = principal.expires_at.saturating_sub(now_secs()?);
    state
        .revocations
        .revoke(principal.token_id, remaining)
        .await
        .map_err(AuthError::internal)?;

    info!("Revoked token for {} {}", principal.role, principal.id);
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// Report whether the operator has been bootstrapped
pub async fn admin_check(State(state): State<AuthState>) -> AuthResult<impl IntoResponse> {
    let count = state.operators.count().await?;
    Ok(Json(json!({ "initialized": count > 0 })))
}

/// One-time operator bootstrap
pub async fn admin_init(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<OperatorCredentials>,
) -> AuthResult<impl IntoResponse> {
    if state.operators.count().await? > 0 {
        return Err(AuthError::AlreadyInitialized);
    }

    let username = payload.username.trim().to_string();
    check(validate_username(&username))?;
    check(validate_secret_key(&payload.secret_key))?;

    let secret_hash = hash_secret(payload.secret_key)
        .await
        .map_err(AuthError::internal)?;

    let operator = state
        .operators
        .create(NewOperator {
            username,
            secret_hash,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => AuthError::AlreadyInitialized,
            other => AuthError::Database(other),
        })?;

    info!("Operator {} initialized", operator.username);
    Ok(Json(json!({ "success": true, "message": "Admin initialized" })))
}

/// Operator login endpoint
pub async fn admin_login(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<OperatorCredentials>,
) -> AuthResult<impl IntoResponse> {
    let username = payload.username.trim().to_string();
    let limiter_key = format!("operator:{}", username);
    if !state.rate_limiter.is_allowed(&limiter_key).await {
        warn!("Operator login throttled for {}", username);
        return Err(AuthError::TooManyAttempts);
    }

    let operator = state
        .operators
        .find_by_username(&username)
        .await?
        .ok_or(AuthError::InvalidUsername)?;

    let matches = verify_secret(operator.secret_hash.clone(), payload.secret_key)
        .await
        .map_err(AuthError::internal)?;
    if !matches {
        warn!("Failed operator login for {}", username);
        return Err(AuthError::InvalidSecretKey);
    }

    state.rate_limiter.reset(&limiter_key).await;

    let token = state
        .tokens
        .issue(operator.id, Role::Operator, Some(&operator.username))?;

    Ok(Json(OperatorLoginResponse {
        success: true,
        token,
        username: operator.username,
    }))
}

/// Reset the operator secret with the out-of-band recovery key
pub async fn admin_reset(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<ResetSecretRequest>,
) -> AuthResult<impl IntoResponse> {
    let expected = state
        .config
        .recovery_key
        .as_deref()
        .ok_or(AuthError::RecoveryDisabled)?;

    let username = payload.username.trim().to_string();
    if !state.rate_limiter.is_allowed(RESET_LIMITER_KEY).await {
        return Err(AuthError::TooManyAttempts);
    }

    if !constant_time_eq(expected.as_bytes(), payload.recovery_key.as_bytes()) {
        warn!("Secret reset attempted with a wrong recovery key for {}", username);
        return Err(AuthError::InvalidRecoveryKey);
    }

    check(validate_secret_key(&payload.new_secret_key))?;

    if state.operators.find_by_username(&username).await?.is_none() {
        return Err(AuthError::NotFound("Username not found"));
    }

    let secret_hash = hash_secret(payload.new_secret_key)
        .await
        .map_err(AuthError::internal)?;

    state
        .operators
        .reset_secret(&username, &secret_hash)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound => AuthError::NotFound("Username not found"),
            other => AuthError::Database(other),
        })?;

    state.rate_limiter.reset(RESET_LIMITER_KEY).await;
    info!("Operator secret reset for {}", username);

    Ok(Json(json!({ "success": true, "message": "Secret key reset successfully" })))
}
