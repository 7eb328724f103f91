//! Auth gateway
//!
//! Resolves the session token carried in the configured header into a
//! [`Principal`], then checks the route's [`Operation`] against the policy
//! table before the handler runs.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::{error, warn};

use crate::{error::AuthError, models::Principal, policy::Operation, state::AuthState};

impl AuthState {
    /// Verify the token in `headers` and resolve the caller
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = headers
            .get(&self.config.token_header)
            .and_then(|header| header.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Unauthenticated("No token, authorization denied"))?;

        let claims = self.tokens.verify(token).map_err(|e| {
            warn!("Rejected token: {}", e);
            AuthError::from(e)
        })?;

        let revoked = self.revocations.is_revoked(claims.jti).await.map_err(|e| {
            error!("Failed to check token revocation: {}", e);
            AuthError::internal(e)
        })?;

        if revoked {
            return Err(AuthError::Unauthenticated("Token has been revoked"));
        }

        Ok(Principal::from(claims))
    }

    /// Gateway state for one protected operation
    pub fn guard(&self, operation: Operation) -> Guard {
        Guard {
            state: self.clone(),
            operation,
        }
    }
}

/// Middleware state pairing the auth state with the operation a route performs
#[derive(Clone)]
pub struct Guard {
    state: AuthState,
    operation: Operation,
}

/// Authenticate, authorize, and attach the [`Principal`] to the request
pub async fn authorize(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = guard.state.authenticate(req.headers()).await?;
    guard.operation.authorize(&principal)?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Put a method router behind the gateway for `operation`
pub fn guarded<S>(route: MethodRouter<S>, auth: &AuthState, operation: Operation) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(auth.guard(operation), authorize))
}
