use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, middleware::Next, response::Response};
use chrono::Utc;

use barstock_auth::{JwtError, JwtValidator, Principal, TokenValidationError};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Require a valid bearer token and attach the caller as [`PrincipalContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        match e {
            JwtError::Claims(TokenValidationError::Expired) => ApiError::Unauthorized("token has expired"),
            _ => ApiError::Unauthorized("invalid token"),
        }
    })?;

    req.extensions_mut()
        .insert(PrincipalContext::new(Principal::new(claims.sub, claims.role)));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::Unauthorized("missing bearer token");

    let header = headers.get(axum::http::header::AUTHORIZATION).ok_or_else(missing)?;
    let header = header.to_str().map_err(|_| missing())?;
    let token = header.strip_prefix("Bearer ").ok_or_else(missing)?.trim();

    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}
