use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, routing::get};
use chrono::Utc;

use barstock_auth::{JwtClaims, UserDirectory, authenticate};

use crate::app::dto::{self, JsonBody, LoginRequest, LoginResponse, UserView};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Authenticated auth routes. `login` is mounted publicly in `build_app`.
pub fn router() -> Router {
    Router::new().route("/me", get(me))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&*services.users, &body.email, &body.password).map_err(|e| {
        tracing::info!(email = %body.email.trim(), "login failed");
        ApiError::from(e)
    })?;

    let claims = JwtClaims::new(user.email.clone(), user.role, Utc::now(), services.token_ttl);
    let token = services.jwt.issue(&claims).map_err(|e| {
        tracing::error!(error = %e, "failed to sign token");
        ApiError::Internal("could not issue token")
    })?;

    tracing::info!(email = %user.email, role = user.role.as_str(), "login succeeded");
    Ok(dto::ok(LoginResponse {
        token,
        expires_at: claims.expires_at,
        user: UserView::from(&user),
    }))
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    // The token carries the role; the directory only adds the display name.
    let display_name = services
        .users
        .find(principal.email())
        .map(|u| u.display_name)
        .unwrap_or_else(|| principal.email().to_string());

    dto::ok(UserView {
        email: principal.email().to_string(),
        display_name,
        role: principal.role(),
        permissions: principal.permissions(),
    })
}
