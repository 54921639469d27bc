//! Uniform `{success:false, error}` responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use barstock_ai::AiError;
use barstock_auth::{AuthError, AuthzError};
use barstock_core::DomainError;
use barstock_infra::{PosError, ServiceError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    /// Details were logged where the error was converted; clients only see
    /// the generic message.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
        .into_response()
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) | DomainError::InvalidId(msg) => {
                ApiError::Validation(msg)
            }
            DomainError::NotFound => ApiError::NotFound("item not found"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store failure");
        ApiError::Internal("storage error")
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(_: AuthzError) -> Self {
        ApiError::Forbidden
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::validation(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized("invalid email or password"),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InvalidInput(msg) => ApiError::Validation(msg),
            AiError::Upstream(_) | AiError::NotConfigured => {
                tracing::error!(error = %err, "assistant request failed");
                ApiError::Internal("AI service unavailable")
            }
        }
    }
}

impl From<PosError> for ApiError {
    fn from(err: PosError) -> Self {
        match err {
            PosError::NotConnected => ApiError::validation(err.to_string()),
            PosError::Validation(msg) => ApiError::Validation(msg),
            PosError::Upstream(_) => {
                tracing::error!(error = %err, "POS request failed");
                ApiError::Internal("POS service unavailable")
            }
            PosError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(
            ApiError::from(DomainError::invariant("insufficient stock")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(DomainError::not_found()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_details_are_not_exposed() {
        let err = ApiError::from(AiError::Upstream("status 502 from https://secret.internal".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "AI service unavailable");
    }

    #[test]
    fn unknown_login_is_unauthorized() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::MissingCredentials).status(), StatusCode::BAD_REQUEST);
    }
}
