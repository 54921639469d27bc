use axum::Router;

pub mod ai;
pub mod alerts;
pub mod auth;
pub mod inventory;
pub mod pos;
pub mod system;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/inventory", inventory::router())
        .nest("/alerts", alerts::router())
        .nest("/ai", ai::router())
        .nest("/pos", pos::router())
}
