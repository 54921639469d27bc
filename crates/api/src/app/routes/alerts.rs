use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::Query,
    http::header,
    response::IntoResponse,
    routing::get,
};

use barstock_inventory::{AlertSummary, alerts_csv, shopping_list, shopping_list_csv};

use crate::app::dto::{self, AlertsResponse, ExportQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_alerts))
        .route("/shopping-list", get(get_shopping_list))
        .route("/export", get(export_csv))
}

/// Capped alert view from the live snapshot.
pub async fn list_alerts(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let snapshot = services.alerts.snapshot();
    dto::ok(AlertsResponse {
        summary: AlertSummary::from_alerts(&snapshot.alerts),
        counts: snapshot.counts,
        refreshed_at: snapshot.refreshed_at,
    })
}

pub async fn get_shopping_list(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let snapshot = services.alerts.snapshot();
    dto::ok(shopping_list(&snapshot.alerts))
}

pub async fn export_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = services.alerts.snapshot();
    let (body, filename) = if query.is_shopping_list() {
        (shopping_list_csv(&snapshot.alerts), "shopping-list.csv")
    } else {
        (alerts_csv(&snapshot.alerts), "inventory-alerts.csv")
    };
    let body = body.map_err(|e| {
        tracing::error!(error = %e, "failed to encode CSV export");
        ApiError::Internal("failed to export alerts")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    ))
}
