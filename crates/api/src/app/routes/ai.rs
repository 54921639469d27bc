use std::sync::Arc;

use axum::{Extension, Json, Router, response::IntoResponse, routing::post};

use barstock_ai::{AssistantReply, AssistantTask};

use crate::app::dto::{self, ChatRequest, Envelope, JsonBody};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/predictions", post(predictions))
        .route("/shopping-list", post(shopping_list))
        .route("/insights", post(insights))
}

/// Answers use the live snapshot's items, the same view the alerts show.
async fn run(services: &AppServices, task: AssistantTask) -> Result<Json<Envelope<AssistantReply>>, ApiError> {
    let snapshot = services.alerts.snapshot();
    let reply = services.assistant.run(&task, &snapshot.items).await?;
    Ok(dto::ok(reply))
}

pub async fn chat(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task = AssistantTask::Chat {
        message: body.message,
        history: body.history,
    };
    run(&services, task).await
}

pub async fn predictions(Extension(services): Extension<Arc<AppServices>>) -> Result<impl IntoResponse, ApiError> {
    run(&services, AssistantTask::Predictions).await
}

pub async fn shopping_list(Extension(services): Extension<Arc<AppServices>>) -> Result<impl IntoResponse, ApiError> {
    run(&services, AssistantTask::ShoppingList).await
}

pub async fn insights(Extension(services): Extension<Arc<AppServices>>) -> Result<impl IntoResponse, ApiError> {
    run(&services, AssistantTask::Insights).await
}
