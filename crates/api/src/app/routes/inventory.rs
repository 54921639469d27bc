use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use barstock_auth::Capability;
use barstock_inventory::{ClassifiedItem, ItemPatch, NewItem, PriorityUpdate, StockChange, classify};

use crate::app::dto::{self, InventoryQuery, JsonBody, parse_item_id};
use crate::app::errors::ApiError;
use crate::app::services::{self, AppServices};
use crate::authz::require;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/stream", get(stream))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/stock", patch(adjust_stock))
        .route("/:id/priority", patch(update_priority))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<InventoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;
    let rows = services.inventory.list(&filter).await?;
    Ok(dto::ok(rows))
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = services.inventory.get(parse_item_id(&id)?).await?;
    let config = item.priority_config();
    Ok(dto::ok(ClassifiedItem {
        status: classify(item.stock, config),
        effective_priority: config.priority,
        effective_threshold: config.threshold,
        item,
    }))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    if body.touches_priority() {
        require(&principal, Capability::ManagePriorities)?;
    }
    let item = services.inventory.create(body, principal.email()).await?;
    Ok((StatusCode::CREATED, dto::ok(item)))
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ItemPatch>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    if body.touches_priority() {
        require(&principal, Capability::ManagePriorities)?;
    }
    let item = services
        .inventory
        .update(parse_item_id(&id)?, body, principal.email())
        .await?;
    Ok(dto::ok(item))
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    let id = parse_item_id(&id)?;
    services.inventory.delete(id, principal.email()).await?;
    Ok(dto::ok(serde_json::json!({ "id": id })))
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<StockChange>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ModifyStock)?;
    let item = services
        .inventory
        .adjust_stock(parse_item_id(&id)?, body, principal.email())
        .await?;
    Ok(dto::ok(item))
}

pub async fn update_priority(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<PriorityUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManagePriorities)?;
    let item = services
        .inventory
        .update_priority(parse_item_id(&id)?, body, principal.email())
        .await?;
    Ok(dto::ok(item))
}

pub async fn stream(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    services::inventory_sse_stream(services)
}
