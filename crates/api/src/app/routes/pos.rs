use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post},
};

use barstock_auth::Capability;
use barstock_infra::{PosConfigUpdate, PosMapping};

use crate::app::dto::{self, JsonBody};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::require;
use crate::context::PrincipalContext;

/// Every POS route needs `canManageProducts`.
pub fn router() -> Router {
    Router::new()
        .route("/config", get(get_config).post(save_config).delete(disconnect))
        .route("/sync", post(sync))
        .route("/mappings", get(list_mappings).post(add_mapping))
        .route("/mappings/:pos_item_id", delete(remove_mapping))
}

pub async fn get_config(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    Ok(dto::ok(services.pos.config().await?))
}

pub async fn save_config(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<PosConfigUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    Ok(dto::ok(services.pos.save(body).await?))
}

pub async fn disconnect(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    Ok(dto::ok(services.pos.disconnect().await?))
}

pub async fn sync(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    Ok(dto::ok(services.pos.sync().await?))
}

pub async fn list_mappings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    Ok(dto::ok(services.pos.mappings().await?))
}

pub async fn add_mapping(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<PosMapping>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    let mapping = services
        .pos
        .map_item(&services.inventory, body, principal.email())
        .await?;
    Ok(dto::ok(mapping))
}

pub async fn remove_mapping(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(pos_item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, Capability::ManageProducts)?;
    if !services
        .pos
        .unmap_item(&services.inventory, &pos_item_id, principal.email())
        .await?
    {
        return Err(ApiError::NotFound("mapping not found"));
    }
    Ok(dto::ok(serde_json::json!({ "posItemId": pos_item_id })))
}
