//! Request/response DTOs and the success envelope.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use barstock_ai::ChatMessage;
use barstock_auth::{Permissions, UserRecord};
use barstock_core::ItemId;
use barstock_inventory::{AlertCounts, AlertSummary, ItemFilter, StockStatus};

use crate::app::errors::ApiError;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

/// `Json<T>` whose rejection uses the error envelope.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse().map_err(|_| ApiError::validation("invalid item id"))
}

// -------------------------
// Auth
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub email: String,
    pub display_name: String,
    pub role: barstock_auth::Role,
    pub permissions: Permissions,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            permissions: Permissions::for_role(user.role),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserView,
}

// -------------------------
// Inventory
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl InventoryQuery {
    pub fn into_filter(self) -> Result<ItemFilter, ApiError> {
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<StockStatus>()
                    .map_err(|_| ApiError::validation(format!("unknown status '{raw}'")))?,
            ),
            None => None,
        };
        Ok(ItemFilter {
            category: self.category,
            status,
            search: self.search,
        })
    }
}

// -------------------------
// Alerts
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    #[serde(flatten)]
    pub summary: AlertSummary,
    pub counts: AlertCounts,
    pub refreshed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub list: Option<String>,
}

impl ExportQuery {
    pub fn is_shopping_list(&self) -> bool {
        self.list.as_deref().is_some_and(|l| l.eq_ignore_ascii_case("shopping"))
    }
}

// -------------------------
// AI
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}
