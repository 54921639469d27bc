//! Postgres-backed document stores (feature `postgres`).
//!
//! Each inventory item is one JSONB document keyed by its id; the POS
//! settings live in a single-row table. The schema is created on startup.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use barstock_core::ItemId;
use barstock_inventory::InventoryItem;

use super::{InventoryStore, StoreError};
use crate::pos::{PosConfig, PosConfigStore};

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

/// Create both tables when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_items (
            id UUID PRIMARY KEY,
            doc JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(backend)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pos_config (
            singleton BOOLEAN PRIMARY KEY DEFAULT TRUE CHECK (singleton),
            doc JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(backend)?;
    Ok(())
}

pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM inventory_items")
            .fetch_all(&*self.pool)
            .await
            .map_err(backend)?;

        rows.iter()
            .map(|row| row.try_get::<Json<InventoryItem>, _>("doc").map(|d| d.0).map_err(corrupt))
            .collect()
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let row = sqlx::query("SELECT doc FROM inventory_items WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(backend)?;

        row.map(|r| r.try_get::<Json<InventoryItem>, _>("doc").map(|d| d.0).map_err(corrupt))
            .transpose()
    }

    async fn put(&self, item: &InventoryItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (id, doc, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET doc = EXCLUDED.doc, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*item.id.as_uuid())
        .bind(Json(item))
        .bind(item.last_updated)
        .execute(&*self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresPosConfigStore {
    pool: Arc<PgPool>,
}

impl PostgresPosConfigStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PosConfigStore for PostgresPosConfigStore {
    async fn load(&self) -> Result<PosConfig, StoreError> {
        let row = sqlx::query("SELECT doc FROM pos_config WHERE singleton")
            .fetch_optional(&*self.pool)
            .await
            .map_err(backend)?;

        match row {
            Some(r) => Ok(r.try_get::<Json<PosConfig>, _>("doc").map_err(corrupt)?.0),
            None => Ok(PosConfig::default()),
        }
    }

    async fn save(&self, config: &PosConfig) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pos_config (singleton, doc, updated_at)
            VALUES (TRUE, $1, NOW())
            ON CONFLICT (singleton)
            DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()
            "#,
        )
        .bind(Json(config))
        .execute(&*self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}
