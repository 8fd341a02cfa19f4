//! SurrealDB implementation of [`BatchRepository`].

use agristock_core::error::Result;
use agristock_core::models::batch::{Batch, BatchStatus, CreateBatch, UpdateBatch};
use agristock_core::repository::{BatchRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BatchRow {
    hangar_id: String,
    fertilizer: String,
    quantity_kg: f64,
    status: String,
    received_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BatchRowWithId {
    record_id: String,
    hangar_id: String,
    fertilizer: String,
    quantity_kg: f64,
    status: String,
    received_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> std::result::Result<BatchStatus, DbError> {
    match s {
        "Stored" => Ok(BatchStatus::Stored),
        "Reserved" => Ok(BatchStatus::Reserved),
        "Shipped" => Ok(BatchStatus::Shipped),
        other => Err(DbError::Decode(format!("unknown batch status: {other}"))),
    }
}

impl BatchRow {
    fn into_batch(self, id: Uuid) -> std::result::Result<Batch, DbError> {
        let hangar_id = Uuid::parse_str(&self.hangar_id)
            .map_err(|e| DbError::Decode(format!("invalid hangar UUID: {e}")))?;
        Ok(Batch {
            id,
            hangar_id,
            fertilizer: self.fertilizer,
            quantity_kg: self.quantity_kg,
            status: parse_status(&self.status)?,
            received_at: self.received_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl BatchRowWithId {
    fn try_into_batch(self) -> std::result::Result<Batch, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let hangar_id = Uuid::parse_str(&self.hangar_id)
            .map_err(|e| DbError::Decode(format!("invalid hangar UUID: {e}")))?;
        Ok(Batch {
            id,
            hangar_id,
            fertilizer: self.fertilizer,
            quantity_kg: self.quantity_kg,
            status: parse_status(&self.status)?,
            received_at: self.received_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Batch repository.
#[derive(Clone)]
pub struct SurrealBatchRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBatchRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BatchRepository for SurrealBatchRepository<C> {
    async fn create(&self, input: CreateBatch) -> Result<Batch> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('batch', $id) SET \
                 hangar_id = $hangar_id, \
                 fertilizer = $fertilizer, \
                 quantity_kg = $quantity_kg, \
                 status = $status, \
                 received_at = $received_at, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("hangar_id", input.hangar_id.to_string()))
            .bind(("fertilizer", input.fertilizer))
            .bind(("quantity_kg", input.quantity_kg))
            .bind(("status", BatchStatus::Stored.as_str().to_string()))
            .bind(("received_at", input.received_at))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BatchRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "batch".into(),
            id: id_str,
        })?;

        Ok(row.into_batch(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Batch> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('batch', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BatchRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "batch".into(),
            id: id_str,
        })?;

        Ok(row.into_batch(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateBatch) -> Result<Batch> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.fertilizer.is_some() {
            sets.push("fertilizer = $fertilizer");
        }
        if input.quantity_kg.is_some() {
            sets.push("quantity_kg = $quantity_kg");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.expires_at.is_some() {
            sets.push("expires_at = $expires_at");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('batch', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(fertilizer) = input.fertilizer {
            builder = builder.bind(("fertilizer", fertilizer));
        }
        if let Some(quantity_kg) = input.quantity_kg {
            builder = builder.bind(("quantity_kg", quantity_kg));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(expires_at) = input.expires_at {
            // Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("expires_at", expires_at));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BatchRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "batch".into(),
            id: id_str,
        })?;

        Ok(row.into_batch(id)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.db
            .query("DELETE type::record('batch', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResult<Batch>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM batch GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM batch \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BatchRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_batch())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_hangar(&self, hangar_id: Uuid) -> Result<Vec<Batch>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM batch \
                 WHERE hangar_id = $hangar_id \
                 ORDER BY received_at ASC",
            )
            .bind(("hangar_id", hangar_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BatchRowWithId> = result.take(0).map_err(DbError::from)?;

        let batches = rows
            .into_iter()
            .map(|row| row.try_into_batch())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(batches)
    }
}
