//! SurrealDB implementation of [`AlertRepository`].

use agristock_core::error::Result;
use agristock_core::models::alert::{Alert, AlertSeverity, CreateAlert};
use agristock_core::repository::{AlertRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AlertRow {
    severity: String,
    message: String,
    hangar_id: Option<String>,
    batch_id: Option<String>,
    acknowledged: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AlertRowWithId {
    record_id: String,
    severity: String,
    message: String,
    hangar_id: Option<String>,
    batch_id: Option<String>,
    acknowledged: bool,
    created_at: DateTime<Utc>,
}

fn parse_severity(s: &str) -> std::result::Result<AlertSeverity, DbError> {
    match s {
        "Info" => Ok(AlertSeverity::Info),
        "Warning" => Ok(AlertSeverity::Warning),
        "Critical" => Ok(AlertSeverity::Critical),
        other => Err(DbError::Decode(format!("unknown severity: {other}"))),
    }
}

fn parse_opt_uuid(
    value: Option<String>,
    what: &str,
) -> std::result::Result<Option<Uuid>, DbError> {
    value
        .map(|v| {
            Uuid::parse_str(&v).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
        })
        .transpose()
}

impl AlertRow {
    fn into_alert(self, id: Uuid) -> std::result::Result<Alert, DbError> {
        Ok(Alert {
            id,
            severity: parse_severity(&self.severity)?,
            message: self.message,
            hangar_id: parse_opt_uuid(self.hangar_id, "hangar")?,
            batch_id: parse_opt_uuid(self.batch_id, "batch")?,
            acknowledged: self.acknowledged,
            created_at: self.created_at,
        })
    }
}

impl AlertRowWithId {
    fn try_into_alert(self) -> std::result::Result<Alert, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Alert {
            id,
            severity: parse_severity(&self.severity)?,
            message: self.message,
            hangar_id: parse_opt_uuid(self.hangar_id, "hangar")?,
            batch_id: parse_opt_uuid(self.batch_id, "batch")?,
            acknowledged: self.acknowledged,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Alert repository.
#[derive(Clone)]
pub struct SurrealAlertRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAlertRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AlertRepository for SurrealAlertRepository<C> {
    async fn create(&self, input: CreateAlert) -> Result<Alert> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('alert', $id) SET \
                 severity = $severity, \
                 message = $message, \
                 hangar_id = $hangar_id, \
                 batch_id = $batch_id, \
                 acknowledged = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("severity", input.severity.as_str().to_string()))
            .bind(("message", input.message))
            .bind(("hangar_id", input.hangar_id.map(|h| h.to_string())))
            .bind(("batch_id", input.batch_id.map(|b| b.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AlertRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "alert".into(),
            id: id_str,
        })?;

        Ok(row.into_alert(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Alert> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('alert', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AlertRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "alert".into(),
            id: id_str,
        })?;

        Ok(row.into_alert(id)?)
    }

    async fn acknowledge(&self, id: Uuid) -> Result<Alert> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('alert', $id) SET acknowledged = true")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AlertRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "alert".into(),
            id: id_str,
        })?;

        Ok(row.into_alert(id)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.db
            .query("DELETE type::record('alert', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResult<Alert>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM alert GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM alert \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AlertRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_alert())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
