//! SurrealDB implementation of [`InterventionRepository`].

use agristock_core::error::Result;
use agristock_core::models::intervention::{
    CreateIntervention, Intervention, InterventionStatus, UpdateIntervention,
};
use agristock_core::repository::{InterventionRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::user::parse_team_id;

#[derive(Debug, SurrealValue)]
struct InterventionRow {
    hangar_id: String,
    team_id: Option<String>,
    title: String,
    description: String,
    status: String,
    scheduled_for: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct InterventionRowWithId {
    record_id: String,
    hangar_id: String,
    team_id: Option<String>,
    title: String,
    description: String,
    status: String,
    scheduled_for: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> std::result::Result<InterventionStatus, DbError> {
    match s {
        "Pending" => Ok(InterventionStatus::Pending),
        "InProgress" => Ok(InterventionStatus::InProgress),
        "Completed" => Ok(InterventionStatus::Completed),
        "Cancelled" => Ok(InterventionStatus::Cancelled),
        other => Err(DbError::Decode(format!(
            "unknown intervention status: {other}"
        ))),
    }
}

impl InterventionRow {
    fn into_intervention(self, id: Uuid) -> std::result::Result<Intervention, DbError> {
        let hangar_id = Uuid::parse_str(&self.hangar_id)
            .map_err(|e| DbError::Decode(format!("invalid hangar UUID: {e}")))?;
        Ok(Intervention {
            id,
            hangar_id,
            team_id: parse_team_id(self.team_id)?,
            title: self.title,
            description: self.description,
            status: parse_status(&self.status)?,
            scheduled_for: self.scheduled_for,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl InterventionRowWithId {
    fn try_into_intervention(self) -> std::result::Result<Intervention, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let hangar_id = Uuid::parse_str(&self.hangar_id)
            .map_err(|e| DbError::Decode(format!("invalid hangar UUID: {e}")))?;
        Ok(Intervention {
            id,
            hangar_id,
            team_id: parse_team_id(self.team_id)?,
            title: self.title,
            description: self.description,
            status: parse_status(&self.status)?,
            scheduled_for: self.scheduled_for,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Intervention repository.
#[derive(Clone)]
pub struct SurrealInterventionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInterventionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> InterventionRepository for SurrealInterventionRepository<C> {
    async fn create(&self, input: CreateIntervention) -> Result<Intervention> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('intervention', $id) SET \
                 hangar_id = $hangar_id, \
                 team_id = $team_id, \
                 title = $title, \
                 description = $description, \
                 status = $status, \
                 scheduled_for = $scheduled_for, \
                 completed_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("hangar_id", input.hangar_id.to_string()))
            .bind(("team_id", input.team_id.map(|t| t.to_string())))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("status", InterventionStatus::Pending.as_str().to_string()))
            .bind(("scheduled_for", input.scheduled_for))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InterventionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "intervention".into(),
            id: id_str,
        })?;

        Ok(row.into_intervention(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Intervention> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('intervention', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InterventionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "intervention".into(),
            id: id_str,
        })?;

        Ok(row.into_intervention(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateIntervention) -> Result<Intervention> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.scheduled_for.is_some() {
            sets.push("scheduled_for = $scheduled_for");
        }
        if input.completed_at.is_some() {
            sets.push("completed_at = $completed_at");
        }
        if input.team_id.is_some() {
            sets.push("team_id = $team_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('intervention', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(scheduled_for) = input.scheduled_for {
            builder = builder.bind(("scheduled_for", scheduled_for));
        }
        if let Some(completed_at) = input.completed_at {
            // Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("completed_at", completed_at));
        }
        if let Some(team_id) = input.team_id {
            builder = builder.bind(("team_id", team_id.map(|t| t.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InterventionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "intervention".into(),
            id: id_str,
        })?;

        Ok(row.into_intervention(id)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.db
            .query("DELETE type::record('intervention', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResult<Intervention>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM intervention GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM intervention \
                 ORDER BY scheduled_for ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InterventionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_intervention())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn detach_team(&self, team_id: Uuid) -> Result<()> {
        self.db
            .query(
                "UPDATE intervention SET team_id = NONE, \
                 updated_at = time::now() \
                 WHERE team_id = $team_id",
            )
            .bind(("team_id", team_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
