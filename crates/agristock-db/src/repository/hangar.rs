//! SurrealDB implementation of [`HangarRepository`].

use agristock_core::error::{Error, Result};
use agristock_core::models::hangar::{CreateHangar, Hangar, UpdateHangar};
use agristock_core::repository::{HangarRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::user::parse_team_id;

#[derive(Debug, SurrealValue)]
struct HangarRow {
    name: String,
    location: String,
    capacity_kg: f64,
    team_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct HangarRowWithId {
    record_id: String,
    name: String,
    location: String,
    capacity_kg: f64,
    team_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HangarRow {
    fn into_hangar(self, id: Uuid) -> std::result::Result<Hangar, DbError> {
        Ok(Hangar {
            id,
            name: self.name,
            location: self.location,
            capacity_kg: self.capacity_kg,
            team_id: parse_team_id(self.team_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl HangarRowWithId {
    fn try_into_hangar(self) -> std::result::Result<Hangar, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Hangar {
            id,
            name: self.name,
            location: self.location,
            capacity_kg: self.capacity_kg,
            team_id: parse_team_id(self.team_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Hangar repository.
#[derive(Clone)]
pub struct SurrealHangarRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealHangarRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> HangarRepository for SurrealHangarRepository<C> {
    async fn create(&self, input: CreateHangar) -> Result<Hangar> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('hangar', $id) SET \
                 name = $name, location = $location, \
                 capacity_kg = $capacity_kg, \
                 team_id = $team_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("location", input.location))
            .bind(("capacity_kg", input.capacity_kg))
            .bind(("team_id", input.team_id.map(|t| t.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<HangarRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "hangar".into(),
            id: id_str,
        })?;

        Ok(row.into_hangar(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Hangar> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('hangar', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<HangarRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "hangar".into(),
            id: id_str,
        })?;

        Ok(row.into_hangar(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateHangar) -> Result<Hangar> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.capacity_kg.is_some() {
            sets.push("capacity_kg = $capacity_kg");
        }
        if input.team_id.is_some() {
            sets.push("team_id = $team_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('hangar', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(capacity_kg) = input.capacity_kg {
            builder = builder.bind(("capacity_kg", capacity_kg));
        }
        if let Some(team_id) = input.team_id {
            // Some(Some(id)) = assign, Some(None) = clear
            builder = builder.bind(("team_id", team_id.map(|t| t.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<HangarRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "hangar".into(),
            id: id_str,
        })?;

        Ok(row.into_hangar(id)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        // Deleting a hangar with stock still in it would orphan the
        // batches, so the caller must move or delete them first.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM batch \
                 WHERE hangar_id = $hangar_id GROUP ALL",
            )
            .bind(("hangar_id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let dependents = rows.first().map(|r| r.total).unwrap_or(0);
        if dependents > 0 {
            return Err(Error::Conflict {
                message: format!("hangar {id_str} still holds {dependents} batch(es)"),
            });
        }

        self.db
            .query("DELETE type::record('hangar', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResult<Hangar>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM hangar GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM hangar \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<HangarRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_hangar())
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
                "UPDATE hangar SET team_id = NONE, updated_at = time::now() \
                 WHERE team_id = $team_id",
            )
            .bind(("team_id", team_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
