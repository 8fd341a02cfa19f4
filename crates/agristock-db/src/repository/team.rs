//! SurrealDB implementation of [`TeamRepository`].
//!
//! Membership is a `member_of` graph relation (user -> team). The
//! edge-level operations here are storage primitives only; invariant
//! enforcement (manager inclusion, `team_id` synchronization) lives in
//! the `agristock-teams` service.

use agristock_core::error::Result;
use agristock_core::models::team::{CreateTeam, Team, UpdateTeam};
use agristock_core::models::user::User;
use agristock_core::repository::{PaginatedResult, Pagination, TeamRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::user::{parse_role, parse_team_id};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TeamRow {
    name: String,
    manager_id: String,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TeamRowWithId {
    record_id: String,
    name: String,
    manager_id: String,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TeamRow {
    fn into_team(self, id: Uuid) -> std::result::Result<Team, DbError> {
        let manager_id = Uuid::parse_str(&self.manager_id)
            .map_err(|e| DbError::Decode(format!("invalid manager UUID: {e}")))?;
        Ok(Team {
            id,
            name: self.name,
            manager_id,
            contact_email: self.contact_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TeamRowWithId {
    fn try_into_team(self) -> std::result::Result<Team, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let manager_id = Uuid::parse_str(&self.manager_id)
            .map_err(|e| DbError::Decode(format!("invalid manager UUID: {e}")))?;
        Ok(Team {
            id,
            name: self.name,
            manager_id,
            contact_email: self.contact_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct for user members returned from edge queries.
#[derive(Debug, SurrealValue)]
struct MemberRow {
    record_id: String,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    password_hash: String,
    role: String,
    team_id: Option<String>,
    is_active: bool,
    is_approved: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn try_into_user(self) -> std::result::Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            team_id: parse_team_id(self.team_id)?,
            is_active: self.is_active,
            is_approved: self.is_approved,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Team repository.
#[derive(Clone)]
pub struct SurrealTeamRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTeamRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count_records(
        &self,
        table: &'static str,
        id: &Uuid,
    ) -> std::result::Result<u64, DbError> {
        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM {table} \
                 WHERE id = type::record('{table}', $id) GROUP ALL"
            ))
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> TeamRepository for SurrealTeamRepository<C> {
    async fn create(&self, input: CreateTeam) -> Result<Team> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('team', $id) SET \
                 name = $name, \
                 manager_id = $manager_id, \
                 contact_email = $contact_email",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("manager_id", input.manager_id.to_string()))
            .bind(("contact_email", input.contact_email))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Team> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('team', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTeam) -> Result<Team> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.manager_id.is_some() {
            sets.push("manager_id = $manager_id");
        }
        if input.contact_email.is_some() {
            sets.push("contact_email = $contact_email");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('team', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(manager_id) = input.manager_id {
            builder = builder.bind(("manager_id", manager_id.to_string()));
        }
        if let Some(contact_email) = input.contact_email {
            // Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("contact_email", contact_email));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        // Delete associated membership edges first, then the team record.
        let query = format!(
            "DELETE member_of WHERE out = team:`{id_str}`; \
             DELETE type::record('team', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> Result<PaginatedResult<Team>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM team GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM team \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_team())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn add_member(&self, user_id: Uuid, team_id: Uuid) -> Result<()> {
        let user_id_str = user_id.to_string();
        let team_id_str = team_id.to_string();

        // Verify both endpoints exist before creating the edge.
        if self.count_records("user", &user_id).await? == 0 {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id_str,
            }
            .into());
        }
        if self.count_records("team", &team_id).await? == 0 {
            return Err(DbError::NotFound {
                entity: "team".into(),
                id: team_id_str,
            }
            .into());
        }

        // Skip if the edge already exists — membership is a set.
        let mut existing = self
            .db
            .query(
                "SELECT count() AS total FROM member_of \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('team', $team_id) GROUP ALL",
            )
            .bind(("user_id", user_id_str.clone()))
            .bind(("team_id", team_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = existing.take(0).map_err(DbError::from)?;
        if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Ok(());
        }

        let query = format!("RELATE user:`{user_id_str}` -> member_of -> team:`{team_id_str}`;");
        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_member(&self, user_id: Uuid, team_id: Uuid) -> Result<()> {
        self.db
            .query(
                "DELETE member_of WHERE \
                 in = type::record('user', $user_id) AND \
                 out = type::record('team', $team_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("team_id", team_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_members(&self, team_id: Uuid) -> Result<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (\
                     SELECT VALUE in FROM member_of \
                     WHERE out = type::record('team', $team_id)\
                 ) \
                 ORDER BY created_at ASC",
            )
            .bind(("team_id", team_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;

        let members = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<std::result::Result<Vec<_>, DbError>>()?;

        Ok(members)
    }
}
