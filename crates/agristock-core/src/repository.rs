//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The service crates are generic
//! over these traits so they can be exercised against any store.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    alert::{Alert, CreateAlert},
    batch::{Batch, CreateBatch, UpdateBatch},
    hangar::{CreateHangar, Hangar, UpdateHangar},
    intervention::{CreateIntervention, Intervention, UpdateIntervention},
    kpi::KpiOverview,
    session::{CreateSession, Session},
    team::{CreateTeam, Team, UpdateTeam},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = Result<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = Result<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = Result<User>> + Send;
    fn update(&self, id: Uuid, input: UpdateUser) -> impl Future<Output = Result<User>> + Send;
    fn list(&self, pagination: Pagination)
    -> impl Future<Output = Result<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Team registry
// ---------------------------------------------------------------------------

pub trait TeamRepository: Send + Sync {
    fn create(&self, input: CreateTeam) -> impl Future<Output = Result<Team>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Team>> + Send;
    fn update(&self, id: Uuid, input: UpdateTeam) -> impl Future<Output = Result<Team>> + Send;
    /// Removes the team record and all of its membership edges.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    fn list(&self, pagination: Pagination)
    -> impl Future<Output = Result<PaginatedResult<Team>>> + Send;

    /// Add a user to a team (creates a `member_of` edge; no-op if present).
    fn add_member(&self, user_id: Uuid, team_id: Uuid) -> impl Future<Output = Result<()>> + Send;

    /// Remove a user from a team (no-op if the edge is already gone).
    fn remove_member(
        &self,
        user_id: Uuid,
        team_id: Uuid,
    ) -> impl Future<Output = Result<()>> + Send;

    /// All current members of a team.
    fn get_members(&self, team_id: Uuid) -> impl Future<Output = Result<Vec<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = Result<Session>> + Send;
    fn get_by_token_hash(&self, token_hash: &str)
    -> impl Future<Output = Result<Session>> + Send;
    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    /// Invalidate all sessions for a user (e.g., on deactivation).
    fn invalidate_user_sessions(&self, user_id: Uuid)
    -> impl Future<Output = Result<()>> + Send;
    /// Remove all expired sessions, returning the number removed.
    fn cleanup_expired(&self) -> impl Future<Output = Result<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Hangars, batches, interventions, alerts
// ---------------------------------------------------------------------------

pub trait HangarRepository: Send + Sync {
    fn create(&self, input: CreateHangar) -> impl Future<Output = Result<Hangar>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Hangar>> + Send;
    fn update(&self, id: Uuid, input: UpdateHangar)
    -> impl Future<Output = Result<Hangar>> + Send;
    /// Fails with `Conflict` while batches still reference the hangar.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = Result<PaginatedResult<Hangar>>> + Send;
    /// Clear `team_id` on every hangar referencing the given team.
    fn detach_team(&self, team_id: Uuid) -> impl Future<Output = Result<()>> + Send;
}

pub trait BatchRepository: Send + Sync {
    fn create(&self, input: CreateBatch) -> impl Future<Output = Result<Batch>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Batch>> + Send;
    fn update(&self, id: Uuid, input: UpdateBatch) -> impl Future<Output = Result<Batch>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = Result<PaginatedResult<Batch>>> + Send;
    fn list_by_hangar(&self, hangar_id: Uuid) -> impl Future<Output = Result<Vec<Batch>>> + Send;
}

pub trait InterventionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateIntervention,
    ) -> impl Future<Output = Result<Intervention>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Intervention>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateIntervention,
    ) -> impl Future<Output = Result<Intervention>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = Result<PaginatedResult<Intervention>>> + Send;
    /// Clear `team_id` on every intervention assigned to the given team.
    fn detach_team(&self, team_id: Uuid) -> impl Future<Output = Result<()>> + Send;
}

pub trait AlertRepository: Send + Sync {
    fn create(&self, input: CreateAlert) -> impl Future<Output = Result<Alert>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Alert>> + Send;
    fn acknowledge(&self, id: Uuid) -> impl Future<Output = Result<Alert>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = Result<PaginatedResult<Alert>>> + Send;
}

// ---------------------------------------------------------------------------
// KPI aggregation
// ---------------------------------------------------------------------------

pub trait KpiRepository: Send + Sync {
    /// Compute the current dashboard snapshot from live data.
    fn overview(&self) -> impl Future<Output = Result<KpiOverview>> + Send;
}
