//! Team domain model.
//!
//! A team is the organizational unit responsible for hangars, batches
//! and interventions. It has exactly one manager, identified by the
//! explicit `manager_id` column, and the manager is always a member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub manager_id: Uuid,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub manager_id: Uuid,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub manager_id: Option<Uuid>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub contact_email: Option<Option<String>>,
}
