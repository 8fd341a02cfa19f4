//! Intervention domain model — a maintenance or work order on a hangar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl InterventionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "Pending",
            InterventionStatus::InProgress => "InProgress",
            InterventionStatus::Completed => "Completed",
            InterventionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, InterventionStatus::Pending | InterventionStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub id: Uuid,
    pub hangar_id: Uuid,
    /// Team assigned to carry out the work, if any.
    pub team_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: InterventionStatus,
    pub scheduled_for: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntervention {
    pub hangar_id: Uuid,
    pub team_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub scheduled_for: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateIntervention {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<InterventionStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub completed_at: Option<Option<DateTime<Utc>>>,
    /// `Some(Some(id))` = assign, `Some(None)` = clear, `None` = no change.
    pub team_id: Option<Option<Uuid>>,
}
