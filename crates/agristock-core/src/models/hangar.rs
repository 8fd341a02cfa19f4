//! Hangar domain model — a storage building.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hangar {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub capacity_kg: f64,
    /// Team responsible for this hangar, if any.
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHangar {
    pub name: String,
    pub location: String,
    pub capacity_kg: f64,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateHangar {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity_kg: Option<f64>,
    /// `Some(Some(id))` = assign, `Some(None)` = clear, `None` = no change.
    pub team_id: Option<Option<Uuid>>,
}
