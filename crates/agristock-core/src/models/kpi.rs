//! KPI domain model.
//!
//! Each metric is its own variant with exactly the fields it needs —
//! there is no catch-all record with optional fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Kpi {
    /// Total quantity currently stored across all hangars.
    TotalStock { quantity_kg: f64 },
    /// Fill level of a single hangar.
    HangarOccupancy {
        hangar_id: Uuid,
        name: String,
        capacity_kg: f64,
        stored_kg: f64,
    },
    /// Interventions that are pending or in progress.
    OpenInterventions { count: u64 },
    /// Alerts nobody has acknowledged yet.
    UnacknowledgedAlerts { count: u64 },
    /// Accounts waiting for a SuperAdmin approval.
    PendingApprovals { count: u64 },
}

/// A snapshot of all dashboard metrics, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiOverview {
    pub kpis: Vec<Kpi>,
}
