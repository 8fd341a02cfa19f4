//! Batch domain model — a lot of fertilizer stored in a hangar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Stored,
    Reserved,
    Shipped,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Stored => "Stored",
            BatchStatus::Reserved => "Reserved",
            BatchStatus::Shipped => "Shipped",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub hangar_id: Uuid,
    /// Product name, e.g. "Ammonium nitrate 33.5%".
    pub fertilizer: String,
    pub quantity_kg: f64,
    pub status: BatchStatus,
    pub received_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatch {
    pub hangar_id: Uuid,
    pub fertilizer: String,
    pub quantity_kg: f64,
    pub received_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBatch {
    pub fertilizer: Option<String>,
    pub quantity_kg: Option<f64>,
    pub status: Option<BatchStatus>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
