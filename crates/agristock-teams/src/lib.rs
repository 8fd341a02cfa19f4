//! Agristock Teams — team lifecycle and membership reconciliation.
//!
//! Two responsibilities live here: the team registry (create, update,
//! delete, with the manager-designation rule) and the membership
//! reconciler, which keeps a team's member set and each affected
//! user's `team_id` mutually consistent.

pub mod error;
pub mod service;

pub use error::TeamError;
pub use service::TeamService;
