//! SurrealDB repository implementations.

mod alert;
mod batch;
mod hangar;
mod intervention;
mod kpi;
mod session;
mod team;
mod user;

pub use alert::SurrealAlertRepository;
pub use batch::SurrealBatchRepository;
pub use hangar::SurrealHangarRepository;
pub use intervention::SurrealInterventionRepository;
pub use kpi::SurrealKpiRepository;
pub use session::SurrealSessionRepository;
pub use team::SurrealTeamRepository;
pub use user::SurrealUserRepository;
