//! Shared application state.

use std::sync::Arc;

use agristock_auth::ApprovalGate;
use agristock_db::repository::{
    SurrealAlertRepository, SurrealBatchRepository, SurrealHangarRepository,
    SurrealInterventionRepository, SurrealKpiRepository, SurrealSessionRepository,
    SurrealTeamRepository, SurrealUserRepository,
};
use agristock_teams::TeamService;
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

use crate::config::ServerConfig;

pub type Db = Client;

pub type Gate = ApprovalGate<SurrealUserRepository<Db>, SurrealSessionRepository<Db>>;
pub type Teams = TeamService<
    SurrealUserRepository<Db>,
    SurrealTeamRepository<Db>,
    SurrealHangarRepository<Db>,
    SurrealInterventionRepository<Db>,
>;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub teams: Arc<Teams>,
    pub users: SurrealUserRepository<Db>,
    pub hangars: SurrealHangarRepository<Db>,
    pub batches: SurrealBatchRepository<Db>,
    pub interventions: SurrealInterventionRepository<Db>,
    pub alerts: SurrealAlertRepository<Db>,
    pub kpis: SurrealKpiRepository<Db>,
}

impl AppState {
    pub fn new(db: Surreal<Db>, config: &ServerConfig) -> Self {
        let users = match &config.auth.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealUserRepository::new(db.clone()),
        };
        let sessions = SurrealSessionRepository::new(db.clone());
        let team_repo = SurrealTeamRepository::new(db.clone());
        let hangars = SurrealHangarRepository::new(db.clone());
        let interventions = SurrealInterventionRepository::new(db.clone());

        let gate = Arc::new(ApprovalGate::new(
            users.clone(),
            sessions,
            config.auth.clone(),
        ));
        let teams = Arc::new(TeamService::new(
            users.clone(),
            team_repo,
            hangars.clone(),
            interventions.clone(),
        ));

        Self {
            gate,
            teams,
            users,
            hangars,
            batches: SurrealBatchRepository::new(db.clone()),
            interventions,
            alerts: SurrealAlertRepository::new(db.clone()),
            kpis: SurrealKpiRepository::new(db),
        }
    }
}
