//! Agristock Server — application entry point.

use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::user::CreateUser;
use agristock_core::repository::UserRepository;
use agristock_db::DbManager;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod extract;
mod routes;
mod state;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agristock=info".parse().unwrap()),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();

    let manager = DbManager::connect(&config.db).await?;
    agristock_db::run_migrations(manager.client()).await?;

    let state = AppState::new(manager.client().clone(), &config);
    bootstrap_admin(&state, &config).await?;

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Serving agristock at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the bootstrap SuperAdmin account when one is configured and
/// does not exist yet. Without it a fresh database has nobody able to
/// approve signups.
async fn bootstrap_admin(state: &AppState, config: &ServerConfig) -> Result<(), Error> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    match state.users.get_by_email(email).await {
        Ok(_) => Ok(()),
        Err(Error::NotFound { .. }) => {
            let admin = state
                .users
                .create(CreateUser {
                    email: email.clone(),
                    username: "admin".into(),
                    first_name: "Super".into(),
                    last_name: "Admin".into(),
                    phone_number: None,
                    password: password.clone(),
                    role: Role::SuperAdmin,
                    is_approved: true,
                })
                .await?;
            info!(user_id = %admin.id, "bootstrap SuperAdmin created");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
