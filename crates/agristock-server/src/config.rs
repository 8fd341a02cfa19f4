//! Server configuration, read from the environment with sensible
//! defaults for local development.

use agristock_auth::AuthConfig;
use agristock_db::DbConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// Optional bootstrap SuperAdmin, created at startup when absent.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut db = DbConfig::default();
        if let Ok(url) = std::env::var("AGRISTOCK_DB_URL") {
            db.url = url;
        }
        if let Ok(ns) = std::env::var("AGRISTOCK_DB_NAMESPACE") {
            db.namespace = ns;
        }
        if let Ok(name) = std::env::var("AGRISTOCK_DB_NAME") {
            db.database = name;
        }
        if let Ok(user) = std::env::var("AGRISTOCK_DB_USER") {
            db.username = user;
        }
        if let Ok(pass) = std::env::var("AGRISTOCK_DB_PASS") {
            db.password = pass;
        }

        let mut auth = AuthConfig::default();
        if let Ok(pepper) = std::env::var("AGRISTOCK_PEPPER") {
            auth.pepper = Some(pepper);
        }
        if let Ok(secs) = std::env::var("AGRISTOCK_SESSION_LIFETIME_SECS")
            && let Ok(secs) = secs.parse()
        {
            auth.session_lifetime_secs = secs;
        }

        Self {
            bind_addr: std::env::var("AGRISTOCK_BIND")
                .unwrap_or_else(|_| "127.0.0.1:3000".into()),
            db,
            auth,
            admin_email: std::env::var("AGRISTOCK_ADMIN_EMAIL").ok(),
            admin_password: std::env::var("AGRISTOCK_ADMIN_PASSWORD").ok(),
        }
    }
}
