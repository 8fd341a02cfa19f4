//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD phone_number ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['SuperAdmin', 'TeamManager', 'User'];
DEFINE FIELD team_id ON TABLE user TYPE option<string>;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD is_approved ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD last_login ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Teams
-- =======================================================================
DEFINE TABLE team SCHEMAFULL;
DEFINE FIELD name ON TABLE team TYPE string;
DEFINE FIELD manager_id ON TABLE team TYPE string;
DEFINE FIELD contact_email ON TABLE team TYPE option<string>;
DEFINE FIELD created_at ON TABLE team TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE team TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_team_name ON TABLE team COLUMNS name UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Hangars
-- =======================================================================
DEFINE TABLE hangar SCHEMAFULL;
DEFINE FIELD name ON TABLE hangar TYPE string;
DEFINE FIELD location ON TABLE hangar TYPE string;
DEFINE FIELD capacity_kg ON TABLE hangar TYPE float;
DEFINE FIELD team_id ON TABLE hangar TYPE option<string>;
DEFINE FIELD created_at ON TABLE hangar TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE hangar TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_hangar_name ON TABLE hangar COLUMNS name UNIQUE;

-- =======================================================================
-- Batches
-- =======================================================================
DEFINE TABLE batch SCHEMAFULL;
DEFINE FIELD hangar_id ON TABLE batch TYPE string;
DEFINE FIELD fertilizer ON TABLE batch TYPE string;
DEFINE FIELD quantity_kg ON TABLE batch TYPE float;
DEFINE FIELD status ON TABLE batch TYPE string \
    ASSERT $value IN ['Stored', 'Reserved', 'Shipped'];
DEFINE FIELD received_at ON TABLE batch TYPE datetime;
DEFINE FIELD expires_at ON TABLE batch TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE batch TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE batch TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_batch_hangar ON TABLE batch COLUMNS hangar_id;

-- =======================================================================
-- Interventions
-- =======================================================================
DEFINE TABLE intervention SCHEMAFULL;
DEFINE FIELD hangar_id ON TABLE intervention TYPE string;
DEFINE FIELD team_id ON TABLE intervention TYPE option<string>;
DEFINE FIELD title ON TABLE intervention TYPE string;
DEFINE FIELD description ON TABLE intervention TYPE string;
DEFINE FIELD status ON TABLE intervention TYPE string \
    ASSERT $value IN ['Pending', 'InProgress', 'Completed', \
    'Cancelled'];
DEFINE FIELD scheduled_for ON TABLE intervention TYPE datetime;
DEFINE FIELD completed_at ON TABLE intervention TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE intervention TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE intervention TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_intervention_hangar ON TABLE intervention \
    COLUMNS hangar_id;

-- =======================================================================
-- Alerts
-- =======================================================================
DEFINE TABLE alert SCHEMAFULL;
DEFINE FIELD severity ON TABLE alert TYPE string \
    ASSERT $value IN ['Info', 'Warning', 'Critical'];
DEFINE FIELD message ON TABLE alert TYPE string;
DEFINE FIELD hangar_id ON TABLE alert TYPE option<string>;
DEFINE FIELD batch_id ON TABLE alert TYPE option<string>;
DEFINE FIELD acknowledged ON TABLE alert TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE alert TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Team membership
DEFINE TABLE member_of TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
