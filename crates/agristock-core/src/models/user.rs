//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: Role,
    /// The team this user belongs to, kept in sync with the team's
    /// membership set by the reconciler.
    pub team_id: Option<Uuid>,
    pub is_active: bool,
    pub is_approved: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Strip the password hash for anything that leaves the backend.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            role: self.role,
            team_id: self.team_id,
            is_active: self.is_active,
            is_approved: self.is_approved,
            last_login: self.last_login,
            created_at: self.created_at,
        }
    }
}

/// A user as exposed over the API — no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub is_active: bool,
    pub is_approved: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub role: Role,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub phone_number: Option<Option<String>>,
    pub role: Option<Role>,
    /// `Some(Some(id))` = assign, `Some(None)` = clear, `None` = no change.
    pub team_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}
