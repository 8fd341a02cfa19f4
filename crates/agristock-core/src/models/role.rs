//! Access roles.

use serde::{Deserialize, Serialize};

/// The three access levels of the system.
///
/// Role is orthogonal to team membership: a plain member removed from
/// a team keeps their role, and only team-manager designation moves a
/// user in and out of [`Role::TeamManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    TeamManager,
    User,
}

impl Role {
    /// Storage representation, matching the `ASSERT` list in the schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::TeamManager => "TeamManager",
            Role::User => "User",
        }
    }

    /// A role that may be designated as a team manager.
    pub fn is_manager_eligible(&self) -> bool {
        !matches!(self, Role::User)
    }
}
