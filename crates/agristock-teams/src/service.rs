//! Team registry and membership reconciliation.

use std::collections::BTreeSet;

use agristock_core::error::{Error, Result};
use agristock_core::models::role::Role;
use agristock_core::models::team::{CreateTeam, Team, UpdateTeam};
use agristock_core::models::user::{UpdateUser, User};
use agristock_core::repository::{
    HangarRepository, InterventionRepository, PaginatedResult, Pagination, TeamRepository,
    UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::TeamError;

/// Minimum length of a team name.
const MIN_NAME_LEN: usize = 3;

/// Team lifecycle and membership service.
///
/// Generic over repository implementations so the invariants can be
/// exercised against any store.
pub struct TeamService<U, T, H, I>
where
    U: UserRepository,
    T: TeamRepository,
    H: HangarRepository,
    I: InterventionRepository,
{
    user_repo: U,
    team_repo: T,
    hangar_repo: H,
    intervention_repo: I,
}

impl<U, T, H, I> TeamService<U, T, H, I>
where
    U: UserRepository,
    T: TeamRepository,
    H: HangarRepository,
    I: InterventionRepository,
{
    pub fn new(user_repo: U, team_repo: T, hangar_repo: H, intervention_repo: I) -> Self {
        Self {
            user_repo,
            team_repo,
            hangar_repo,
            intervention_repo,
        }
    }

    /// Create a team with the given manager as its first member.
    ///
    /// The manager must exist and must not have role [`Role::User`].
    /// On success the manager's `team_id` points at the new team and
    /// their role is promoted to [`Role::TeamManager`] unless they are
    /// a SuperAdmin.
    pub async fn create_team(&self, input: CreateTeam) -> Result<Team> {
        validate_name(&input.name)?;

        let manager = match self.user_repo.get_by_id(input.manager_id).await {
            Ok(u) => u,
            Err(Error::NotFound { .. }) => {
                return Err(TeamError::ManagerMissing {
                    user_id: input.manager_id,
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        if !manager.role.is_manager_eligible() {
            return Err(TeamError::ManagerNotEligible {
                user_id: manager.id,
            }
            .into());
        }

        let team = self.team_repo.create(input).await?;
        self.team_repo.add_member(manager.id, team.id).await?;
        self.assign_manager(&manager, team.id).await?;

        info!(team_id = %team.id, manager_id = %manager.id, "team created");

        Ok(team)
    }

    pub async fn get_team(&self, team_id: Uuid) -> Result<Team> {
        self.team_repo.get_by_id(team_id).await
    }

    pub async fn list_teams(&self, pagination: Pagination) -> Result<PaginatedResult<Team>> {
        self.team_repo.list(pagination).await
    }

    pub async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>> {
        // Surface NotFound for an absent team rather than an empty set.
        self.team_repo.get_by_id(team_id).await?;
        self.team_repo.get_members(team_id).await
    }

    /// Update a team's name, contact address, or manager.
    ///
    /// A manager change demotes the previous manager (membership and
    /// `team_id` removed, role reset to User unless SuperAdmin) and
    /// then promotes the new one, force-adding them to membership.
    pub async fn update_team(&self, team_id: Uuid, input: UpdateTeam) -> Result<Team> {
        let team = self.team_repo.get_by_id(team_id).await?;

        if let Some(ref name) = input.name {
            validate_name(name)?;
        }

        let new_manager = match input.manager_id {
            Some(id) if id != team.manager_id => {
                let user = match self.user_repo.get_by_id(id).await {
                    Ok(u) => u,
                    Err(Error::NotFound { .. }) => {
                        return Err(TeamError::ManagerMissing { user_id: id }.into());
                    }
                    Err(e) => return Err(e),
                };
                Some(user)
            }
            _ => None,
        };

        // Demote the outgoing manager first so the team never has two
        // users claiming it through `team_id`. The sequence is
        // retryable: re-running it converges on the same state.
        if let Some(ref incoming) = new_manager {
            match self.user_repo.get_by_id(team.manager_id).await {
                Ok(outgoing) => {
                    self.team_repo.remove_member(outgoing.id, team_id).await?;
                    self.user_repo
                        .update(
                            outgoing.id,
                            UpdateUser {
                                team_id: Some(None),
                                role: demotion_for(&outgoing),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                // Already-gone manager rows are cleanup, not failure.
                Err(Error::NotFound { .. }) => {
                    warn!(team_id = %team_id, manager_id = %team.manager_id,
                        "outgoing manager no longer exists, skipping demotion");
                }
                Err(e) => return Err(e),
            }

            info!(
                team_id = %team_id,
                from = %team.manager_id,
                to = %incoming.id,
                "manager reassigned"
            );
        }

        let updated = self.team_repo.update(team_id, input).await?;

        if let Some(incoming) = new_manager {
            self.team_repo.add_member(incoming.id, team_id).await?;
            self.assign_manager(&incoming, team_id).await?;
        }

        Ok(updated)
    }

    /// Delete a team after restoring every affected record.
    ///
    /// Members get their `team_id` cleared; members holding the
    /// TeamManager role are reset to User (SuperAdmins keep their
    /// role). Hangars and interventions referencing the team are
    /// detached, then the team row and its membership edges go.
    pub async fn delete_team(&self, team_id: Uuid) -> Result<()> {
        self.team_repo.get_by_id(team_id).await?;
        let members = self.team_repo.get_members(team_id).await?;

        for member in &members {
            self.user_repo
                .update(
                    member.id,
                    UpdateUser {
                        team_id: Some(None),
                        role: demotion_for(member),
                        ..Default::default()
                    },
                )
                .await?;
        }

        self.hangar_repo.detach_team(team_id).await?;
        self.intervention_repo.detach_team(team_id).await?;
        self.team_repo.delete(team_id).await?;

        info!(team_id = %team_id, members = members.len(), "team deleted");

        Ok(())
    }

    /// Reconcile a team's member set with the desired one.
    ///
    /// The manager is force-included no matter what the caller sent,
    /// so this path can never remove them. Added users get their
    /// `team_id` set, removed users get it cleared; roles are not
    /// touched in either direction. Calling twice with the same input
    /// performs no writes the second time.
    pub async fn set_members(&self, team_id: Uuid, desired_member_ids: &[Uuid]) -> Result<Team> {
        let team = self.team_repo.get_by_id(team_id).await?;

        // 1. Force-include the manager.
        let mut desired: BTreeSet<Uuid> = desired_member_ids.iter().copied().collect();
        desired.insert(team.manager_id);

        // Reject unknown ids outright before any write.
        for id in &desired {
            match self.user_repo.get_by_id(*id).await {
                Ok(_) => {}
                Err(Error::NotFound { .. }) => {
                    return Err(TeamError::UnknownMember { user_id: *id }.into());
                }
                Err(e) => return Err(e),
            }
        }

        // 2. Diff against the current membership.
        let current: BTreeSet<Uuid> = self
            .team_repo
            .get_members(team_id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        let added: Vec<Uuid> = desired.difference(&current).copied().collect();
        let mut removed: Vec<Uuid> = current.difference(&desired).copied().collect();
        removed.retain(|id| *id != team.manager_id);

        // 3. Persist the membership edges.
        for id in &added {
            self.team_repo.add_member(*id, team_id).await?;
        }
        for id in &removed {
            self.team_repo.remove_member(*id, team_id).await?;
        }

        // 4. Point every added user at the team.
        for id in &added {
            self.user_repo
                .update(
                    *id,
                    UpdateUser {
                        team_id: Some(Some(team_id)),
                        ..Default::default()
                    },
                )
                .await?;
        }

        // 5. Detach every removed user, role untouched.
        for id in &removed {
            self.user_repo
                .update(
                    *id,
                    UpdateUser {
                        team_id: Some(None),
                        ..Default::default()
                    },
                )
                .await?;
        }

        info!(
            team_id = %team_id,
            added = added.len(),
            removed = removed.len(),
            "membership reconciled"
        );

        Ok(team)
    }

    /// Point a manager's account at a team, promoting to TeamManager
    /// unless they already outrank it.
    async fn assign_manager(&self, manager: &User, team_id: Uuid) -> Result<()> {
        let role = match manager.role {
            Role::SuperAdmin => None,
            _ => Some(Role::TeamManager),
        };
        self.user_repo
            .update(
                manager.id,
                UpdateUser {
                    team_id: Some(Some(team_id)),
                    role,
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

/// Role reset applied when a user loses a team: only TeamManagers are
/// demoted, and only back to User.
fn demotion_for(user: &User) -> Option<Role> {
    match user.role {
        Role::TeamManager => Some(Role::User),
        _ => None,
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(TeamError::NameTooShort { min: MIN_NAME_LEN }.into());
    }
    Ok(())
}
