//! The approval gate — decides whether an account may use the system.
//!
//! Accounts move PENDING → APPROVED through a SuperAdmin action; the
//! APPROVED ⇄ DEACTIVATED toggle is reversible. A PENDING account can
//! log nothing in regardless of credentials, and a deactivated one
//! fails login even when approved.

use agristock_core::error::{Error, Result};
use agristock_core::models::role::Role;
use agristock_core::models::session::CreateSession;
use agristock_core::models::user::{CreateUser, UpdateUser, User, UserProfile};
use agristock_core::repository::{SessionRepository, UserRepository};
use chrono::{Duration, Utc};
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::session_watch::SessionWatch;
use crate::token;

/// Whether a fresh signup is usable without a SuperAdmin approval.
///
/// Single policy for the whole system: every new account starts
/// PENDING and must be approved before it can do anything.
pub const SIGNUP_AUTO_APPROVE: bool = false;

/// Outcome of evaluating a request against the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session resolved to an approved account.
    Allow,
    /// Session resolved to an account still awaiting approval.
    RedirectPending,
    /// No usable session.
    RedirectLogin,
}

/// Decide whether a resolved session user may reach protected routes.
///
/// `is_active` is not consulted here: deactivation is enforced at
/// login time and by session invalidation, so an active session
/// implies an active account.
pub fn evaluate(user: Option<&User>) -> AccessDecision {
    match user {
        None => AccessDecision::RedirectLogin,
        Some(u) if u.is_approved => AccessDecision::Allow,
        Some(_) => AccessDecision::RedirectPending,
    }
}

/// Input for the signup flow.
#[derive(Debug)]
pub struct SignupInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Sanitized profile of the logged-in account.
    pub user: UserProfile,
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// The approval gate service.
///
/// Generic over repository implementations so that the gate has no
/// dependency on the database crate.
pub struct ApprovalGate<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
    session_watch: SessionWatch,
}

impl<U: UserRepository, S: SessionRepository> ApprovalGate<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
            session_watch: SessionWatch::new(),
        }
    }

    /// Subscribe to session-user changes (login publishes the profile,
    /// logout publishes `None`).
    pub fn subscribe_session_user(&self) -> watch::Receiver<Option<UserProfile>> {
        self.session_watch.subscribe()
    }

    /// Register a new account.
    ///
    /// New accounts always get role [`Role::User`] and start pending
    /// approval (see [`SIGNUP_AUTO_APPROVE`]).
    pub async fn signup(&self, input: SignupInput) -> Result<UserProfile> {
        validate_signup(&input, self.config.min_password_length)?;

        // Reject duplicates before writing anything.
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => {
                return Err(Error::Conflict {
                    message: format!("email {} is already registered", input.email),
                });
            }
            Err(Error::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        match self.user_repo.get_by_username(&input.username).await {
            Ok(_) => {
                return Err(Error::Conflict {
                    message: format!("username {} is already taken", input.username),
                });
            }
            Err(Error::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let user = self
            .user_repo
            .create(CreateUser {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                phone_number: input.phone_number,
                password: input.password,
                role: Role::User,
                is_approved: SIGNUP_AUTO_APPROVE,
            })
            .await?;

        info!(user_id = %user.id, "account created, pending approval");

        Ok(user.into_profile())
    }

    /// Authenticate with email + password and open a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutput> {
        // 1. Look up the account; an unknown email is indistinguishable
        //    from a bad password.
        let user = match self.user_repo.get_by_email(email).await {
            Ok(u) => u,
            Err(Error::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid =
            password::verify_password(password, &user.password_hash, self.config.pepper.as_deref())
                .map_err(Error::from)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account flags.
        if !user.is_active {
            return Err(AuthError::AccountDeactivated.into());
        }
        if !user.is_approved {
            return Err(AuthError::AccountPendingApproval.into());
        }

        // 4. Stamp last_login.
        let user = self
            .user_repo
            .update(
                user.id,
                UpdateUser {
                    last_login: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        // 5. Generate session token and create the session.
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "login");

        let profile = user.into_profile();
        self.session_watch.publish(Some(profile.clone()));

        Ok(LoginOutput {
            user: profile,
            session_token: raw_token,
            session_id: session.id,
            expires_in: self.config.session_lifetime_secs,
        })
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> Result<()> {
        self.session_repo.invalidate(session_id).await?;
        self.session_watch.publish(None);
        Ok(())
    }

    /// Logout by raw session token, as presented by an HTTP client.
    ///
    /// Unknown tokens are a no-op: logging out twice is not an error.
    pub async fn logout_by_token(&self, raw_token: &str) -> Result<()> {
        let token_hash = token::hash_session_token(raw_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => self.logout(session.id).await,
            Err(Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Resolve a raw session token to its account.
    ///
    /// Returns `Ok(None)` for an unknown or expired token — the caller
    /// turns that into [`AccessDecision::RedirectLogin`] via
    /// [`evaluate`].
    pub async fn resolve_session(&self, raw_token: &str) -> Result<Option<User>> {
        let token_hash = token::hash_session_token(raw_token);
        let session = match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(s) => s,
            Err(Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        if session.expires_at <= Utc::now() {
            // Expired sessions are cleaned up lazily.
            let _ = self.session_repo.invalidate(session.id).await;
            return Ok(None);
        }

        let user = self.user_repo.get_by_id(session.user_id).await?;
        Ok(Some(user))
    }

    /// Toggle the approval flag on an account. SuperAdmin only.
    ///
    /// Re-invoking on an approved account returns it to pending.
    pub async fn approve(&self, target_user_id: Uuid, approver: &User) -> Result<User> {
        ensure_super_admin(approver)?;

        let target = self.user_repo.get_by_id(target_user_id).await?;
        let approved = !target.is_approved;

        let updated = self
            .user_repo
            .update(
                target_user_id,
                UpdateUser {
                    is_approved: Some(approved),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            target = %target_user_id,
            approver = %approver.id,
            approved,
            "approval toggled"
        );

        Ok(updated)
    }

    /// Activate or deactivate an account. SuperAdmin only.
    ///
    /// Deactivation also kills the account's live sessions so the flag
    /// takes effect immediately, not at next login.
    pub async fn set_active(
        &self,
        target_user_id: Uuid,
        active: bool,
        approver: &User,
    ) -> Result<User> {
        ensure_super_admin(approver)?;

        let updated = self
            .user_repo
            .update(
                target_user_id,
                UpdateUser {
                    is_active: Some(active),
                    ..Default::default()
                },
            )
            .await?;

        if !active {
            self.session_repo
                .invalidate_user_sessions(target_user_id)
                .await?;
        }

        info!(
            target = %target_user_id,
            approver = %approver.id,
            active,
            "activation changed"
        );

        Ok(updated)
    }
}

fn ensure_super_admin(actor: &User) -> Result<()> {
    if actor.role != Role::SuperAdmin {
        return Err(Error::PermissionDenied {
            reason: format!("user {} is not a SuperAdmin", actor.id),
        });
    }
    Ok(())
}

fn validate_signup(input: &SignupInput, min_password_length: usize) -> Result<()> {
    let mut missing = Vec::new();
    if input.email.trim().is_empty() {
        missing.push("email");
    }
    if input.username.trim().is_empty() {
        missing.push("username");
    }
    if input.first_name.trim().is_empty() {
        missing.push("first_name");
    }
    if input.last_name.trim().is_empty() {
        missing.push("last_name");
    }
    if !missing.is_empty() {
        return Err(Error::Validation {
            message: format!("missing required field(s): {}", missing.join(", ")),
        });
    }
    if !input.email.contains('@') {
        return Err(Error::Validation {
            message: format!("{} is not a valid email address", input.email),
        });
    }
    if input.password.len() < min_password_length {
        return Err(Error::Validation {
            message: format!("password must be at least {min_password_length} characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_approved: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            username: "u".into(),
            first_name: "U".into(),
            last_name: "Ser".into(),
            phone_number: None,
            password_hash: String::new(),
            role: Role::User,
            team_id: None,
            is_active: true,
            is_approved,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn no_session_redirects_to_login() {
        assert_eq!(evaluate(None), AccessDecision::RedirectLogin);
    }

    #[test]
    fn unapproved_account_redirects_to_pending() {
        let u = user(false);
        assert_eq!(evaluate(Some(&u)), AccessDecision::RedirectPending);
    }

    #[test]
    fn approved_account_is_allowed() {
        let u = user(true);
        assert_eq!(evaluate(Some(&u)), AccessDecision::Allow);
    }

    #[test]
    fn signup_validation_rejects_short_password() {
        let input = SignupInput {
            email: "a@example.com".into(),
            username: "a".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone_number: None,
            password: "short".into(),
        };
        assert!(matches!(
            validate_signup(&input, 12),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn signup_validation_rejects_missing_fields() {
        let input = SignupInput {
            email: "".into(),
            username: "a".into(),
            first_name: "".into(),
            last_name: "B".into(),
            phone_number: None,
            password: "long-enough-password".into(),
        };
        let err = validate_signup(&input, 12).unwrap_err();
        match err {
            Error::Validation { message } => {
                assert!(message.contains("email"));
                assert!(message.contains("first_name"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn signup_validation_rejects_bad_email() {
        let input = SignupInput {
            email: "not-an-email".into(),
            username: "a".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone_number: None,
            password: "long-enough-password".into(),
        };
        assert!(matches!(
            validate_signup(&input, 12),
            Err(Error::Validation { .. })
        ));
    }
}
