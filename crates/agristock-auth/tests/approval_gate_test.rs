//! Integration tests for the approval gate using in-memory SurrealDB.

use agristock_auth::config::AuthConfig;
use agristock_auth::gate::{AccessDecision, ApprovalGate, SignupInput, evaluate};
use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::user::{CreateUser, User};
use agristock_core::repository::UserRepository;
use agristock_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type MemDb = surrealdb::engine::local::Db;
type Gate = ApprovalGate<SurrealUserRepository<MemDb>, SurrealSessionRepository<MemDb>>;

fn test_config() -> AuthConfig {
    AuthConfig {
        session_lifetime_secs: 3_600,
        pepper: None,
        min_password_length: 12,
    }
}

/// Spin up in-memory DB, run migrations, build the gate and a
/// SuperAdmin to act as approver.
async fn setup() -> (Surreal<MemDb>, Gate, User) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agristock_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let admin = user_repo
        .create(CreateUser {
            email: "admin@example.com".into(),
            username: "admin".into(),
            first_name: "Super".into(),
            last_name: "Admin".into(),
            phone_number: None,
            password: "admin-password-123".into(),
            role: Role::SuperAdmin,
            is_approved: true,
        })
        .await
        .unwrap();

    let gate = ApprovalGate::new(
        user_repo,
        SurrealSessionRepository::new(db.clone()),
        test_config(),
    );

    (db, gate, admin)
}

fn alice_signup() -> SignupInput {
    SignupInput {
        email: "alice@example.com".into(),
        username: "alice".into(),
        first_name: "Alice".into(),
        last_name: "Martin".into(),
        phone_number: Some("+33 6 12 34 56 78".into()),
        password: "correct-horse-battery".into(),
    }
}

// -----------------------------------------------------------------------
// Signup
// -----------------------------------------------------------------------

#[tokio::test]
async fn signup_starts_pending() {
    let (_db, gate, _admin) = setup().await;

    let profile = gate.signup(alice_signup()).await.unwrap();

    assert_eq!(profile.role, Role::User);
    assert!(!profile.is_approved);
    assert!(profile.is_active);
    assert!(profile.team_id.is_none());
}

#[tokio::test]
async fn signup_duplicate_email_conflicts() {
    let (_db, gate, _admin) = setup().await;
    gate.signup(alice_signup()).await.unwrap();

    let mut dup = alice_signup();
    dup.username = "alice2".into();
    let err = gate.signup(dup).await.unwrap_err();

    assert!(matches!(err, Error::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn signup_duplicate_username_conflicts() {
    let (_db, gate, _admin) = setup().await;
    gate.signup(alice_signup()).await.unwrap();

    let mut dup = alice_signup();
    dup.email = "alice.other@example.com".into();
    let err = gate.signup(dup).await.unwrap_err();

    assert!(matches!(err, Error::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn signup_short_password_is_rejected() {
    let (_db, gate, _admin) = setup().await;

    let mut input = alice_signup();
    input.password = "short".into();
    let err = gate.signup(input).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}

// -----------------------------------------------------------------------
// Login and the approval gate
// -----------------------------------------------------------------------

#[tokio::test]
async fn pending_account_cannot_login_until_approved() {
    // Correct credentials are not enough before approval.
    let (_db, gate, admin) = setup().await;
    let profile = gate.signup(alice_signup()).await.unwrap();

    let err = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AccountInactive { .. }), "got: {err:?}");

    gate.approve(profile.id, &admin).await.unwrap();

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(output.user.username, "alice");
    assert!(output.user.last_login.is_some());
    assert!(!output.session_token.is_empty());
}

#[tokio::test]
async fn login_wrong_password_fails() {
    let (_db, gate, admin) = setup().await;
    let profile = gate.signup(alice_signup()).await.unwrap();
    gate.approve(profile.id, &admin).await.unwrap();

    let err = gate
        .login("alice@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials), "got: {err:?}");
}

#[tokio::test]
async fn login_unknown_email_fails() {
    let (_db, gate, _admin) = setup().await;

    let err = gate
        .login("nobody@example.com", "irrelevant-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials), "got: {err:?}");
}

#[tokio::test]
async fn deactivated_account_cannot_login() {
    let (_db, gate, admin) = setup().await;
    let profile = gate.signup(alice_signup()).await.unwrap();
    gate.approve(profile.id, &admin).await.unwrap();
    gate.set_active(profile.id, false, &admin).await.unwrap();

    let err = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AccountInactive { .. }), "got: {err:?}");

    // Reactivation makes the same credentials work again.
    gate.set_active(profile.id, true, &admin).await.unwrap();
    assert!(
        gate.login("alice@example.com", "correct-horse-battery")
            .await
            .is_ok()
    );
}

// -----------------------------------------------------------------------
// Administration
// -----------------------------------------------------------------------

#[tokio::test]
async fn approve_requires_super_admin() {
    let (db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    // A freshly approved plain user cannot approve others.
    let alice_user = SurrealUserRepository::new(db.clone())
        .get_by_id(alice.id)
        .await
        .unwrap();
    let bob = gate
        .signup(SignupInput {
            email: "bob@example.com".into(),
            username: "bob".into(),
            first_name: "Bob".into(),
            last_name: "Durand".into(),
            phone_number: None,
            password: "another-long-password".into(),
        })
        .await
        .unwrap();

    let err = gate.approve(bob.id, &alice_user).await.unwrap_err();
    assert!(
        matches!(err, Error::PermissionDenied { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn approve_toggles_back_to_pending() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();

    let approved = gate.approve(alice.id, &admin).await.unwrap();
    assert!(approved.is_approved);

    let pending_again = gate.approve(alice.id, &admin).await.unwrap();
    assert!(!pending_again.is_approved);
}

#[tokio::test]
async fn set_active_requires_super_admin() {
    let (db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();
    let alice_user = SurrealUserRepository::new(db.clone())
        .get_by_id(alice.id)
        .await
        .unwrap();

    let err = gate
        .set_active(admin.id, false, &alice_user)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::PermissionDenied { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn deactivation_kills_live_sessions() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert!(
        gate.resolve_session(&output.session_token)
            .await
            .unwrap()
            .is_some()
    );

    gate.set_active(alice.id, false, &admin).await.unwrap();

    // The session died with the flag, not at next login.
    assert!(
        gate.resolve_session(&output.session_token)
            .await
            .unwrap()
            .is_none()
    );
}

// -----------------------------------------------------------------------
// Session resolution and access evaluation
// -----------------------------------------------------------------------

#[tokio::test]
async fn session_resolves_to_allow() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    let user = gate.resolve_session(&output.session_token).await.unwrap();
    assert_eq!(evaluate(user.as_ref()), AccessDecision::Allow);
}

#[tokio::test]
async fn bogus_token_redirects_to_login() {
    let (_db, gate, _admin) = setup().await;

    let user = gate.resolve_session("totally-bogus-token").await.unwrap();
    assert!(user.is_none());
    assert_eq!(evaluate(user.as_ref()), AccessDecision::RedirectLogin);
}

#[tokio::test]
async fn unapproving_a_logged_in_account_pends_its_session() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    // Toggle approval off while the session lives.
    gate.approve(alice.id, &admin).await.unwrap();

    let user = gate.resolve_session(&output.session_token).await.unwrap();
    assert_eq!(evaluate(user.as_ref()), AccessDecision::RedirectPending);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    gate.logout_by_token(&output.session_token).await.unwrap();
    assert!(
        gate.resolve_session(&output.session_token)
            .await
            .unwrap()
            .is_none()
    );

    // Logging out twice is not an error.
    gate.logout_by_token(&output.session_token).await.unwrap();
}

#[tokio::test]
async fn session_watch_tracks_login_and_logout() {
    let (_db, gate, admin) = setup().await;
    let alice = gate.signup(alice_signup()).await.unwrap();
    gate.approve(alice.id, &admin).await.unwrap();

    let mut rx = gate.subscribe_session_user();
    assert!(rx.borrow().is_none());

    let output = gate
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().username, "alice");

    gate.logout(output.session_id).await.unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow().is_none());
}
