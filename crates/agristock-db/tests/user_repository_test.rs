//! Integration tests for the User repository using in-memory SurrealDB.

use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::user::{CreateUser, UpdateUser};
use agristock_core::repository::{Pagination, UserRepository};
use agristock_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;

async fn setup() -> SurrealUserRepository<MemDb> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agristock_db::run_migrations(&db).await.unwrap();
    SurrealUserRepository::new(db)
}

fn alice() -> CreateUser {
    CreateUser {
        email: "alice@example.com".into(),
        username: "alice".into(),
        first_name: "Alice".into(),
        last_name: "Martin".into(),
        phone_number: None,
        password: "correct-horse-battery".into(),
        role: Role::User,
        is_approved: false,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let repo = setup().await;

    let user = repo.create(alice()).await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::User);
    assert!(user.is_active);
    assert!(!user.is_approved);
    assert!(user.team_id.is_none());
    assert!(user.last_login.is_none());
    // The raw password is never stored.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.username, "alice");
}

#[tokio::test]
async fn get_by_email_and_username() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);

    let by_username = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_username.id, user.id);

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_the_store() {
    let repo = setup().await;
    repo.create(alice()).await.unwrap();

    let mut dup = alice();
    dup.username = "alice2".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn update_flags_and_role() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                role: Some(Role::TeamManager),
                is_approved: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::TeamManager);
    assert!(updated.is_approved);
}

#[tokio::test]
async fn team_id_can_be_set_and_cleared() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();
    let team_id = Uuid::new_v4();

    let assigned = repo
        .update(
            user.id,
            UpdateUser {
                team_id: Some(Some(team_id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(assigned.team_id, Some(team_id));

    let cleared = repo
        .update(
            user.id,
            UpdateUser {
                team_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.team_id, None);
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let repo = setup().await;

    let err = repo
        .update(
            Uuid::new_v4(),
            UpdateUser {
                is_approved: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn list_paginates() {
    let repo = setup().await;
    for i in 0..3 {
        repo.create(CreateUser {
            email: format!("user{i}@example.com"),
            username: format!("user{i}"),
            first_name: "User".into(),
            last_name: format!("{i}"),
            phone_number: None,
            password: "correct-horse-battery".into(),
            role: Role::User,
            is_approved: false,
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
}
