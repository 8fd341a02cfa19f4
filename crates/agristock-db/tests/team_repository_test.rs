//! Integration tests for the Team repository using in-memory SurrealDB.

use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::team::{CreateTeam, UpdateTeam};
use agristock_core::models::user::{CreateUser, User};
use agristock_core::repository::{TeamRepository, UserRepository};
use agristock_db::repository::{SurrealTeamRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;

/// Helper: spin up in-memory DB, run migrations, create two users.
async fn setup() -> (Surreal<MemDb>, User, User) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agristock_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let alice = user_repo
        .create(CreateUser {
            email: "alice@example.com".into(),
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Martin".into(),
            phone_number: None,
            password: "correct-horse-battery".into(),
            role: Role::TeamManager,
            is_approved: true,
        })
        .await
        .unwrap();
    let bob = user_repo
        .create(CreateUser {
            email: "bob@example.com".into(),
            username: "bob".into(),
            first_name: "Bob".into(),
            last_name: "Durand".into(),
            phone_number: None,
            password: "correct-horse-battery".into(),
            role: Role::User,
            is_approved: true,
        })
        .await
        .unwrap();

    (db, alice, bob)
}

#[tokio::test]
async fn create_and_get_team() {
    let (db, alice, _) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let team = repo
        .create(CreateTeam {
            name: "Alpha".into(),
            manager_id: alice.id,
            contact_email: Some("alpha@example.com".into()),
        })
        .await
        .unwrap();

    assert_eq!(team.name, "Alpha");
    assert_eq!(team.manager_id, alice.id);

    let fetched = repo.get_by_id(team.id).await.unwrap();
    assert_eq!(fetched.id, team.id);
    assert_eq!(fetched.contact_email.as_deref(), Some("alpha@example.com"));
}

#[tokio::test]
async fn update_team_fields() {
    let (db, alice, bob) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let team = repo
        .create(CreateTeam {
            name: "Alpha".into(),
            manager_id: alice.id,
            contact_email: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            team.id,
            UpdateTeam {
                name: Some("Bravo".into()),
                manager_id: Some(bob.id),
                contact_email: Some(Some("bravo@example.com".into())),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Bravo");
    assert_eq!(updated.manager_id, bob.id);
    assert_eq!(updated.contact_email.as_deref(), Some("bravo@example.com"));
}

#[tokio::test]
async fn get_unknown_team_is_not_found() {
    let (db, _, _) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn membership_edges_are_a_set() {
    let (db, alice, bob) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let team = repo
        .create(CreateTeam {
            name: "Alpha".into(),
            manager_id: alice.id,
            contact_email: None,
        })
        .await
        .unwrap();

    repo.add_member(alice.id, team.id).await.unwrap();
    repo.add_member(bob.id, team.id).await.unwrap();
    // Re-adding must not create a duplicate edge.
    repo.add_member(bob.id, team.id).await.unwrap();

    let members = repo.get_members(team.id).await.unwrap();
    assert_eq!(members.len(), 2);

    repo.remove_member(bob.id, team.id).await.unwrap();
    let members = repo.get_members(team.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, alice.id);

    // Removing an absent member is a no-op.
    repo.remove_member(bob.id, team.id).await.unwrap();
}

#[tokio::test]
async fn add_member_requires_existing_user_and_team() {
    let (db, alice, _) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let team = repo
        .create(CreateTeam {
            name: "Alpha".into(),
            manager_id: alice.id,
            contact_email: None,
        })
        .await
        .unwrap();

    let err = repo.add_member(Uuid::new_v4(), team.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let err = repo.add_member(alice.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_team_and_edges() {
    let (db, alice, bob) = setup().await;
    let repo = SurrealTeamRepository::new(db);

    let team = repo
        .create(CreateTeam {
            name: "Alpha".into(),
            manager_id: alice.id,
            contact_email: None,
        })
        .await
        .unwrap();
    repo.add_member(alice.id, team.id).await.unwrap();
    repo.add_member(bob.id, team.id).await.unwrap();

    repo.delete(team.id).await.unwrap();

    let err = repo.get_by_id(team.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(repo.get_members(team.id).await.unwrap().is_empty());
}
