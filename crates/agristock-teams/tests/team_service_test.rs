//! Integration tests for the team service using in-memory SurrealDB.

use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::team::{CreateTeam, UpdateTeam};
use agristock_core::models::user::{CreateUser, User};
use agristock_core::repository::{HangarRepository, TeamRepository, UserRepository};
use agristock_core::models::hangar::CreateHangar;
use agristock_db::repository::{
    SurrealHangarRepository, SurrealInterventionRepository, SurrealTeamRepository,
    SurrealUserRepository,
};
use agristock_teams::TeamService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;
type Service = TeamService<
    SurrealUserRepository<MemDb>,
    SurrealTeamRepository<MemDb>,
    SurrealHangarRepository<MemDb>,
    SurrealInterventionRepository<MemDb>,
>;

/// Helper: spin up in-memory DB, run migrations, build the service.
async fn setup() -> (Surreal<MemDb>, Service) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agristock_db::run_migrations(&db).await.unwrap();

    let service = TeamService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealTeamRepository::new(db.clone()),
        SurrealHangarRepository::new(db.clone()),
        SurrealInterventionRepository::new(db.clone()),
    );

    (db, service)
}

async fn create_user(db: &Surreal<MemDb>, username: &str, role: Role) -> User {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: format!("{username}@example.com"),
            username: username.into(),
            first_name: username.into(),
            last_name: "Test".into(),
            phone_number: None,
            password: "correct-horse-battery".into(),
            role,
            is_approved: true,
        })
        .await
        .unwrap()
}

async fn fetch_user(db: &Surreal<MemDb>, id: Uuid) -> User {
    SurrealUserRepository::new(db.clone())
        .get_by_id(id)
        .await
        .unwrap()
}

async fn member_ids(db: &Surreal<MemDb>, team_id: Uuid) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = SurrealTeamRepository::new(db.clone())
        .get_members(team_id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    ids.sort();
    ids
}

fn sorted(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids
}

// -----------------------------------------------------------------------
// Team creation
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_team_with_manager_as_sole_member() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    assert_eq!(team.name, "Alpha");
    assert_eq!(team.manager_id, m1.id);
    assert_eq!(member_ids(&db, team.id).await, vec![m1.id]);

    // The manager now points at the team and kept their role.
    let m1 = fetch_user(&db, m1.id).await;
    assert_eq!(m1.team_id, Some(team.id));
    assert_eq!(m1.role, Role::TeamManager);
}

#[tokio::test]
async fn create_team_super_admin_manager_keeps_role() {
    let (db, svc) = setup().await;
    let admin = create_user(&db, "boss", Role::SuperAdmin).await;

    let team = svc
        .create_team(CreateTeam {
            name: "HQ team".into(),
            manager_id: admin.id,
            contact_email: Some("hq@example.com".into()),
        })
        .await
        .unwrap();

    let admin = fetch_user(&db, admin.id).await;
    assert_eq!(admin.role, Role::SuperAdmin);
    assert_eq!(admin.team_id, Some(team.id));
}

#[tokio::test]
async fn create_team_rejects_short_name() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;

    let err = svc
        .create_team(CreateTeam {
            name: "ab".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}

#[tokio::test]
async fn create_team_rejects_plain_user_manager() {
    let (db, svc) = setup().await;
    let plain = create_user(&db, "plain", Role::User).await;

    let err = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: plain.id,
            contact_email: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}

#[tokio::test]
async fn create_team_rejects_unknown_manager() {
    let (_db, svc) = setup().await;

    let err = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: Uuid::new_v4(),
            contact_email: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}

// -----------------------------------------------------------------------
// Membership reconciliation
// -----------------------------------------------------------------------

#[tokio::test]
async fn set_members_adds_and_syncs_team_id() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;
    let u2 = create_user(&db, "u2", Role::User).await;
    let u3 = create_user(&db, "u3", Role::User).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    svc.set_members(team.id, &[m1.id, u2.id, u3.id])
        .await
        .unwrap();

    assert_eq!(
        member_ids(&db, team.id).await,
        sorted(vec![m1.id, u2.id, u3.id])
    );
    assert_eq!(fetch_user(&db, u2.id).await.team_id, Some(team.id));
    assert_eq!(fetch_user(&db, u3.id).await.team_id, Some(team.id));
}

#[tokio::test]
async fn set_members_force_includes_manager_and_detaches_removed() {
    // The caller omits the manager and u2: the manager stays anyway,
    // u2 is detached with role untouched.
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;
    let u2 = create_user(&db, "u2", Role::User).await;
    let u3 = create_user(&db, "u3", Role::User).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();
    svc.set_members(team.id, &[m1.id, u2.id, u3.id])
        .await
        .unwrap();

    svc.set_members(team.id, &[u3.id]).await.unwrap();

    assert_eq!(member_ids(&db, team.id).await, sorted(vec![m1.id, u3.id]));

    let u2 = fetch_user(&db, u2.id).await;
    assert_eq!(u2.team_id, None);
    assert_eq!(u2.role, Role::User);

    // The manager still points at the team.
    let m1 = fetch_user(&db, m1.id).await;
    assert_eq!(m1.team_id, Some(team.id));
}

#[tokio::test]
async fn set_members_is_idempotent() {
    // The second identical call must perform no writes.
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;
    let u2 = create_user(&db, "u2", Role::User).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    svc.set_members(team.id, &[m1.id, u2.id]).await.unwrap();
    let u2_after_first = fetch_user(&db, u2.id).await;
    let members_after_first = member_ids(&db, team.id).await;

    svc.set_members(team.id, &[m1.id, u2.id]).await.unwrap();
    let u2_after_second = fetch_user(&db, u2.id).await;

    assert_eq!(member_ids(&db, team.id).await, members_after_first);
    assert_eq!(u2_after_second.team_id, u2_after_first.team_id);
    // No second write happened: the row was not re-stamped.
    assert_eq!(u2_after_second.updated_at, u2_after_first.updated_at);
}

#[tokio::test]
async fn set_members_rejects_unknown_user() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    let err = svc
        .set_members(team.id, &[m1.id, Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");

    // Nothing was written.
    assert_eq!(member_ids(&db, team.id).await, vec![m1.id]);
}

#[tokio::test]
async fn set_members_unknown_team_is_not_found() {
    let (_db, svc) = setup().await;

    let err = svc.set_members(Uuid::new_v4(), &[]).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got: {err:?}");
}

// -----------------------------------------------------------------------
// Manager reassignment
// -----------------------------------------------------------------------

#[tokio::test]
async fn update_team_reassigns_manager() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;
    let m2 = create_user(&db, "m2", Role::User).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    let updated = svc
        .update_team(
            team.id,
            UpdateTeam {
                manager_id: Some(m2.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.manager_id, m2.id);

    // Outgoing manager demoted and detached.
    let m1 = fetch_user(&db, m1.id).await;
    assert_eq!(m1.role, Role::User);
    assert_eq!(m1.team_id, None);

    // Incoming manager promoted, attached, and a member.
    let m2 = fetch_user(&db, m2.id).await;
    assert_eq!(m2.role, Role::TeamManager);
    assert_eq!(m2.team_id, Some(team.id));
    assert!(member_ids(&db, team.id).await.contains(&m2.id));
}

#[tokio::test]
async fn update_team_never_demotes_super_admin() {
    let (db, svc) = setup().await;
    let admin = create_user(&db, "boss", Role::SuperAdmin).await;
    let m2 = create_user(&db, "m2", Role::TeamManager).await;

    let team = svc
        .create_team(CreateTeam {
            name: "HQ team".into(),
            manager_id: admin.id,
            contact_email: None,
        })
        .await
        .unwrap();

    svc.update_team(
        team.id,
        UpdateTeam {
            manager_id: Some(m2.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let admin = fetch_user(&db, admin.id).await;
    assert_eq!(admin.role, Role::SuperAdmin);
    assert_eq!(admin.team_id, None);
}

#[tokio::test]
async fn update_team_name_and_contact_only() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();

    let updated = svc
        .update_team(
            team.id,
            UpdateTeam {
                name: Some("Alpha Renamed".into()),
                contact_email: Some(Some("alpha@example.com".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alpha Renamed");
    assert_eq!(updated.contact_email.as_deref(), Some("alpha@example.com"));
    assert_eq!(updated.manager_id, m1.id);

    // The manager was not touched.
    let m1 = fetch_user(&db, m1.id).await;
    assert_eq!(m1.team_id, Some(team.id));
    assert_eq!(m1.role, Role::TeamManager);
}

#[tokio::test]
async fn update_unknown_team_is_not_found() {
    let (_db, svc) = setup().await;

    let err = svc
        .update_team(
            Uuid::new_v4(),
            UpdateTeam {
                name: Some("Ghost".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "got: {err:?}");
}

// -----------------------------------------------------------------------
// Team deletion
// -----------------------------------------------------------------------

#[tokio::test]
async fn delete_team_cleans_up_members_and_references() {
    let (db, svc) = setup().await;
    let m1 = create_user(&db, "m1", Role::TeamManager).await;
    let u2 = create_user(&db, "u2", Role::User).await;

    let team = svc
        .create_team(CreateTeam {
            name: "Alpha".into(),
            manager_id: m1.id,
            contact_email: None,
        })
        .await
        .unwrap();
    svc.set_members(team.id, &[m1.id, u2.id]).await.unwrap();

    let hangar_repo = SurrealHangarRepository::new(db.clone());
    let hangar = hangar_repo
        .create(CreateHangar {
            name: "North barn".into(),
            location: "Field 3".into(),
            capacity_kg: 50_000.0,
            team_id: Some(team.id),
        })
        .await
        .unwrap();

    svc.delete_team(team.id).await.unwrap();

    // Manager demoted to User and detached.
    let m1 = fetch_user(&db, m1.id).await;
    assert_eq!(m1.role, Role::User);
    assert_eq!(m1.team_id, None);

    // Plain member detached, role unchanged.
    let u2 = fetch_user(&db, u2.id).await;
    assert_eq!(u2.role, Role::User);
    assert_eq!(u2.team_id, None);

    // Team row gone, membership edges gone.
    let err = svc.get_team(team.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(member_ids(&db, team.id).await.is_empty());

    // The hangar survives without a team.
    let hangar = hangar_repo.get_by_id(hangar.id).await.unwrap();
    assert_eq!(hangar.team_id, None);
}

#[tokio::test]
async fn delete_unknown_team_is_not_found() {
    let (_db, svc) = setup().await;

    let err = svc.delete_team(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got: {err:?}");
}
