//! User repository integration tests.

mod common;

use common::{create_company, setup_db};
use omnigest_core::auth::Role;
use omnigest_db::{
    UserRepository,
    entities::enums::ProfileRole,
    repositories::{CreateUserInput, UpdateUserInput, UserError},
};
use uuid::Uuid;

fn input(username: &str, role: Role, company_id: Option<Uuid>) -> CreateUserInput {
    CreateUserInput {
        username: username.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        email: Some(format!("{username}@omnigest.sv")),
        role,
        company_id,
    }
}

#[tokio::test]
async fn test_create_user_with_profile() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = UserRepository::new(db.clone());

    let created = repo
        .create(input("maria", Role::Gerente, Some(company.id)))
        .await
        .expect("Failed to create user");
    assert_eq!(created.role(), Some(Role::Gerente));
    assert_eq!(created.company_id(), Some(company.id));
    assert!(created.user.is_active);

    let found = repo
        .find_by_username("maria")
        .await
        .expect("query")
        .expect("User missing");
    assert_eq!(found.user.id, created.user.id);
    assert_eq!(
        found.profile.as_ref().map(|p| p.role),
        Some(ProfileRole::Gerente)
    );

    let serialized = serde_json::to_value(&found.user).expect("serialize user");
    assert!(serialized.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_username_and_unknown_company() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());

    repo.create(input("admin", Role::Administrador, None))
        .await
        .expect("Failed to create admin");

    let duplicate = repo.create(input("admin", Role::Empleado, None)).await;
    assert!(matches!(duplicate, Err(UserError::UsernameTaken(name)) if name == "admin"));

    let missing_company = Uuid::new_v4();
    let orphan = repo
        .create(input("juan", Role::Empleado, Some(missing_company)))
        .await;
    assert!(matches!(orphan, Err(UserError::CompanyNotFound(id)) if id == missing_company));
    assert!(repo.find_by_username("juan").await.expect("query").is_none());
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = UserRepository::new(db.clone());

    let created = repo
        .create(input("pedro", Role::Empleado, Some(company.id)))
        .await
        .expect("Failed to create user");

    let updated = repo
        .update(
            created.user.id,
            UpdateUserInput {
                username: Some("pedro.r".to_string()),
                role: Some(Role::Contador),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update user");
    assert_eq!(updated.user.username, "pedro.r");
    assert_eq!(updated.role(), Some(Role::Contador));
    assert_eq!(updated.company_id(), Some(company.id));

    let recent = repo.list_recent(5).await.expect("Failed to list users");
    assert_eq!(recent.len(), 1);

    repo.delete(created.user.id).await.expect("Failed to delete user");
    assert!(repo.find_by_id(created.user.id).await.expect("query").is_none());
    assert!(repo.find_profile(created.user.id).await.expect("query").is_none());
    assert!(matches!(
        repo.delete(created.user.id).await,
        Err(UserError::NotFound(_))
    ));
}
