//! Integration tests for UserService over a real Unit of Work.
//!
//! Each test gets its own in-memory SQLite database with migrations applied.

use std::sync::Arc;

use user_api::config::Config;
use user_api::domain::{CreateUser, Patch, UpdateUser};
use user_api::errors::AppError;
use user_api::infra::{Database, Persistence, UnitOfWork};
use user_api::services::{UserManager, UserService};

// =============================================================================
// Test Helpers
// =============================================================================

async fn setup() -> (Arc<Persistence>, UserManager<Persistence>) {
    let mut config = Config::with_database_url("sqlite::memory:");
    config.database.max_connections = 1;

    let database = Database::connect(&config)
        .await
        .expect("in-memory database should open");
    let uow = Arc::new(Persistence::new(database.get_connection()));
    let service = UserManager::new(uow.clone());
    (uow, service)
}

async fn setup_with_database() -> (Database, UserManager<Persistence>) {
    let mut config = Config::with_database_url("sqlite::memory:");
    config.database.max_connections = 1;

    let database = Database::connect(&config)
        .await
        .expect("in-memory database should open");
    let uow = Arc::new(Persistence::new(database.get_connection()));
    (database, UserManager::new(uow))
}

fn create(name: &str, credential: &str, mobile: Option<&str>) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        credential: credential.to_string(),
        mobile: mobile.map(str::to_string),
    }
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn test_user_lifecycle_scenario() {
    let (_, service) = setup().await;

    let alice = service.create_user(create("alice", "pw123", None)).await.unwrap();
    assert_eq!(alice.id, 1);
    assert_eq!(alice.name, "alice");
    assert!(alice.mobile.is_none());

    let authenticated = service.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(authenticated, Some(alice.clone()));

    assert!(service.authenticate("alice", "wrong").await.unwrap().is_none());

    let update = UpdateUser {
        mobile: Patch::Value("555-0100".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(1, update).await.unwrap().unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.name, "alice");
    assert_eq!(updated.mobile.as_deref(), Some("555-0100"));

    assert!(service.delete_user(1).await.unwrap());
    assert!(service.get_user(1).await.unwrap().is_none());
}

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_stores_hash_not_plaintext() {
    let (uow, service) = setup().await;

    let user = service
        .create_user(create("alice", "pw123", Some("555-0100")))
        .await
        .unwrap();
    let stored = uow.users().find_by_id(user.id).await.unwrap().unwrap();

    assert_eq!(stored.name, "alice");
    assert_eq!(stored.mobile.as_deref(), Some("555-0100"));
    assert_ne!(stored.credential.as_str(), "pw123");
    assert!(stored.credential.as_str().starts_with("$argon2"));
    assert!(stored.verify_credential("pw123"));
}

#[tokio::test]
async fn test_ids_are_assigned_in_order() {
    let (_, service) = setup().await;

    let first = service.create_user(create("a", "pw", None)).await.unwrap();
    let second = service.create_user(create("b", "pw", None)).await.unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_get_missing_user_is_none() {
    let (_, service) = setup().await;
    assert!(service.get_user(7).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_is_ordered_and_windowed() {
    let (_, service) = setup().await;
    for name in ["a", "b", "c", "d", "e"] {
        service.create_user(create(name, "pw", None)).await.unwrap();
    }

    let all = service.list_users(0, 100).await.unwrap();
    let ids: Vec<i32> = all.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let page = service.list_users(1, 2).await.unwrap();
    let names: Vec<&str> = page.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);

    assert!(service.list_users(10, 2).await.unwrap().is_empty());
    assert!(service.list_users(u64::MAX, u64::MAX).await.unwrap().is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_mobile_only_keeps_name_and_credential() {
    let (_, service) = setup().await;
    let user = service.create_user(create("alice", "pw123", None)).await.unwrap();

    let update = UpdateUser {
        mobile: Patch::Value("555-0100".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(user.id, update).await.unwrap().unwrap();

    assert_eq!(updated.name, "alice");
    assert_eq!(updated.credential, user.credential);
    assert!(updated.verify_credential("pw123"));
}

#[tokio::test]
async fn test_update_credential_rehashes() {
    let (_, service) = setup().await;
    let user = service.create_user(create("alice", "pw123", None)).await.unwrap();

    let update = UpdateUser {
        credential: Patch::Value("new-secret".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(user.id, update).await.unwrap().unwrap();

    assert_ne!(updated.credential.as_str(), "new-secret");
    assert!(!updated.verify_credential("pw123"));
    assert!(updated.verify_credential("new-secret"));

    assert!(service.authenticate("alice", "pw123").await.unwrap().is_none());
    assert!(service.authenticate("alice", "new-secret").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_null_mobile_clears_it() {
    let (_, service) = setup().await;
    let user = service
        .create_user(create("alice", "pw123", Some("555-0100")))
        .await
        .unwrap();

    let update = UpdateUser {
        mobile: Patch::Null,
        ..Default::default()
    };
    let updated = service.update_user(user.id, update).await.unwrap().unwrap();

    assert!(updated.mobile.is_none());
}

#[tokio::test]
async fn test_update_rejects_null_credential() {
    let (_, service) = setup().await;
    let user = service.create_user(create("alice", "pw123", None)).await.unwrap();

    let update = UpdateUser {
        credential: Patch::Null,
        ..Default::default()
    };
    let result = service.update_user(user.id, update).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(service.authenticate("alice", "pw123").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_missing_user_is_none() {
    let (_, service) = setup().await;

    let update = UpdateUser {
        name: Patch::Value("bob".to_string()),
        ..Default::default()
    };
    assert!(service.update_user(99, update).await.unwrap().is_none());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_missing_user_is_false() {
    let (_, service) = setup().await;
    assert!(!service.delete_user(99).await.unwrap());
}

#[tokio::test]
async fn test_delete_removes_only_target() {
    let (_, service) = setup().await;
    let alice = service.create_user(create("alice", "pw", None)).await.unwrap();
    let bob = service.create_user(create("bob", "pw", None)).await.unwrap();

    assert!(service.delete_user(alice.id).await.unwrap());

    assert!(service.get_user(alice.id).await.unwrap().is_none());
    assert!(service.get_user(bob.id).await.unwrap().is_some());
    assert!(!service.delete_user(alice.id).await.unwrap());
}

// =============================================================================
// Authenticate
// =============================================================================

#[tokio::test]
async fn test_unknown_name_and_wrong_credential_look_the_same() {
    let (_, service) = setup().await;
    service.create_user(create("alice", "pw123", None)).await.unwrap();

    let wrong = service.authenticate("alice", "nope").await.unwrap();
    let unknown = service.authenticate("mallory", "pw123").await.unwrap();

    assert_eq!(wrong, unknown);
    assert!(wrong.is_none());
}

#[tokio::test]
async fn test_duplicate_names_authenticate_against_oldest() {
    let (_, service) = setup().await;
    let first = service.create_user(create("alice", "first", None)).await.unwrap();
    service.create_user(create("alice", "second", None)).await.unwrap();

    let user = service.authenticate("alice", "first").await.unwrap();
    assert_eq!(user.map(|u| u.id), Some(first.id));

    assert!(service.authenticate("alice", "second").await.unwrap().is_none());
}

// =============================================================================
// Persistence failures
// =============================================================================

#[tokio::test]
async fn test_failed_writes_surface_as_database_errors() {
    let (database, service) = setup_with_database().await;
    let alice = service.create_user(create("alice", "pw123", None)).await.unwrap();

    // Drop the users table so every statement fails
    database.rollback_migration().await.unwrap();

    let created = service.create_user(create("bob", "pw", None)).await;
    assert!(matches!(created, Err(AppError::Database(_))));

    let update = UpdateUser {
        name: Patch::Value("carol".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(alice.id, update).await;
    assert!(matches!(updated, Err(AppError::Database(_))));

    let deleted = service.delete_user(alice.id).await;
    assert!(matches!(deleted, Err(AppError::Database(_))));

    database.run_migrations().await.unwrap();
    assert!(service.list_users(0, 100).await.unwrap().is_empty());
    assert!(database.ping().await.is_ok());

    // The gateway still works once the schema is back
    let dave = service.create_user(create("dave", "pw", None)).await.unwrap();
    assert_eq!(service.get_user(dave.id).await.unwrap(), Some(dave));
}
