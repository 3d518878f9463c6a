//! Integration tests for the Unit of Work against an in-memory SQLite database.

use std::sync::Arc;

use user_api::config::Config;
use user_api::domain::{NewUser, Password, Patch, User, UserChanges};
use user_api::errors::AppError;
use user_api::infra::{Database, Persistence, UnitOfWork};

// =============================================================================
// Test Helpers
// =============================================================================

async fn persistence() -> Arc<Persistence> {
    // A single pooled connection keeps every query on the same in-memory database
    let mut config = Config::with_database_url("sqlite::memory:");
    config.database.max_connections = 1;

    let database = Database::connect(&config)
        .await
        .expect("in-memory database should open");
    Arc::new(Persistence::new(database.get_connection()))
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        credential: Password::new("pw123").expect("hashing should succeed"),
        mobile: None,
    }
}

async fn insert_committed(uow: &Persistence, name: &str) -> User {
    let ctx = uow.begin().await.unwrap();
    let staged = ctx.users().insert(new_user(name)).await.unwrap();
    ctx.commit(Some(staged)).await.unwrap().unwrap()
}

// =============================================================================
// Commit
// =============================================================================

#[tokio::test]
async fn test_commit_returns_refreshed_entity_with_id() {
    let uow = persistence().await;

    let user = insert_committed(&uow, "alice").await;

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "alice");
    assert!(user.verify_credential("pw123"));

    let stored = uow.users().find_by_id(user.id).await.unwrap();
    assert_eq!(stored, Some(user));
}

#[tokio::test]
async fn test_commit_without_entity_returns_nothing() {
    let uow = persistence().await;
    let user = insert_committed(&uow, "alice").await;

    let ctx = uow.begin().await.unwrap();
    assert!(ctx.users().delete(user.id).await.unwrap());
    let result = ctx.commit(None::<User>).await.unwrap();

    assert!(result.is_none());
    assert!(uow.users().find_by_id(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_staged_changes_visible_inside_transaction() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    let staged = ctx.users().insert(new_user("alice")).await.unwrap();
    let seen = ctx.users().find_by_id(staged.id).await.unwrap();
    ctx.commit(Some(staged)).await.unwrap();

    assert_eq!(seen.map(|u| u.name), Some("alice".to_string()));
}

// =============================================================================
// Rollback
// =============================================================================

#[tokio::test]
async fn test_rollback_discards_staged_insert() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    ctx.users().insert(new_user("alice")).await.unwrap();
    ctx.rollback().await;

    assert!(uow.users().list(0, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dropped_context_rolls_back() {
    let uow = persistence().await;

    {
        let ctx = uow.begin().await.unwrap();
        ctx.users().insert(new_user("alice")).await.unwrap();
    }

    assert!(uow.users().list(0, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_finish_rolls_back_on_staging_failure() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    ctx.users().insert(new_user("alice")).await.unwrap();
    let staged: Result<Option<User>, AppError> = Err(AppError::internal("second step failed"));
    let result = ctx.finish(staged).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(uow.users().list(0, 100).await.unwrap().is_empty());
}

// =============================================================================
// Transactional repository
// =============================================================================

#[tokio::test]
async fn test_update_missing_user_is_none() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    let result = ctx
        .users()
        .update(
            99,
            UserChanges {
                name: Some("bob".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ctx.rollback().await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_applies_only_given_fields() {
    let uow = persistence().await;
    let user = insert_committed(&uow, "alice").await;

    let ctx = uow.begin().await.unwrap();
    let staged = ctx
        .users()
        .update(
            user.id,
            UserChanges {
                mobile: Patch::Value("555-0100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = ctx.finish(Ok(staged)).await.unwrap().unwrap();

    assert_eq!(updated.mobile.as_deref(), Some("555-0100"));
    assert_eq!(updated.name, user.name);
    assert_eq!(updated.credential, user.credential);
}

#[tokio::test]
async fn test_update_null_clears_mobile() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    let mut input = new_user("alice");
    input.mobile = Some("555-0100".to_string());
    let staged = ctx.users().insert(input).await.unwrap();
    let user = ctx.commit(Some(staged)).await.unwrap().unwrap();
    assert!(user.mobile.is_some());

    let ctx = uow.begin().await.unwrap();
    let staged = ctx
        .users()
        .update(
            user.id,
            UserChanges {
                mobile: Patch::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = ctx.finish(Ok(staged)).await.unwrap().unwrap();

    assert!(updated.mobile.is_none());
}

#[tokio::test]
async fn test_empty_update_returns_current_state() {
    let uow = persistence().await;
    let user = insert_committed(&uow, "alice").await;

    let ctx = uow.begin().await.unwrap();
    let staged = ctx
        .users()
        .update(user.id, UserChanges::default())
        .await
        .unwrap();
    let updated = ctx.finish(Ok(staged)).await.unwrap();

    assert_eq!(updated, Some(user));
}

#[tokio::test]
async fn test_delete_missing_user_is_false() {
    let uow = persistence().await;

    let ctx = uow.begin().await.unwrap();
    let deleted = ctx.users().delete(42).await.unwrap();
    ctx.rollback().await;

    assert!(!deleted);
}
