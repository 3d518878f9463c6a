//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.
//!
//! Credentials are hashed here, before anything is staged, so plaintext never
//! reaches the persistence layer.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::domain::{CreateUser, NewUser, Password, Patch, UpdateUser, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hash verified against when the requested name does not exist, so an
/// unknown name costs the same as a wrong credential.
static DECOY_CREDENTIAL: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("decoy-credential").ok());

/// User service trait for dependency injection.
///
/// A missing user is an ordinary outcome (`None` / `false`), not an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Hash the credential and store a new user
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<Option<User>>;

    /// List users ordered by ID
    async fn list_users(&self, offset: u64, limit: u64) -> AppResult<Vec<User>>;

    /// Apply the fields set in `update`
    async fn update_user(&self, id: i32, update: UpdateUser) -> AppResult<Option<User>>;

    /// Remove a user; `false` if it did not exist
    async fn delete_user(&self, id: i32) -> AppResult<bool>;

    /// Return the user only if `name` exists and `credential` matches
    async fn authenticate(&self, name: &str, credential: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let new_user = NewUser {
            name: input.name,
            credential: Password::new(&input.credential)?,
            mobile: input.mobile,
        };

        let ctx = self.uow.begin().await?;
        let staged = ctx.users().insert(new_user).await.map(Some);
        let user = ctx
            .finish(staged)
            .await?
            .ok_or_else(|| AppError::internal("created user missing after commit"))?;

        tracing::info!(user_id = user.id, action = "create", "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<Option<User>> {
        self.uow.users().find_by_id(id).await
    }

    async fn list_users(&self, offset: u64, limit: u64) -> AppResult<Vec<User>> {
        self.uow.users().list(offset, limit).await
    }

    async fn update_user(&self, id: i32, update: UpdateUser) -> AppResult<Option<User>> {
        update.check()?;

        if update.is_empty() {
            return self.uow.users().find_by_id(id).await;
        }

        let credential = match update.credential {
            Patch::Value(plain) => Some(Password::new(&plain)?),
            _ => None,
        };
        let changes = UserChanges {
            name: match update.name {
                Patch::Value(name) => Some(name),
                _ => None,
            },
            credential,
            mobile: update.mobile,
        };

        let ctx = self.uow.begin().await?;
        let staged = ctx.users().update(id, changes).await;
        let updated = ctx.finish(staged).await?;

        match &updated {
            Some(user) => tracing::info!(user_id = user.id, action = "update", "User updated"),
            None => tracing::debug!(user_id = id, action = "update", "User not found"),
        }
        Ok(updated)
    }

    async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let ctx = self.uow.begin().await?;

        let deleted = match ctx.users().delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                ctx.rollback().await;
                return Err(e);
            }
        };

        if !deleted {
            ctx.rollback().await;
            tracing::debug!(user_id = id, action = "delete", "User not found");
            return Ok(false);
        }

        ctx.commit(None::<User>).await?;
        tracing::info!(user_id = id, action = "delete", "User deleted");
        Ok(true)
    }

    async fn authenticate(&self, name: &str, credential: &str) -> AppResult<Option<User>> {
        let candidate = self.uow.users().find_first_by_name(name).await?;

        let verified = match &candidate {
            Some(user) => user.verify_credential(credential),
            None => {
                if let Some(decoy) = DECOY_CREDENTIAL.as_ref() {
                    decoy.verify(credential);
                }
                false
            }
        };

        if !verified {
            tracing::info!(action = "authenticate", "Authentication failed");
            return Ok(None);
        }

        if let Some(user) = &candidate {
            tracing::info!(user_id = user.id, action = "authenticate", "User authenticated");
        }
        Ok(candidate)
    }
}
