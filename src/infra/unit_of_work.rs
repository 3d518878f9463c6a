//! Unit of Work pattern implementation.
//!
//! The persistence gateway: every create, update and delete is staged on a
//! [`TransactionContext`] and finalized through its [`commit`](TransactionContext::commit).
//! The transaction itself is private to the context, so there is no other
//! way to make a write durable.
//!
//! - `begin` opens one database transaction per unit of work
//! - `commit` persists everything staged, then re-reads the given entity
//! - `rollback` (or dropping the context) discards everything staged

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, Set, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::entities::user::{self, Entity as UserEntity};
use super::repositories::{queries, UserRepository, UserStore};
use crate::domain::{NewUser, Patch, User, UserChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
///
/// Provides read access through [`users`](UnitOfWork::users) and opens
/// transaction contexts for writes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository (reads outside any transaction)
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<TransactionContext>;
}

/// Entities that can be re-read from committed state.
#[async_trait]
pub trait Refresh: Sized + Send {
    async fn refresh(self, db: &DatabaseConnection) -> Result<Self, DbErr>;
}

#[async_trait]
impl Refresh for User {
    async fn refresh(self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        queries::find_by_id(db, self.id)
            .await?
            .map(User::from)
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {} after commit", self.id)))
    }
}

/// Owned handle to one unit of work.
///
/// Dropping the context without calling [`commit`](Self::commit) rolls the
/// transaction back.
pub struct TransactionContext {
    txn: DatabaseTransaction,
    db: DatabaseConnection,
}

impl TransactionContext {
    fn new(txn: DatabaseTransaction, db: DatabaseConnection) -> Self {
        Self { txn, db }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(&self.txn)
    }

    /// Commit all staged changes.
    ///
    /// With an entity, the entity is refreshed from the committed state and
    /// returned. Without one (deletes), nothing is returned. A failed commit
    /// leaves nothing persisted.
    pub async fn commit<R: Refresh>(self, entity: Option<R>) -> AppResult<Option<R>> {
        let Self { txn, db } = self;

        if let Err(e) = txn.commit().await {
            tracing::error!(error = %e, "Commit failed, unit of work rolled back");
            return Err(AppError::from(e));
        }

        match entity {
            Some(entity) => {
                let refreshed = entity.refresh(&db).await.map_err(AppError::from)?;
                Ok(Some(refreshed))
            }
            None => Ok(None),
        }
    }

    /// Discard all staged changes.
    pub async fn rollback(self) {
        if let Err(e) = self.txn.rollback().await {
            tracing::error!("Transaction rollback failed: {}", e);
        }
    }

    /// Commit on a staged success, roll back and propagate on a staged failure.
    pub async fn finish<R: Refresh>(self, staged: AppResult<Option<R>>) -> AppResult<Option<R>> {
        match staged {
            Ok(entity) => self.commit(entity).await,
            Err(e) => {
                self.rollback().await;
                Err(e)
            }
        }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn begin(&self) -> AppResult<TransactionContext> {
        let txn = self.db.begin().await.map_err(AppError::from)?;
        Ok(TransactionContext::new(txn, self.db.clone()))
    }
}

/// A row deleted between the read and the UPDATE leaves nothing to update.
fn updated_or_missing(result: Result<user::Model, DbErr>) -> Result<Option<user::Model>, DbErr> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Transaction-aware user repository.
///
/// Everything staged here becomes visible to other connections only once the
/// owning context commits.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by ID, seeing changes staged in this transaction
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = queries::find_by_id(self.txn, id)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Stage a new user. The returned user carries its assigned ID.
    pub async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            credential: Set(new_user.credential.into_string()),
            mobile: Set(new_user.mobile),
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    /// Stage field changes on an existing user.
    ///
    /// Returns `None` if no user has this ID.
    pub async fn update(&self, id: i32, changes: UserChanges) -> AppResult<Option<User>> {
        let Some(model) = queries::find_by_id(self.txn, id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = model.clone().into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(credential) = changes.credential {
            active.credential = Set(credential.into_string());
        }
        match changes.mobile {
            Patch::Unset => {}
            Patch::Null => active.mobile = Set(None),
            Patch::Value(mobile) => active.mobile = Set(Some(mobile)),
        }

        if !active.is_changed() {
            return Ok(Some(User::from(model)));
        }

        let model = updated_or_missing(active.update(self.txn).await)?;

        Ok(model.map(User::from))
    }

    /// Stage removal of a user. Returns `false` if no user has this ID.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
