//! User repository - read access to stored users.
//!
//! Writes never go through this repository: they are staged on a
//! [`TxUserRepository`](crate::infra::TxUserRepository) inside a unit of work
//! and finalized by the gateway's commit.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find the user with the lowest ID among those named `name`
    async fn find_first_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// List users ordered by ID
    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = queries::find_by_id(&self.db, id)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_first_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let result = queries::find_first_by_name(&self.db, name)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<User>> {
        let models = queries::list(&self.db, offset, limit)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

/// Queries shared by the pooled store and the transactional repository.
pub(crate) mod queries {
    use super::*;

    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> Result<Option<user::Model>, DbErr> {
        UserEntity::find_by_id(id).one(conn).await
    }

    // Names are not unique; the oldest row wins.
    pub async fn find_first_by_name<C: ConnectionTrait>(
        conn: &C,
        name: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        UserEntity::find()
            .filter(user::Column::Name.eq(name))
            .order_by_asc(user::Column::Id)
            .one(conn)
            .await
    }

    // Drivers bind OFFSET/LIMIT as i64 and panic on anything larger.
    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<user::Model>, DbErr> {
        UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(offset.min(i64::MAX as u64))
            .limit(limit.min(i64::MAX as u64))
            .all(conn)
            .await
    }
}
