//! User store - existence checks, insert and count over the users table.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{translate_write_error, AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User store trait for dependency injection.
///
/// Implementations must enforce unique usernames and emails themselves;
/// the `exists_*` lookups are advisory.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether a user with this username exists
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Whether a user with this email exists
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Store a new user and return it with its assigned identity.
    ///
    /// A collision on username or email fails with
    /// [`AppError::DuplicateUsername`] or [`AppError::DuplicateEmail`].
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Number of stored users
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM implementation of [`UserStore`].
///
/// Generic over the connection so the same code runs against the pool
/// or inside an open transaction.
pub struct SeaUserStore<C> {
    db: C,
}

impl<C> SeaUserStore<C> {
    /// Create new store instance
    pub fn new(db: C) -> Self {
        Self { db }
    }

    /// Give back the underlying connection.
    pub fn into_inner(self) -> C {
        self.db
    }
}

#[async_trait]
impl<C> UserStore for SeaUserStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let matches = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(matches > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let matches = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(matches > 0)
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash.into_string()),
            enabled: Set(new_user.enabled),
            role: Set(new_user.role),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(translate_write_error)?;

        Ok(User::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
