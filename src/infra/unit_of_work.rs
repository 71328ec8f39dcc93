//! Unit of Work pattern implementation.
//!
//! Groups the registration checks and the insert into one database
//! transaction so the storage constraints settle concurrent writers.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{SeaUserStore, UserStore};
use crate::errors::{translate_write_error, AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides store access outside a transaction and opens transactions
/// for multi-step writes.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the non-transactional user store
    fn users(&self) -> Arc<dyn UserStore>;

    /// Open a read-write transaction.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;
}

/// An open transaction.
///
/// Dropping it without calling [`commit`](StoreTransaction::commit)
/// discards its writes.
#[async_trait]
pub trait StoreTransaction: Send + Sync {
    /// User store bound to this transaction
    fn users(&self) -> &dyn UserStore;

    /// Make the writes durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard the writes.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_store: Arc<SeaUserStore<DatabaseConnection>>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_store = Arc::new(SeaUserStore::new(db.clone()));
        Self { db, user_store }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserStore> {
        self.user_store.clone()
    }

    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        // ReadCommitted is enough: the unique indexes arbitrate collisions
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        Ok(Box::new(SeaTransaction::new(txn)))
    }
}

/// SeaORM transaction wrapping a transaction-bound user store.
pub struct SeaTransaction {
    users: SeaUserStore<DatabaseTransaction>,
}

impl SeaTransaction {
    fn new(txn: DatabaseTransaction) -> Self {
        Self {
            users: SeaUserStore::new(txn),
        }
    }
}

#[async_trait]
impl StoreTransaction for SeaTransaction {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.users
            .into_inner()
            .commit()
            .await
            .map_err(translate_write_error)
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.users
            .into_inner()
            .rollback()
            .await
            .map_err(AppError::from)
    }
}
