//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - The user store and its SeaORM implementation
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{SeaUserStore, UserStore};
pub use unit_of_work::{Persistence, SeaTransaction, StoreTransaction, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserStore;
