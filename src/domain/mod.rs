//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod password;
pub mod user;

pub use password::{Argon2PasswordHasher, HashedPassword, PasswordHasher};
pub use user::{NewUser, RegistrationRequest, User};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
