//! Registration Service - user sign-up over HTTP.
//!
//! Accepts a username, email and password, rejects duplicates, hashes the
//! password with Argon2 and stores the account. A diagnostics endpoint
//! reports the user count.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, registration input, password hashing
//! - **services**: The registration workflow
//! - **infra**: Database, migrations, user store, transactions
//! - **api**: HTTP handlers and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{RegistrationRequest, User};
pub use errors::{AppError, AppResult};
pub use services::{RegistrationService, RegistrationWorkflow};
