//! User API - user management over HTTP
//!
//! Stores users with hashed credentials and exposes create, read, list,
//! partial update, delete and credential checks. Every write goes through
//! a unit of work that either commits as a whole or rolls back.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities (user, password hash, patch)
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, repositories, unit of work)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve --port 8000
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
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Patch, User};
pub use errors::{AppError, AppResult};
pub use infra::Database;
