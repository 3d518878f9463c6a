//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! DDD: Domain layer has NO infrastructure dependencies (except error types).
//! Contains: Entities, Value Objects.

pub mod password;
pub mod patch;
pub mod user;

pub use password::Password;
pub use patch::Patch;
pub use user::{CreateUser, NewUser, UpdateUser, User, UserChanges, UserResponse};
