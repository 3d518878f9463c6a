//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Password, Patch};
use crate::errors::{AppError, AppResult};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// Hashed credential, never serialized
    pub credential: Password,
    pub mobile: Option<String>,
}

impl User {
    /// Check a plaintext credential against the stored hash
    pub fn verify_credential(&self, plain_text: &str) -> bool {
        self.credential.verify(plain_text)
    }
}

/// User creation data transfer object (plaintext credential)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub credential: String,
    pub mobile: Option<String>,
}

/// User update data transfer object (plaintext credential).
///
/// Every field is tri-state; only fields that are set are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub credential: Patch<String>,
    #[serde(default)]
    pub mobile: Patch<String>,
}

impl UpdateUser {
    /// True if the update does not mention any field.
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set() || self.credential.is_set() || self.mobile.is_set())
    }

    /// Reject instructions the schema cannot hold: `name` and `credential`
    /// are required columns and can be replaced but not cleared.
    pub fn check(&self) -> AppResult<()> {
        if self.name == Patch::Null {
            return Err(AppError::validation("name cannot be null"));
        }
        if self.credential == Patch::Null {
            return Err(AppError::validation("credential cannot be null"));
        }
        Ok(())
    }
}

/// A user ready to be stored: the credential is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub credential: Password,
    pub mobile: Option<String>,
}

/// Field changes ready to be stored: a replacement credential is already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub credential: Option<Password>,
    pub mobile: Patch<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i32,
    /// User name
    #[schema(example = "alice")]
    pub name: String,
    /// Mobile number
    #[schema(example = "555-0100")]
    pub mobile: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            mobile: user.mobile,
        }
    }
}
