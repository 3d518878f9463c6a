//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MAX_CREDENTIAL_LENGTH, MAX_MOBILE_LENGTH, MAX_NAME_LENGTH};
use crate::domain::{CreateUser, Patch, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{ListParams, NoContent};

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User name (not required to be unique)
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    #[schema(example = "alice", min_length = 1, max_length = 255)]
    pub name: String,
    /// Plaintext credential, stored only as a hash
    #[validate(length(min = 1, max = 255, message = "Credential must be 1 to 255 characters"))]
    #[schema(example = "pw123", min_length = 1, max_length = 255)]
    pub credential: String,
    /// Mobile number
    #[validate(length(max = 32, message = "Mobile must be at most 32 characters"))]
    #[schema(example = "555-0100", max_length = 32)]
    pub mobile: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            credential: request.credential,
            mobile: request.mobile,
        }
    }
}

/// Partial user update request.
///
/// Omitted fields are left untouched. `mobile: null` clears the mobile
/// number; `name` and `credential` cannot be null.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "alice")]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "new-secret")]
    pub credential: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "555-0100")]
    pub mobile: Patch<String>,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Patch<String>,
    min: u64,
    max: u64,
    nullable: bool,
    message: &'static str,
) {
    match value {
        Patch::Unset => {}
        Patch::Null if nullable => {}
        Patch::Null => errors.add(field, field_error("required", message)),
        Patch::Value(v) => {
            let len = v.chars().count() as u64;
            if len < min || len > max {
                errors.add(field, field_error("length", message));
            }
        }
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_length(
            &mut errors,
            "name",
            &self.name,
            1,
            MAX_NAME_LENGTH,
            false,
            "Name must be 1 to 255 characters",
        );
        check_length(
            &mut errors,
            "credential",
            &self.credential,
            1,
            MAX_CREDENTIAL_LENGTH,
            false,
            "Credential must be 1 to 255 characters",
        );
        check_length(
            &mut errors,
            "mobile",
            &self.mobile,
            0,
            MAX_MOBILE_LENGTH,
            true,
            "Mobile must be at most 32 characters",
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            credential: request.credential,
            mobile: request.mobile,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "alice")]
    pub name: String,
    #[validate(length(min = 1, message = "Credential is required"))]
    #[schema(example = "pw123")]
    pub credential: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/list", get(list_users))
        .route("/login", post(login))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create_user(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users ordered by ID
#[utoipa::path(
    get,
    path = "/users/list",
    tag = "Users",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users(params.offset(), params.limit())
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?.ok_or_not_found()?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(id, payload.into())
        .await?
        .ok_or_not_found()?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    if !state.user_service.delete_user(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(NoContent)
}

/// Check a name and credential
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials match", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .authenticate(&payload.name, &payload.credential)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    Ok(Json(UserResponse::from(user)))
}
