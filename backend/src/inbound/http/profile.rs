//! Authenticated profile HTTP handlers.
//!
//! ```text
//! GET /api/users/me
//! PATCH /api/profile {"contactHandle":"@handle"}
//! ```
//!
//! Both endpoints require a bearer token; the [`AuthContext`] extractor
//! rejects the request before these handlers run otherwise.

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{ProfileChanges, UserStoreError};
use crate::domain::{ContactHandle, Error, FullName, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::UserResponse;
use crate::inbound::http::bearer::AuthContext;
use crate::inbound::http::state::HttpState;

/// Partial profile update body; absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    /// Replacement full name, when present.
    pub full_name: Option<String>,
    /// Replacement contact handle, when present.
    pub contact_handle: Option<String>,
}

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
        UserStoreError::DuplicateEmail => Error::conflict("email address is already registered"),
    }
}

fn subject_gone() -> Error {
    Error::not_found("user no longer exists")
}

fn invalid_field(field: &'static str, err: &UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

fn parse_profile_patch(payload: ProfilePatch) -> Result<ProfileChanges, Error> {
    let full_name = payload
        .full_name
        .as_deref()
        .map(FullName::new)
        .transpose()
        .map_err(|err| invalid_field("fullName", &err))?;
    let contact_handle = payload
        .contact_handle
        .as_deref()
        .map(ContactHandle::new)
        .transpose()
        .map_err(|err| invalid_field("contactHandle", &err))?;

    let changes = ProfileChanges {
        full_name,
        contact_handle,
    };
    if changes.is_empty() {
        return Err(Error::invalid_request(
            "at least one profile field must be provided",
        )
        .with_details(json!({ "code": "empty_update" })));
    }
    Ok(changes)
}

/// Return the authenticated caller's own record.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Subject no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(auth.user_id())
        .await
        .map_err(map_store_error)?
        .ok_or_else(subject_gone)?;
    Ok(web::Json(user.into()))
}

/// Apply a partial update to the authenticated caller's profile.
#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Subject no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<ProfilePatch>,
) -> ApiResult<web::Json<UserResponse>> {
    let changes = parse_profile_patch(payload.into_inner())?;
    let user = state
        .users
        .update_profile(auth.user_id(), changes)
        .await
        .map_err(map_store_error)?
        .ok_or_else(subject_gone)?;
    Ok(web::Json(user.into()))
}
