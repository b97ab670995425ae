//! Registration and login HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"fullName":"A B","email":"a@b.com","password":"secret123"}
//! POST /api/auth/login {"email":"a@b.com","password":"secret123"}
//! ```
//!
//! Registration never establishes a session; clients call login explicitly
//! afterwards, mirroring the two-step flow the frontend performs.

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthValidationError, Error, IssuedToken, LoginCredentials, Registration, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Full name as typed on the form.
    pub full_name: String,
    /// Email address to register; stored lower-cased.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered email address.
    pub email: String,
    /// Plaintext password to check.
    pub password: String,
}

/// Public projection of a user record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable user identifier.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Lower-cased email address.
    pub email: String,
    /// Optional contact handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_handle: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            full_name: value.full_name().to_string(),
            email: value.email().to_string(),
            contact_handle: value.contact_handle().map(ToString::to_string),
        }
    }
}

/// Successful login payload: the bearer token and its expiry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Encoded bearer token for the `Authorization` header.
    pub access_token: String,
    /// Instant the token stops being valid (RFC 3339).
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthResponse {
    fn from(value: IssuedToken) -> Self {
        Self {
            access_token: value.access_token().to_owned(),
            expires_at: value.expires_at(),
        }
    }
}

fn field_and_code(err: &AuthValidationError) -> (&'static str, &'static str) {
    match err {
        AuthValidationError::Email(UserValidationError::EmptyEmail) => ("email", "empty_email"),
        AuthValidationError::Email(_) => ("email", "invalid_email"),
        AuthValidationError::FullName(UserValidationError::EmptyFullName) => {
            ("fullName", "empty_full_name")
        }
        AuthValidationError::FullName(_) => ("fullName", "invalid_full_name"),
        AuthValidationError::EmptyPassword => ("password", "empty_password"),
        AuthValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    }
}

fn map_auth_validation_error(err: &AuthValidationError) -> Error {
    let (field, code) = field_and_code(err);
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new user.
///
/// Uses the centralised `Error` type so clients get a consistent error
/// schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration =
        Registration::try_from_parts(&payload.full_name, &payload.email, &payload.password)
            .map_err(|err| map_auth_validation_error(&err))?;
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate credentials and mint a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| map_auth_validation_error(&err))?;
    let issued = state.auth.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(issued)))
}
