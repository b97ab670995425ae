//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed domain entities and the credential/token
//! use-cases behind them, keeping every type transport agnostic. Inbound and
//! outbound adapters depend on this module, never the other way round.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic error payload.
//! - [`User`] and its validated component types.
//! - [`LoginCredentials`] / [`Registration`] — request-scoped credentials.
//! - [`PasswordService`] — salted one-way hashing.
//! - [`TokenCodec`] — bearer token issuance and verification.
//! - [`AuthService`] — registration/login orchestration.
//! - [`ports`] — the hexagon's edges.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod token;
pub mod user;

pub use self::auth::{AuthValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PasswordError, PasswordService};
pub use self::token::{
    IssuedToken, SigningSecret, TokenClaims, TokenCodec, TokenError, TokenTtl,
};
pub use self::user::{
    ContactHandle, EmailAddress, FullName, PasswordHashString, User, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use parley::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # let _ = handler();
/// ```
pub type ApiResult<T> = Result<T, Error>;
