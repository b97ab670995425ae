//! Driving port for registration and login use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! register users and authenticate credentials without knowing (or
//! importing) the backing infrastructure. This makes HTTP handler tests
//! deterministic because they can substitute a test double instead of wiring
//! persistence and real hashing.

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::error::Error;
use crate::domain::token::IssuedToken;
use crate::domain::user::User;

/// Domain use-case port for registration and authentication.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create a new user from a validated registration.
    ///
    /// Does not establish a session; the client logs in explicitly
    /// afterwards.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Validate credentials and mint a bearer token on success.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;
}
