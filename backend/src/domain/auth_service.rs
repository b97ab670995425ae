//! Registration and login orchestration over the credential store.
//!
//! `AuthService` is the concrete [`Authenticator`] implementation: it hashes
//! registration passwords, converts store failures into transport-agnostic
//! domain errors, checks submitted credentials, and mints bearer tokens.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::auth::{LoginCredentials, Registration};
use super::error::Error;
use super::password::{PasswordError, PasswordService};
use super::ports::{Authenticator, NewUser, UserStore, UserStoreError};
use super::token::{IssuedToken, TokenCodec, TokenError};
use super::user::{User, UserId};

/// Uniform message for every failed credential check.
///
/// Lookups that find no user and lookups that find a user with a different
/// password produce byte-identical errors, so responses never disclose
/// whether an email address is registered.
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Concrete authenticator over a credential store, a password service, and a
/// token codec.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
    codec: TokenCodec,
}

impl AuthService {
    /// Build an authenticator from its collaborators.
    pub fn new(store: Arc<dyn UserStore>, passwords: PasswordService, codec: TokenCodec) -> Self {
        Self {
            store,
            passwords,
            codec,
        }
    }
}

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
        UserStoreError::DuplicateEmail => Error::conflict("email address is already registered"),
    }
}

fn map_password_error(error: &PasswordError) -> Error {
    Error::internal(error.to_string())
}

fn map_signing_error(error: &TokenError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

#[async_trait]
impl Authenticator for AuthService {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .passwords
            .hash(registration.password())
            .map_err(|err| map_password_error(&err))?;

        let new_user = NewUser {
            id: UserId::random(),
            email: registration.email().clone(),
            full_name: registration.full_name().clone(),
            password_hash,
        };

        let user = self
            .store
            .insert(new_user)
            .await
            .map_err(map_store_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let maybe_user = self
            .store
            .find_by_email(credentials.email())
            .await
            .map_err(map_store_error)?;

        let Some(user) = maybe_user else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .passwords
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| {
                warn!(user_id = %user.id(), error = %err, "stored password hash unusable");
                map_password_error(&err)
            })?;
        if !matches {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .codec
            .issue(user.id())
            .map_err(|err| map_signing_error(&err))?;
        info!(user_id = %user.id(), expires_at = %issued.expires_at(), "login succeeded");
        Ok(issued)
    }
}

#[cfg(test)]
mod tests;
