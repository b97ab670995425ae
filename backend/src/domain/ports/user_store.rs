//! Port abstraction for the credential store and its errors.

use async_trait::async_trait;

use crate::domain::user::{
    ContactHandle, EmailAddress, FullName, PasswordHashString, User, UserId,
};

/// Persistence errors raised by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Store connection could not be established.
    #[error("credential store connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("credential store query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// The email address is already registered.
    ///
    /// Concurrent registrations for the same address race on the store's
    /// unique index; the loser receives this variant rather than a generic
    /// query failure.
    #[error("email address is already registered")]
    DuplicateEmail,
}

impl UserStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A user record ready for insertion: identity plus hashed credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identifier assigned by the authenticator.
    pub id: UserId,
    /// Normalised unique email address.
    pub email: EmailAddress,
    /// Full name supplied at registration.
    pub full_name: FullName,
    /// Salted one-way password hash; never plaintext.
    pub password_hash: PasswordHashString,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// Replacement full name, when present.
    pub full_name: Option<FullName>,
    /// Replacement contact handle, when present.
    pub contact_handle: Option<ContactHandle>,
}

impl ProfileChanges {
    /// True when the update carries no recognised field.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.contact_handle.is_none()
    }
}

/// Driven port for durable user persistence.
///
/// Adapters enforce email uniqueness themselves (e.g. via a unique index) so
/// concurrent `insert` calls for one address resolve to a single winner.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user record.
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Apply a partial profile update, returning the updated record.
    ///
    /// Returns `Ok(None)` when no user with `id` exists.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserStoreError>;
}
