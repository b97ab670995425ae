//! PostgreSQL-backed `UserStore` implementation using Diesel ORM.
//!
//! This adapter implements the domain's [`UserStore`] port, providing
//! durable storage for user records. Email uniqueness is enforced by the
//! database's unique index; a violation surfaces as
//! [`UserStoreError::DuplicateEmail`] so concurrent registrations for the
//! same address resolve to a single winner.

use async_trait::async_trait;
use chrono::Utc;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{NewUser, ProfileChanges, UserStore, UserStoreError};
use crate::domain::{ContactHandle, EmailAddress, FullName, PasswordHashString, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserStore`] port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain credential store errors.
fn map_pool_error(error: PoolError) -> UserStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain credential store errors.
fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::NotFound => UserStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        _ => UserStoreError::query("database error"),
    }
}

/// Convert a database row to a domain [`User`].
///
/// Stored values were validated on the way in, so a parse failure here means
/// the row was modified outside the application; report it as a query error
/// rather than panicking.
fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserStoreError::query(format!("stored email invalid: {err}")))?;
    let full_name = FullName::new(&row.full_name)
        .map_err(|err| UserStoreError::query(format!("stored full name invalid: {err}")))?;
    let contact_handle = row
        .contact_handle
        .as_deref()
        .map(ContactHandle::new)
        .transpose()
        .map_err(|err| UserStoreError::query(format!("stored contact handle invalid: {err}")))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        full_name,
        contact_handle,
        PasswordHashString::new(row.password_hash),
    ))
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *new_user.id.as_uuid(),
            email: new_user.email.as_ref(),
            full_name: new_user.full_name.as_ref(),
            password_hash: new_user.password_hash.as_str(),
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(inserted)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let current: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(current) = current else {
            return Ok(None);
        };

        let full_name = changes
            .full_name
            .map_or(current.full_name, |name| name.as_ref().to_owned());
        let contact_handle = changes
            .contact_handle
            .map(|handle| handle.as_ref().to_owned())
            .or(current.contact_handle);

        let updated: UserRow = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::full_name.eq(full_name),
                users::contact_handle.eq(contact_handle),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(updated).map(Some)
    }
}
