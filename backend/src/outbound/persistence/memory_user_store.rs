//! In-memory `UserStore` adapter.
//!
//! Backs development processes started without a database and keeps handler
//! tests free of I/O. The whole map sits behind one mutex, so the uniqueness
//! check and the insert are a single atomic step: concurrent registrations
//! for the same address resolve to one winner exactly like the database's
//! unique index.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{NewUser, ProfileChanges, UserStore, UserStoreError};
use crate::domain::{EmailAddress, User, UserId};

/// Mutex-guarded map of users keyed by normalised email address.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<EmailAddress, User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<EmailAddress, User>>, UserStoreError>
    {
        self.users
            .lock()
            .map_err(|_| UserStoreError::query("user map poisoned"))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.lock()?;
        if users.contains_key(&new_user.email) {
            return Err(UserStoreError::DuplicateEmail);
        }

        let user = User::new(
            new_user.id,
            new_user.email.clone(),
            new_user.full_name,
            None,
            new_user.password_hash,
        );
        users.insert(new_user.email, user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserStoreError> {
        Ok(self.lock()?.get(email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserStoreError> {
        let mut users = self.lock()?;
        let Some(current) = users.values().find(|user| user.id() == id).cloned() else {
            return Ok(None);
        };

        let full_name = changes
            .full_name
            .unwrap_or_else(|| current.full_name().clone());
        let contact_handle = changes
            .contact_handle
            .or_else(|| current.contact_handle().cloned());

        let updated = User::new(
            current.id().clone(),
            current.email().clone(),
            full_name,
            contact_handle,
            current.password_hash().clone(),
        );
        users.insert(updated.email().clone(), updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::{ContactHandle, FullName, PasswordHashString};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("valid email"),
            full_name: FullName::new("A B").expect("valid name"),
            password_hash: PasswordHashString::new("$argon2id$v=19$stub"),
        }
    }

    #[tokio::test]
    async fn inserted_users_are_found_by_email_and_id() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("a@b.com")).await.expect("insert");

        let by_email = store
            .find_by_email(user.email())
            .await
            .expect("lookup runs")
            .expect("user present");
        assert_eq!(by_email.id(), user.id());

        let by_id = store
            .find_by_id(user.id())
            .await
            .expect("lookup runs")
            .expect("user present");
        assert_eq!(by_id.email(), user.email());
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("a@b.com")).await.expect("insert");

        let err = store
            .insert(new_user("a@b.com"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err, UserStoreError::DuplicateEmail);
    }

    #[tokio::test]
    async fn concurrent_registrations_have_exactly_one_winner() {
        let store = Arc::new(InMemoryUserStore::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(new_user("race@b.com")).await })
            })
            .collect();

        let mut winners = 0;
        let mut duplicates = 0;
        for task in tasks {
            match task.await.expect("task completes") {
                Ok(_) => winners += 1,
                Err(UserStoreError::DuplicateEmail) => duplicates += 1,
                Err(other) => panic!("unexpected store error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(duplicates, 7);
    }

    #[tokio::test]
    async fn update_profile_merges_partial_changes() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("a@b.com")).await.expect("insert");

        let updated = store
            .update_profile(
                user.id(),
                ProfileChanges {
                    full_name: None,
                    contact_handle: Some(ContactHandle::new("@handle").expect("valid handle")),
                },
            )
            .await
            .expect("update runs")
            .expect("user present");

        assert_eq!(updated.full_name().as_ref(), "A B");
        assert_eq!(
            updated.contact_handle().map(AsRef::as_ref),
            Some("@handle")
        );

        // Untouched fields survive a second partial update.
        let renamed = store
            .update_profile(
                user.id(),
                ProfileChanges {
                    full_name: Some(FullName::new("B C").expect("valid name")),
                    contact_handle: None,
                },
            )
            .await
            .expect("update runs")
            .expect("user present");
        assert_eq!(renamed.full_name().as_ref(), "B C");
        assert_eq!(
            renamed.contact_handle().map(AsRef::as_ref),
            Some("@handle")
        );
    }

    #[tokio::test]
    async fn update_profile_reports_missing_users() {
        let store = InMemoryUserStore::new();
        let result = store
            .update_profile(&UserId::random(), ProfileChanges::default())
            .await
            .expect("update runs");
        assert!(result.is_none());
    }
}
