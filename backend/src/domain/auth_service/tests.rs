//! Regression coverage for registration and login orchestration.

use std::sync::Mutex;

use rstest::rstest;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ports::ProfileChanges;
use crate::domain::token::{SigningSecret, TokenTtl};
use crate::domain::user::EmailAddress;

#[derive(Clone, Copy)]
enum StubFailure {
    Connection,
    Query,
}

impl StubFailure {
    fn to_error(self) -> UserStoreError {
        match self {
            Self::Connection => UserStoreError::connection("database unavailable"),
            Self::Query => UserStoreError::query("database query failed"),
        }
    }
}

#[derive(Default)]
struct StubState {
    stored_user: Option<User>,
    insert_failure: Option<StubFailure>,
    find_failure: Option<StubFailure>,
    reject_duplicates: bool,
}

#[derive(Default)]
struct StubUserStore {
    state: Mutex<StubState>,
}

impl StubUserStore {
    fn with_user(user: User) -> Self {
        Self {
            state: Mutex::new(StubState {
                stored_user: Some(user),
                ..StubState::default()
            }),
        }
    }

    fn rejecting_duplicates() -> Self {
        Self {
            state: Mutex::new(StubState {
                reject_duplicates: true,
                ..StubState::default()
            }),
        }
    }

    fn set_insert_failure(&self, failure: StubFailure) {
        self.state.lock().expect("state lock").insert_failure = Some(failure);
    }

    fn set_find_failure(&self, failure: StubFailure) {
        self.state.lock().expect("state lock").find_failure = Some(failure);
    }

    fn stored_user(&self) -> Option<User> {
        self.state.lock().expect("state lock").stored_user.clone()
    }
}

#[async_trait]
impl UserStore for StubUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(failure) = state.insert_failure {
            return Err(failure.to_error());
        }
        if state.reject_duplicates
            && state
                .stored_user
                .as_ref()
                .is_some_and(|user| user.email() == &new_user.email)
        {
            return Err(UserStoreError::DuplicateEmail);
        }
        let user = User::new(
            new_user.id,
            new_user.email,
            new_user.full_name,
            None,
            new_user.password_hash,
        );
        state.stored_user = Some(user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserStoreError> {
        let state = self.state.lock().expect("state lock");
        if let Some(failure) = state.find_failure {
            return Err(failure.to_error());
        }
        Ok(state
            .stored_user
            .as_ref()
            .filter(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .stored_user
            .as_ref()
            .filter(|user| user.id() == id)
            .cloned())
    }

    async fn update_profile(
        &self,
        _id: &UserId,
        _changes: ProfileChanges,
    ) -> Result<Option<User>, UserStoreError> {
        Ok(None)
    }
}

fn service(store: Arc<StubUserStore>) -> AuthService {
    let codec = TokenCodec::new(
        &SigningSecret::from_bytes(*b"test-signing-secret-0123456789ab"),
        TokenTtl::default(),
    );
    AuthService::new(store, PasswordService::default(), codec)
}

fn registration() -> Registration {
    Registration::try_from_parts("A B", "a@b.com", "secret123").expect("valid registration")
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("valid test credentials")
}

#[tokio::test]
async fn register_stores_a_salted_hash_never_the_password() {
    let store = Arc::new(StubUserStore::default());
    let service = service(store.clone());

    let user = service
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(user.email().as_ref(), "a@b.com");
    let stored = store.stored_user().expect("user stored");
    assert_ne!(stored.password_hash().as_str(), "secret123");
    assert!(stored.password_hash().as_str().starts_with("$argon2"));
}

#[tokio::test]
async fn register_then_login_round_trips_the_identity() {
    let store = Arc::new(StubUserStore::default());
    let service = service(store.clone());

    let user = service
        .register(registration())
        .await
        .expect("registration succeeds");

    let issued = service
        .login(&credentials("a@b.com", "secret123"))
        .await
        .expect("login succeeds");
    assert_eq!(issued.user_id(), user.id());
}

#[tokio::test]
async fn login_normalises_the_email_before_lookup() {
    let store = Arc::new(StubUserStore::default());
    let service = service(store);

    service
        .register(registration())
        .await
        .expect("registration succeeds");

    let issued = service
        .login(&credentials("  A@B.COM ", "secret123"))
        .await
        .expect("case-insensitive login succeeds");
    assert!(!issued.access_token().is_empty());
}

#[tokio::test]
async fn duplicate_registrations_map_to_conflict() {
    let store = Arc::new(StubUserStore::rejecting_duplicates());
    let service = service(store);

    service
        .register(registration())
        .await
        .expect("first registration succeeds");
    let err = service
        .register(registration())
        .await
        .expect_err("second registration must fail");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let store = Arc::new(StubUserStore::default());
    let service = service(store);

    service
        .register(registration())
        .await
        .expect("registration succeeds");

    let wrong_password = service
        .login(&credentials("a@b.com", "wrong-password"))
        .await
        .expect_err("wrong password must fail");
    let unknown_email = service
        .login(&credentials("nobody@b.com", "secret123"))
        .await
        .expect_err("unknown email must fail");

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.message(), "invalid credentials");
}

#[rstest]
#[case(StubFailure::Connection, ErrorCode::ServiceUnavailable)]
#[case(StubFailure::Query, ErrorCode::InternalError)]
#[tokio::test]
async fn login_maps_store_failures(
    #[case] failure: StubFailure,
    #[case] expected_code: ErrorCode,
) {
    let store = Arc::new(StubUserStore::default());
    store.set_find_failure(failure);
    let service = service(store);

    let err = service
        .login(&credentials("a@b.com", "secret123"))
        .await
        .expect_err("store failures surface as domain errors");
    assert_eq!(err.code(), expected_code);
}

#[rstest]
#[case(StubFailure::Connection, ErrorCode::ServiceUnavailable)]
#[case(StubFailure::Query, ErrorCode::InternalError)]
#[tokio::test]
async fn register_maps_store_failures(
    #[case] failure: StubFailure,
    #[case] expected_code: ErrorCode,
) {
    let store = Arc::new(StubUserStore::default());
    store.set_insert_failure(failure);
    let service = service(store);

    let err = service
        .register(registration())
        .await
        .expect_err("store failures surface as domain errors");
    assert_eq!(err.code(), expected_code);
}
