//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{AuthService, PasswordService, SigningSecret, TokenCodec, TokenTtl};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::InMemoryUserStore;

/// Codec with a fixed secret so tests can mint their own tokens.
pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        &SigningSecret::from_bytes(*b"test-signing-secret-0123456789ab"),
        TokenTtl::default(),
    )
}

/// Build handler state over an in-memory store and the test codec.
pub fn test_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryUserStore::new());
    let codec = test_codec();
    let auth = Arc::new(AuthService::new(
        store.clone(),
        PasswordService::default(),
        codec.clone(),
    ));
    web::Data::new(HttpState::new(auth, store, codec))
}
