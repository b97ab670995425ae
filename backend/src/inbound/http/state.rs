//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenCodec;
use crate::domain::ports::{Authenticator, UserStore};

/// Dependency bundle for HTTP handlers.
///
/// The token codec is held here rather than behind a port: verification is a
/// pure function of the codec's secret and the current time, so handlers and
/// the bearer extractor share one value instead of a trait object.
#[derive(Clone)]
pub struct HttpState {
    /// Registration/login use-cases.
    pub auth: Arc<dyn Authenticator>,
    /// Credential store for profile reads and updates.
    pub users: Arc<dyn UserStore>,
    /// Token issuance and verification.
    pub codec: TokenCodec,
}

impl HttpState {
    /// Construct state from its collaborators.
    pub fn new(auth: Arc<dyn Authenticator>, users: Arc<dyn UserStore>, codec: TokenCodec) -> Self {
        Self { auth, users, codec }
    }
}
