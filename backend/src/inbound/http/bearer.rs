//! Bearer token extraction to keep HTTP handlers free of framework logic.
//!
//! [`AuthContext`] is the request validation gate: it reads the
//! `Authorization` header, verifies the token through the shared codec, and
//! hands the resolved subject identity to the handler as an explicit
//! argument. Requests failing verification are rejected before any handler
//! logic runs. Every request is authorised independently; there is no
//! server-side session state and no revocation list.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, warn};

use crate::domain::{Error, TokenClaims, TokenError, UserId};
use crate::inbound::http::state::HttpState;

/// Client-facing message when no usable `Authorization` header is present.
const MISSING_TOKEN: &str = "authentication required";
/// Client-facing message for every verification failure. Invalid and expired
/// tokens are distinguished in logs only.
const REJECTED_TOKEN: &str = "invalid or expired token";

/// Verified caller identity extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: TokenClaims,
}

impl AuthContext {
    /// Subject user id resolved from the token.
    pub fn user_id(&self) -> &UserId {
        self.claims.user_id()
    }

    /// Full verified claims.
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;

    let Some(header_value) = req.headers().get(header::AUTHORIZATION) else {
        debug!("request rejected: missing authorization header");
        return Err(Error::unauthorized(MISSING_TOKEN));
    };
    let header_str = header_value.to_str().map_err(|_| {
        debug!("request rejected: authorization header is not ASCII");
        Error::unauthorized(MISSING_TOKEN)
    })?;
    let Some(token) = header_str.strip_prefix("Bearer ") else {
        debug!("request rejected: authorization scheme is not Bearer");
        return Err(Error::unauthorized(MISSING_TOKEN));
    };

    let claims = state.codec.decode(token).map_err(|err| {
        match &err {
            TokenError::Expired => debug!("request rejected: token expired"),
            TokenError::Invalid { message } => {
                warn!(reason = %message, "request rejected: token invalid");
            }
            TokenError::Signing { message } => {
                warn!(reason = %message, "request rejected: unexpected signing failure");
            }
        }
        Error::unauthorized(REJECTED_TOKEN)
    })?;

    Ok(AuthContext { claims })
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
