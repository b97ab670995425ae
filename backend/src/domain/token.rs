//! Signed bearer token issuance and verification.
//!
//! Tokens are compact JWS structures (HS256) carrying the subject user id,
//! issue time, and expiry. The signing secret is process-wide state injected
//! at construction; it is never rotated mid-process and never read from
//! ambient globals. Verification is a pure function of the token string, the
//! secret, and the current time, so every request can be authorised
//! independently without shared mutable state.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::{UserId, UserValidationError};

/// Failures raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token expiry is not in the future.
    #[error("token has expired")]
    Expired,
    /// The token signature, encoding, or claims are invalid.
    #[error("token is invalid: {message}")]
    Invalid {
        /// Underlying failure description; for logs, never for clients.
        message: String,
    },
    /// Signing a fresh token failed.
    #[error("token signing failed: {message}")]
    Signing {
        /// Underlying failure description.
        message: String,
    },
}

impl TokenError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Process-wide secret used to sign and verify tokens.
///
/// The raw bytes are zeroised on drop. Logs may carry the SHA-256
/// fingerprint so operators can confirm which secret a process loaded
/// without the secret itself ever appearing in output.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap secret bytes loaded from configuration.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Generate a random ephemeral secret.
    ///
    /// Tokens signed with an ephemeral secret do not survive a restart, so
    /// this is only suitable for development processes.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    /// Short SHA-256 fingerprint of the secret, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_slice());
        let mut rendered = hex::encode(digest);
        rendered.truncate(16);
        rendered
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret({})", self.fingerprint())
    }
}

/// Errors raised when constructing a [`TokenTtl`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenTtlError {
    /// The lifetime was zero or negative.
    #[error("token lifetime must be positive")]
    NotPositive,
}

/// Fixed lifetime applied to every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtl(Duration);

/// Default token lifetime in seconds.
pub const TOKEN_TTL_DEFAULT_SECS: i64 = 3600;

impl TokenTtl {
    /// Construct a lifetime from whole seconds.
    pub fn from_secs(secs: i64) -> Result<Self, TokenTtlError> {
        if secs <= 0 {
            return Err(TokenTtlError::NotPositive);
        }
        Ok(Self(Duration::seconds(secs)))
    }

    /// Lifetime as a chrono duration.
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self(Duration::seconds(TOKEN_TTL_DEFAULT_SECS))
    }
}

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    user_id: UserId,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Subject user id the token was bound to.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Instant the token was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Instant the token stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// A freshly minted token together with its metadata.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    access_token: String,
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Encoded token string for the `Authorization: Bearer` header.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Subject the token was issued for.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Expiry instant communicated back to the client.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Wire-format claims; seconds since the Unix epoch per RFC 7519.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Encodes and decodes signed bearer tokens.
///
/// # Examples
/// ```
/// use parley::domain::{SigningSecret, TokenCodec, TokenTtl, UserId};
///
/// let codec = TokenCodec::new(&SigningSecret::from_bytes(*b"super-secret-key"), TokenTtl::default());
/// let user = UserId::random();
/// let issued = codec.issue(&user).unwrap();
/// let claims = codec.decode(issued.access_token()).unwrap();
/// assert_eq!(claims.user_id(), &user);
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TokenTtl,
}

impl TokenCodec {
    /// Build a codec for the given secret and lifetime.
    pub fn new(secret: &SigningSecret, ttl: TokenTtl) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> TokenTtl {
        self.ttl
    }

    /// Issue a token for `user_id` valid from now until now plus the
    /// configured lifetime.
    pub fn issue(&self, user_id: &UserId) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token anchored at an explicit issue instant.
    ///
    /// Expiry behaviour becomes a pure function of `issued_at`, which keeps
    /// lifetime handling observable without waiting out real time.
    pub fn issue_at(
        &self,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at + self.ttl.as_duration();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
                .map_err(|err| TokenError::signing(err.to_string()))?;

        Ok(IssuedToken {
            access_token,
            user_id: user_id.clone(),
            expires_at,
        })
    }

    /// Verify a token string and recover its claims.
    ///
    /// Fails with [`TokenError::Expired`] once the current time reaches the
    /// stored expiry, and [`TokenError::Invalid`] for signature, encoding,
    /// or claim-shape failures.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::invalid(err.to_string()),
            })?;

        let claims = data.claims;
        // The library treats exp == now as still valid; the contract here is
        // that expiry must lie strictly in the future.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        let user_id = UserId::new(&claims.sub).map_err(|err: UserValidationError| {
            TokenError::invalid(format!("subject is not a user id: {err}"))
        })?;
        let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenError::invalid("issue time out of range"))?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::invalid("expiry out of range"))?;

        Ok(TokenClaims {
            user_id,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests;
