//! Environment-driven application configuration.
//!
//! All knobs come from the process environment so deployments configure the
//! binary without a config file:
//!
//! - `BIND_ADDR`: listen address, default `0.0.0.0:8080`.
//! - `DATABASE_URL`: PostgreSQL URL; when unset an in-memory credential
//!   store backs the process (dev only).
//! - `TOKEN_SECRET_FILE`: path to the signing secret, default
//!   `/var/run/secrets/token_key`.
//! - `TOKEN_ALLOW_EPHEMERAL`: set to `1` to tolerate a missing secret file
//!   by generating an ephemeral secret outside debug builds.
//! - `TOKEN_TTL_SECS`: token lifetime, default 3600.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

use parley::domain::{SigningSecret, TokenTtl};

/// Resolved application configuration.
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL, when persistence is configured.
    pub database_url: Option<String>,
    /// Process-wide token signing secret.
    pub token_secret: SigningSecret,
    /// Fixed lifetime applied to every issued token.
    pub token_ttl: TokenTtl,
}

impl AppConfig {
    /// Assemble configuration from the process environment.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse::<SocketAddr>()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url = env::var("DATABASE_URL").ok();
        let token_secret = load_token_secret()?;
        let token_ttl = load_token_ttl()?;

        Ok(Self {
            bind_addr,
            database_url,
            token_secret,
            token_ttl,
        })
    }
}

fn load_token_secret() -> std::io::Result<SigningSecret> {
    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_key".into());
    match std::fs::read(&secret_path) {
        Ok(bytes) => Ok(SigningSecret::from_bytes(bytes)),
        Err(err) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(
                    path = %secret_path,
                    error = %err,
                    "using ephemeral token secret (dev only); issued tokens die with this process"
                );
                Ok(SigningSecret::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {err}"
                )))
            }
        }
    }
}

fn load_token_ttl() -> std::io::Result<TokenTtl> {
    match env::var("TOKEN_TTL_SECS") {
        Err(_) => Ok(TokenTtl::default()),
        Ok(raw) => {
            let secs = raw
                .parse::<i64>()
                .map_err(|err| std::io::Error::other(format!("invalid TOKEN_TTL_SECS: {err}")))?;
            TokenTtl::from_secs(secs)
                .map_err(|err| std::io::Error::other(format!("invalid TOKEN_TTL_SECS: {err}")))
        }
    }
}
