//! Server construction and wiring.
//!
//! Selects the credential store implementation from configuration (PostgreSQL
//! when `DATABASE_URL` is set, in-memory otherwise), assembles the HTTP
//! state, and runs the Actix server.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use parley::Trace;
#[cfg(debug_assertions)]
use parley::doc::ApiDoc;
use parley::domain::ports::UserStore;
use parley::domain::{AuthService, PasswordService, TokenCodec};
use parley::inbound::http::auth::{login, register};
use parley::inbound::http::health::{HealthState, live, ready};
use parley::inbound::http::profile::{current_user, update_profile};
use parley::inbound::http::state::HttpState;
use parley::outbound::persistence::{DbPool, DieselUserStore, InMemoryUserStore, PoolConfig};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

/// Build the credential store based on configuration.
///
/// Uses the PostgreSQL-backed implementation when a database URL is
/// available, otherwise falls back to the in-memory store so development
/// processes run without infrastructure.
async fn build_user_store(config: &AppConfig) -> std::io::Result<Arc<dyn UserStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url.clone()))
                .await
                .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
            info!("credential store: PostgreSQL");
            Ok(Arc::new(DieselUserStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory credential store (dev only)");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Run the HTTP server until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let codec = TokenCodec::new(&config.token_secret, config.token_ttl);
    info!(
        secret_fingerprint = %config.token_secret.fingerprint(),
        ttl_secs = config.token_ttl.as_duration().num_seconds(),
        "token codec configured"
    );

    let store = build_user_store(&config).await?;
    let auth = Arc::new(AuthService::new(
        store.clone(),
        PasswordService::default(),
        codec.clone(),
    ));
    let state = web::Data::new(HttpState::new(auth, store, codec));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(server_health_state.clone())
            .app_data(state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(register)
                    .service(login)
                    .service(current_user)
                    .service(update_profile),
            )
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));
        }

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "listening");
    server.run().await
}
