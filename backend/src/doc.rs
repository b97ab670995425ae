//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: all HTTP endpoints from the inbound layer (auth, profile,
//!   health)
//! - **Schemas**: request/response payloads and the shared error envelope
//! - **Security**: the bearer token scheme issued by `POST /api/auth/login`
//!
//! The generated specification is served as JSON in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Bearer token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Parley auth API",
        description = "HTTP interface for registration, token-authenticated access, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::profile::current_user,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::inbound::http::auth::RegisterRequest,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::auth::UserResponse,
        crate::inbound::http::auth::AuthResponse,
        crate::inbound::http::profile::ProfilePatch,
    ))
)]
pub struct ApiDoc;
