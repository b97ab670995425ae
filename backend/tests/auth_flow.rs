//! End-to-end coverage of the registration → login → authenticated-request
//! flow against a fully wired application.

use std::sync::Arc;

use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use parley::Trace;
use parley::domain::{AuthService, PasswordService, SigningSecret, TokenCodec, TokenTtl};
use parley::inbound::http::auth::{login, register};
use parley::inbound::http::health::{HealthState, live, ready};
use parley::inbound::http::profile::{current_user, update_profile};
use parley::inbound::http::state::HttpState;
use parley::outbound::persistence::InMemoryUserStore;

fn app_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryUserStore::new());
    let codec = TokenCodec::new(
        &SigningSecret::from_bytes(*b"integration-test-secret-01234567"),
        TokenTtl::default(),
    );
    let auth = Arc::new(AuthService::new(
        store.clone(),
        PasswordService::default(),
        codec.clone(),
    ));
    web::Data::new(HttpState::new(auth, store, codec))
}

fn full_app(
    state: web::Data<HttpState>,
    health: web::Data<HealthState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(health)
        .wrap(Trace)
        .service(
            web::scope("/api")
                .service(register)
                .service(login)
                .service(current_user)
                .service(update_profile),
        )
        .service(ready)
        .service(live)
}

#[actix_web::test]
async fn register_login_and_authenticated_requests() {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = actix_test::init_service(full_app(app_state(), health)).await;

    // Registration: 201 with the public user projection.
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "fullName": "A B",
                "email": "a@b.com",
                "password": "secret123",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), actix_web::http::StatusCode::CREATED);
    let created_body: Value = actix_test::read_body_json(created).await;
    let user_id = created_body
        .get("id")
        .and_then(Value::as_str)
        .expect("user id present")
        .to_owned();

    // Wrong password: uniform 401.
    let rejected = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@b.com", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    // Correct credentials: 200 with a token.
    let logged_in = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@b.com", "password": "secret123" }))
            .to_request(),
    )
    .await;
    assert_eq!(logged_in.status(), actix_web::http::StatusCode::OK);
    let login_body: Value = actix_test::read_body_json(logged_in).await;
    let token = login_body
        .get("accessToken")
        .and_then(Value::as_str)
        .expect("token present")
        .to_owned();

    // The token authenticates follow-up requests as the registered user.
    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), actix_web::http::StatusCode::OK);
    let me_body: Value = actix_test::read_body_json(me).await;
    assert_eq!(
        me_body.get("id").and_then(Value::as_str),
        Some(user_id.as_str())
    );

    // Profile patch mirrors the frontend's post-login contact update.
    let patched = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/profile")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "contactHandle": "@ab" }))
            .to_request(),
    )
    .await;
    assert_eq!(patched.status(), actix_web::http::StatusCode::OK);
    let patched_body: Value = actix_test::read_body_json(patched).await;
    assert_eq!(
        patched_body.get("contactHandle").and_then(Value::as_str),
        Some("@ab")
    );

    // Registration and session establishment are separate transactions: a
    // second registration with the same address conflicts even though the
    // caller holds a valid token.
    let duplicate = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "fullName": "A B",
                "email": "a@b.com",
                "password": "secret123",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), actix_web::http::StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unauthenticated_requests_never_reach_protected_handlers() {
    let health = web::Data::new(HealthState::new());
    let app = actix_test::init_service(full_app(app_state(), health)).await;

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/me").to_request(),
    )
    .await;
    assert_eq!(me.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(me).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("unauthorized"));
}

#[actix_web::test]
async fn health_probes_do_not_require_authentication() {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = actix_test::init_service(full_app(app_state(), health)).await;

    for path in ["/health/live", "/health/ready"] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(path).to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK, "{path}");
    }
}

#[actix_web::test]
async fn responses_carry_a_trace_id_header() {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = actix_test::init_service(full_app(app_state(), health)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert!(response.headers().contains_key("trace-id"));
}
