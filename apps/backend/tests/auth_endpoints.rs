//! HTTP-level auth flow: cookie side effects, problem-document shapes and
//! the silent-refresh contract, all over in-memory stores.

mod common;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::Cookie;
use actix_web::{test, web, App};
use backend::routes;
use backend::state::security_config::SecurityConfig;
use backend::test_support::{memory_state, seed_user};
use common::{set_cookie_max_age, set_cookie_value};
use serde_json::json;

#[actix_web::test]
async fn register_sets_both_auth_cookies() {
    let (state, _users, _refresh_tokens) = memory_state(SecurityConfig::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "correct horse battery"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 201);
    let access = set_cookie_value(&resp, "access_token").expect("access cookie set");
    let refresh = set_cookie_value(&resp, "refresh_token").expect("refresh cookie set");
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_eq!(
        set_cookie_max_age(&resp, "access_token"),
        Some(CookieDuration::seconds(900))
    );
    assert_eq!(
        set_cookie_max_age(&resp, "refresh_token"),
        Some(CookieDuration::seconds(604_800))
    );

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[actix_web::test]
async fn register_validation_failures() {
    let (state, _users, _refresh_tokens) = memory_state(SecurityConfig::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "correct horse battery"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_EMAIL");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "WEAK_PASSWORD");
}

#[actix_web::test]
async fn login_failure_shape_hides_which_precondition_failed() {
    let (state, users, _refresh_tokens) = memory_state(SecurityConfig::default());
    seed_user(&users, "Ada", "ada@example.com", "correct horse battery");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let unknown = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "whatever password" }))
        .to_request();
    let unknown_resp = test::call_service(&app, unknown).await;
    assert_eq!(unknown_resp.status().as_u16(), 401);
    let unknown_body: serde_json::Value = test::read_body_json(unknown_resp).await;

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong password" }))
        .to_request();
    let wrong_resp = test::call_service(&app, wrong).await;
    assert_eq!(wrong_resp.status().as_u16(), 401);
    let wrong_body: serde_json::Value = test::read_body_json(wrong_resp).await;

    assert_eq!(unknown_body["code"], "INVALID_CREDENTIALS");
    assert_eq!(unknown_body["code"], wrong_body["code"]);
    assert_eq!(unknown_body["detail"], wrong_body["detail"]);
    assert_eq!(unknown_body["detail"], "Invalid email or password");
}

#[actix_web::test]
async fn me_resolves_with_access_cookie_and_rejects_without() {
    let (state, users, _refresh_tokens) = memory_state(SecurityConfig::default());
    seed_user(&users, "Ada", "ada@example.com", "correct horse battery");
    let sessions = state.sessions.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let tokens = sessions
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new("access_token", tokens.access_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    // Fast path sets no replacement cookie
    assert!(set_cookie_value(&resp, "access_token").is_none());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "ada@example.com");

    let bare = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, bare).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn me_with_only_refresh_cookie_sets_replacement_access_cookie() {
    let (state, users, _refresh_tokens) = memory_state(SecurityConfig::default());
    seed_user(&users, "Ada", "ada@example.com", "correct horse battery");
    let sessions = state.sessions.clone();
    let security = state.security.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let tokens = sessions
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new("refresh_token", tokens.refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let replacement = set_cookie_value(&resp, "access_token")
        .expect("silent refresh must set a replacement access cookie");
    assert!(backend::verify_access_token(&replacement, &security).is_some());

    // The refresh cookie itself is not rotated.
    assert!(set_cookie_value(&resp, "refresh_token").is_none());
}

#[actix_web::test]
async fn logout_clears_cookies_and_ends_the_session() {
    let (state, users, _refresh_tokens) = memory_state(SecurityConfig::default());
    seed_user(&users, "Ada", "ada@example.com", "correct horse battery");
    let sessions = state.sessions.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let tokens = sessions
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(Cookie::new("refresh_token", tokens.refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        set_cookie_max_age(&resp, "access_token"),
        Some(CookieDuration::ZERO)
    );
    assert_eq!(
        set_cookie_max_age(&resp, "refresh_token"),
        Some(CookieDuration::ZERO)
    );

    // The revoked refresh token no longer authenticates /me.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new("refresh_token", tokens.refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // Logout without any session is still a success.
    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn error_responses_carry_problem_document_fields() {
    let (state, _users, _refresh_tokens) = memory_state(SecurityConfig::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "whatever password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        resp.headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
    let body: serde_json::Value = test::read_body_json(resp).await;
    for field in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(body.get(field).is_some(), "missing field {field}");
    }
}
