//! Auth endpoints: register, login, logout and the current-user probe.
//!
//! Handlers own the cookie side effects; the session service only issues and
//! revokes tokens. Both success paths (register and login) set the same pair
//! of http-only cookies.

use std::sync::LazyLock;

use actix_web::{web, HttpRequest, HttpResponse};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{
    access_cookie, clear_cookie, refresh_cookie, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::auth::session::AuthTokens;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::app_state::AppState;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            ErrorCode::WeakPassword,
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

fn session_response(
    mut builder: actix_web::HttpResponseBuilder,
    tokens: AuthTokens,
    app_state: &AppState,
) -> HttpResponse {
    builder
        .cookie(access_cookie(tokens.access_token, &app_state.security))
        .cookie(refresh_cookie(tokens.refresh_token, &app_state.security))
        .json(SessionResponse {
            user: UserResponse {
                id: tokens.claims.sub,
                email: tokens.claims.email,
            },
        })
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Name cannot be empty",
        ));
    }
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let tokens = app_state
        .sessions
        .register(name, &req.email, &req.password)
        .await?;

    Ok(session_response(HttpResponse::Created(), tokens, &app_state))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();

    if req.email.trim().is_empty() || req.password.is_empty() {
        // Same shape as a failed credential check; the error never says
        // which field was the problem.
        return Err(AppError::invalid_credentials());
    }

    let tokens = app_state.sessions.login(&req.email, &req.password).await?;

    Ok(session_response(HttpResponse::Ok(), tokens, &app_state))
}

/// Logout always succeeds, with or without a live session, and always clears
/// both cookies.
async fn logout(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());
    app_state.sessions.logout(refresh_token.as_deref()).await?;

    Ok(HttpResponse::Ok()
        .cookie(clear_cookie(ACCESS_COOKIE, &app_state.security))
        .cookie(clear_cookie(REFRESH_COOKIE, &app_state.security))
        .json(serde_json::json!({ "message": "Logged out" })))
}

async fn me(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut builder = HttpResponse::Ok();
    if let Some(token) = &user.refreshed_access_token {
        builder.cookie(access_cookie(token.clone(), &app_state.security));
    }

    Ok(builder.json(SessionResponse {
        user: UserResponse {
            id: user.user_id.to_string(),
            email: user.email,
        },
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me));
}
