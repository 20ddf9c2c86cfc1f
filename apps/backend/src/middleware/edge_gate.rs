//! Pre-routing gate for page navigation.
//!
//! Classifies a request path as public, auth-only or protected and answers
//! redirects before any route handler runs. The check is access-token-only
//! by design: no store access, no silent refresh, no side effects. A request
//! carrying only a valid refresh token is unauthenticated here and gets its
//! new access token from an API call that goes through session resolution.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::cookies::ACCESS_COOKIE;
use crate::auth::jwt::verify_access_token;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Pages that redirect authenticated users to the workspace.
const AUTH_PATHS: &[&str] = &["/login", "/register"];
/// Pages reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/", "/login", "/register"];
/// Where authenticated users land.
const WORKSPACE_PATH: &str = "/dashboard";

/// Gate decision for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectTo(String),
}

/// Classify a path against the access-token cookie.
///
/// Static assets and the API namespace pass through unconditionally; API
/// calls authenticate via session resolution, not here.
pub fn classify(
    path: &str,
    access_token: Option<&str>,
    security: &SecurityConfig,
) -> GateDecision {
    if path.starts_with("/api") || path.starts_with("/static") || path.contains('.') {
        return GateDecision::Allow;
    }

    let authenticated = access_token
        .map(|token| verify_access_token(token, security).is_some())
        .unwrap_or(false);

    if authenticated && AUTH_PATHS.contains(&path) {
        return GateDecision::RedirectTo(WORKSPACE_PATH.to_string());
    }

    if !authenticated && !PUBLIC_PATHS.contains(&path) {
        // Preserve the requested path so login can come back to it
        return GateDecision::RedirectTo(format!("/login?callbackUrl={path}"));
    }

    GateDecision::Allow
}

pub struct EdgeGate;

impl<S, B> Transform<S, ServiceRequest> for EdgeGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = EdgeGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EdgeGateMiddleware { service }))
    }
}

pub struct EdgeGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for EdgeGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Extract what classify needs before any decision about moving req
        let access_token = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string());
        let security = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.security.clone());

        let Some(security) = security else {
            return Box::pin(async {
                Err(actix_web::error::ErrorInternalServerError(
                    "AppState not available",
                ))
            });
        };

        match classify(req.path(), access_token.as_deref(), &security) {
            GateDecision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            GateDecision::RedirectTo(location) => Box::pin(async move {
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, location))
                    .finish()
                    .map_into_right_body();
                Ok(req.into_response(response))
            }),
        }
    }
}
