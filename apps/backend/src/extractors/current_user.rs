//! Authenticated-caller extractor for protected API routes.
//!
//! Runs full session resolution over both auth cookies: valid access token
//! first (no store I/O), silent refresh second. When the refresh path minted
//! a replacement access token it is carried here, and the handler is
//! responsible for attaching it to the response; extraction never sets
//! cookies itself.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::auth::cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
    /// Replacement access-token cookie value, present when this request was
    /// authenticated via silent refresh
    pub refreshed_access_token: Option<String>,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let access_token = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string());
            let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());

            let resolved = app_state
                .sessions
                .resolve_current_user(access_token.as_deref(), refresh_token.as_deref())
                .await?
                .ok_or_else(AppError::unauthorized)?;

            // Claims minted here always carry a uuid sub; anything else is a
            // forged token that slipped past signature checks, so refuse it.
            let user_id = resolved
                .claims
                .sub
                .parse::<Uuid>()
                .map_err(|_| AppError::unauthorized())?;

            Ok(CurrentUser {
                user_id,
                email: resolved.claims.email,
                refreshed_access_token: resolved.refreshed_access_token,
            })
        })
    }
}
