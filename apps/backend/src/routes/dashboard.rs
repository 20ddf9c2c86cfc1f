//! Dashboard aggregates for the authenticated user.

use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::auth::cookies::access_cookie;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::repos::tasks;
use crate::state::app_state::AppState;

async fn stats(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let stats = tasks::stats_for_user(db, user.user_id, OffsetDateTime::now_utc()).await?;

    let mut builder = HttpResponse::Ok();
    if let Some(token) = &user.refreshed_access_token {
        builder.cookie(access_cookie(token.clone(), &app_state.security));
    }
    Ok(builder.json(stats))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(stats));
}
