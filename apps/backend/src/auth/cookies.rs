//! Auth cookie construction. Cookies are the sole token transport; there is
//! no bearer-header mode.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

use crate::auth::jwt::{ACCESS_TTL_SECS, REFRESH_TTL_SECS};
use crate::state::security_config::SecurityConfig;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

fn base_cookie<'a>(name: &'a str, value: String, security: &SecurityConfig) -> Cookie<'a> {
    Cookie::build(name, value)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(security.cookie_secure)
        .path("/")
        .finish()
}

/// `access_token` cookie, max-age 900 s.
pub fn access_cookie(token: String, security: &SecurityConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(ACCESS_COOKIE, token, security);
    cookie.set_max_age(Duration::seconds(ACCESS_TTL_SECS));
    cookie.into_owned()
}

/// `refresh_token` cookie, max-age 604800 s.
pub fn refresh_cookie(token: String, security: &SecurityConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(REFRESH_COOKIE, token, security);
    cookie.set_max_age(Duration::seconds(REFRESH_TTL_SECS));
    cookie.into_owned()
}

/// Expired replacement that clears a cookie client-side.
pub fn clear_cookie(name: &str, security: &SecurityConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), security);
    cookie.set_max_age(Duration::ZERO);
    cookie.into_owned()
}
