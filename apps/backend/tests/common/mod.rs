//! Shared helpers for integration tests.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;

/// Value of the named `Set-Cookie` response header, if present.
pub fn set_cookie_value<B: MessageBody>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|h| h.to_str().ok())
        .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Max-Age of the named `Set-Cookie` response header, if present.
pub fn set_cookie_max_age<B: MessageBody>(
    resp: &ServiceResponse<B>,
    name: &str,
) -> Option<actix_web::cookie::time::Duration> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|h| h.to_str().ok())
        .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
        .find(|c| c.name() == name)
        .and_then(|c| c.max_age())
}
