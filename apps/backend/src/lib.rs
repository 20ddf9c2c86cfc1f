#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod state;
pub mod test_support;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::claims::Claims;
pub use auth::jwt::{
    mint_access_token, mint_refresh_token, verify_access_token, verify_refresh_token,
};
pub use auth::session::{AuthTokens, ResolvedSession, SessionService};
pub use error::AppError;
pub use extractors::current_user::CurrentUser;
pub use infra::db::{connect_db, db_url};
pub use middleware::cors::cors_middleware;
pub use middleware::edge_gate::EdgeGate;
pub use middleware::request_trace::RequestTrace;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
