//! Shared application state and configuration.

pub mod app_state;
pub mod security_config;
