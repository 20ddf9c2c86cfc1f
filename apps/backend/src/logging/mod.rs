//! Logging helpers shared across the backend.

pub mod pii;
