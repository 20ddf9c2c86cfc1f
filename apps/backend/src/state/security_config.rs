use jsonwebtoken::Algorithm;
use tracing::warn;

use crate::error::AppError;

// Insecure defaults for non-production contexts only; production boot
// refuses to start without real secrets.
const DEV_ACCESS_SECRET: &str = "access_secret";
const DEV_REFRESH_SECRET: &str = "refresh_secret";

/// Immutable signing configuration, loaded once at startup and injected into
/// the token codec and session service. The two secrets are independent so
/// that the access and refresh signing domains can never cross-verify.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for the short-lived access-token domain
    pub access_secret: Vec<u8>,
    /// Secret for the long-lived refresh-token domain
    pub refresh_secret: Vec<u8>,
    /// JWT algorithm (HS256)
    pub algorithm: Algorithm,
    /// Whether auth cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}

impl SecurityConfig {
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            algorithm: Algorithm::HS256,
            cookie_secure: false,
        }
    }

    /// Build from `JWT_ACCESS_SECRET` / `JWT_REFRESH_SECRET` and `APP_ENV`.
    ///
    /// In production a missing secret is a configuration error that must
    /// surface loudly; elsewhere the insecure defaults are used with a
    /// warning so local development works out of the box.
    pub fn from_env() -> Result<Self, AppError> {
        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let access_secret = Self::secret_from_env("JWT_ACCESS_SECRET", DEV_ACCESS_SECRET, production)?;
        let refresh_secret =
            Self::secret_from_env("JWT_REFRESH_SECRET", DEV_REFRESH_SECRET, production)?;

        Ok(Self {
            access_secret,
            refresh_secret,
            algorithm: Algorithm::HS256,
            cookie_secure: production,
        })
    }

    fn secret_from_env(
        var: &str,
        dev_default: &str,
        production: bool,
    ) -> Result<Vec<u8>, AppError> {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => Ok(value.into_bytes()),
            _ if production => Err(AppError::config(format!("{var} must be set in production"))),
            _ => {
                warn!(var, "signing secret not set, using insecure dev default");
                Ok(dev_default.as_bytes().to_vec())
            }
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(
            b"access_secret_for_tests_only".to_vec(),
            b"refresh_secret_for_tests_only".to_vec(),
        )
    }
}
