use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use error_stack::{Report, ResultExt};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use application::service::CheckoutPolicy;
use kernel::KernelError;

const SERVER_PORT: &str = "SERVER_PORT";
const CORS_ALLOW_ORIGINS: &str = "CORS_ALLOW_ORIGINS";
const CHECKOUT_MAX_ATTEMPTS: &str = "CHECKOUT_MAX_ATTEMPTS";
const CHECKOUT_ATTEMPT_TIMEOUT_MS: &str = "CHECKOUT_ATTEMPT_TIMEOUT_MS";
const CHECKOUT_RETRY_BACKOFF_MS: &str = "CHECKOUT_RETRY_BACKOFF_MS";

/// Process settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allow_origins: Option<Vec<String>>,
    pub checkout: CheckoutPolicy,
}

impl ServerConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let defaults = CheckoutPolicy::default();
        let cors_allow_origins = match dotenvy::var(CORS_ALLOW_ORIGINS) {
            Ok(origins) => Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Err(_) => None,
        };
        Ok(Self {
            port: var_or(SERVER_PORT, 8080)?,
            cors_allow_origins,
            checkout: CheckoutPolicy {
                max_attempts: var_or(CHECKOUT_MAX_ATTEMPTS, defaults.max_attempts)?,
                attempt_timeout: Duration::from_millis(var_or(
                    CHECKOUT_ATTEMPT_TIMEOUT_MS,
                    defaults.attempt_timeout.as_millis() as u64,
                )?),
                retry_backoff: Duration::from_millis(var_or(
                    CHECKOUT_RETRY_BACKOFF_MS,
                    defaults.retry_backoff.as_millis() as u64,
                )?),
            },
        })
    }

    /// Permissive when no origins are configured.
    pub fn cors(&self) -> error_stack::Result<CorsLayer, KernelError> {
        let Some(origins) = &self.cors_allow_origins else {
            return Ok(CorsLayer::permissive());
        };
        let origins = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .change_context_lazy(|| KernelError::Internal)
                    .attach_printable_lazy(|| format!("invalid CORS origin `{origin}`"))
            })
            .collect::<error_stack::Result<Vec<_>, _>>()?;
        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> error_stack::Result<T, KernelError> {
    match dotenvy::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("environment variable `{key}` has invalid value `{value}`"))
        }),
        Err(_) => Ok(default),
    }
}
