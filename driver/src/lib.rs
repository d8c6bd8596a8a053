use std::str::FromStr;

use error_stack::{Report, ResultExt};

use kernel::KernelError;

pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("environment variable `{key}` is not set"))
}

/// Reads `key`, falling back to `default` when it is unset.
pub(crate) fn env_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: FromStr,
{
    match dotenvy::var(key) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("environment variable `{key}` has invalid value `{value}`"))
        }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(Report::new(error).change_context(KernelError::Internal)),
    }
}
