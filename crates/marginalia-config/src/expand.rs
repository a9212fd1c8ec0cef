//! `${VAR}` references in command and path settings.
//!
//! `${VAR:-fallback}` substitutes the fallback when VAR is unset; a plain
//! `${VAR}` that is unset fails the load. `$VAR` without braces is literal.

use std::borrow::Cow;

use crate::ConfigError;

/// Name of an environment variable that could not be resolved.
struct UnsetVar(String);

/// Substitute environment variables in the value of `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |name: &str| -> Result<Option<String>, UnsetVar> {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.cause.0),
        })
}
