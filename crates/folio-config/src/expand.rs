//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use std::cell::RefCell;
use std::convert::Infallible;

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// `${VAR}` fails if `VAR` is unset; `${VAR:-default}` falls back to
/// `default`. Bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let unset = RefCell::new(Vec::new());
    let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, Infallible> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => {
                unset.borrow_mut().push(var.to_owned());
                Ok(None)
            }
        }
    })
    .map(std::borrow::Cow::into_owned)
    .unwrap_or_else(|err| match err.cause {});

    // Unset variables with a default were substituted; the rest are errors
    if let Some(var) = unset
        .into_inner()
        .into_iter()
        .find(|var| value.contains(&format!("${{{var}}}")))
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_SIMPLE", "hello");
        }
        assert_eq!(expand_env("${FOLIO_TEST_SIMPLE}", "f").unwrap(), "hello");
        unsafe {
            std::env::remove_var("FOLIO_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_UNSET");
        }
        assert_eq!(
            expand_env("${FOLIO_TEST_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_empty_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_NO_TOKEN");
        }
        assert_eq!(expand_env("${FOLIO_TEST_NO_TOKEN:-}", "f").unwrap(), "");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING");
        }
        let err = expand_env("${FOLIO_TEST_MISSING}", "server.host").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FOLIO_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_HOST", "cdn.example.com");
        }
        assert_eq!(
            expand_env("https://${FOLIO_TEST_HOST}", "f").unwrap(),
            "https://cdn.example.com"
        );
        unsafe {
            std::env::remove_var("FOLIO_TEST_HOST");
        }
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("127.0.0.1", "f").unwrap(), "127.0.0.1");
        assert_eq!(expand_env("$VAR", "f").unwrap(), "$VAR");
    }
}
