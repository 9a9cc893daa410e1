//! Configuration management and environment variable loading

use std::env;
use std::path::Path;

use crate::{Result, SoukError};

/// Load environment variables from a .env file.
///
/// Safe to call multiple times; a missing file is not an error, only a
/// malformed one is.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(SoukError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment only");
            Ok(())
        }
        Err(e) => Err(SoukError::config(format!("Failed to load .env file: {}", e))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    dotenvy::from_path(path.as_ref()).map_err(|e| {
        SoukError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    tracing::info!("Loaded environment from: {}", path.as_ref().display());
    Ok(())
}

/// Get required environment variable, erroring when unset
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        SoukError::config(format!(
            "Required environment variable '{}' is not set",
            key
        ))
    })
}

/// Get optional environment variable with a default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as a float, falling back on unset or
/// unparseable values
pub fn get_env_float(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(default)
}

/// Get environment variable as a usize, falling back on unset or
/// unparseable values
pub fn get_env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_or_default() {
        assert_eq!(get_env_or("SOUK_TEST_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn test_get_env_float_parses() {
        env::set_var("SOUK_TEST_FLOAT", "0.42");
        assert_eq!(get_env_float("SOUK_TEST_FLOAT", 0.7), 0.42);
        env::set_var("SOUK_TEST_FLOAT", "not-a-number");
        assert_eq!(get_env_float("SOUK_TEST_FLOAT", 0.7), 0.7);
        env::remove_var("SOUK_TEST_FLOAT");
    }

    #[test]
    fn test_get_required_env() {
        env::set_var("SOUK_TEST_REQUIRED", "value");
        assert_eq!(get_required_env("SOUK_TEST_REQUIRED").unwrap(), "value");
        env::remove_var("SOUK_TEST_REQUIRED");

        let err = get_required_env("SOUK_TEST_REQUIRED_UNSET").unwrap_err();
        assert!(matches!(err, SoukError::Config(_)));
    }
}
