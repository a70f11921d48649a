//! Canonical home directory resolution
//!
//! Single source of truth for where taskmate keeps its state. The
//! `TASKMATE_HOME` environment variable overrides the platform home
//! directory, which is what integration tests use to stay hermetic.
//!
//! # Precedence
//!
//! 1. `TASKMATE_HOME` environment variable (if set and non-empty)
//! 2. `dirs::home_dir()` platform default

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the home directory for taskmate state.
///
/// # Errors
///
/// Returns an error only when `TASKMATE_HOME` is unset and the platform
/// home directory cannot be determined.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("TASKMATE_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}

/// Default root for team state: `<home>/.taskmate/teams`.
pub fn teams_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".taskmate").join("teams"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_taskmate_home_set() {
        let original = env::var("TASKMATE_HOME").ok();
        unsafe { env::set_var("TASKMATE_HOME", "/custom/home") };

        assert_eq!(get_home_dir().unwrap(), PathBuf::from("/custom/home"));
        assert_eq!(
            teams_dir().unwrap(),
            PathBuf::from("/custom/home/.taskmate/teams")
        );

        unsafe {
            match original {
                Some(v) => env::set_var("TASKMATE_HOME", v),
                None => env::remove_var("TASKMATE_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_empty_override_uses_platform_default() {
        let original = env::var("TASKMATE_HOME").ok();
        unsafe { env::set_var("TASKMATE_HOME", "  ") };

        assert_eq!(get_home_dir().unwrap(), dirs::home_dir().unwrap());

        unsafe {
            match original {
                Some(v) => env::set_var("TASKMATE_HOME", v),
                None => env::remove_var("TASKMATE_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_override_trims_whitespace() {
        let original = env::var("TASKMATE_HOME").ok();
        unsafe { env::set_var("TASKMATE_HOME", "  /custom/home  ") };

        assert_eq!(get_home_dir().unwrap(), PathBuf::from("/custom/home"));

        unsafe {
            match original {
                Some(v) => env::set_var("TASKMATE_HOME", v),
                None => env::remove_var("TASKMATE_HOME"),
            }
        }
    }
}
