//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use crate::errors::{SyncError, SyncErrorKind};

/// Default filter used when `RUST_LOG` is not set
const DEBUG_FILTER: &str = "iudsync_core=debug,iudsync_store=debug,iudsync_engine=debug,iudsync_cli=debug";
const INFO_FILTER: &str = "iudsync_core=info,iudsync_store=info,iudsync_engine=info,iudsync_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output with debug level
    Development,
    /// JSON structured output with info level
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development | Profile::Test => DEBUG_FILTER,
            Profile::Production => INFO_FILTER,
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn env_filter(profile: Profile) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(profile.default_filter()))
}

/// Initialize the logging facility on stderr
///
/// This function should be called once at application startup.
/// It sets up the tracing subscriber based on the selected profile.
///
/// # Example
///
/// ```
/// use iudsync_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(profile))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(profile))
                .init();
        }
        Profile::Test => {
            // Test capture is initialized separately via init_test_capture()
            tracing_subscriber::registry().init();
        }
    });
}

/// Initialize the logging facility, appending to a log file
///
/// The file is created if missing and never truncated, so consecutive runs
/// accumulate in one log. ANSI colouring is disabled.
///
/// # Errors
///
/// Returns `Io` if the log file cannot be opened for appending.
pub fn init_to_file(profile: Profile, path: &Path) -> Result<(), SyncError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            SyncError::new(SyncErrorKind::Io)
                .with_op("init_logging")
                .with_file_path(path.display().to_string())
                .with_message(e.to_string())
        })?;

    INIT_ONCE.call_once(move || {
        let writer = Mutex::new(file);
        match profile {
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(writer)
                    .with_env_filter(env_filter(profile))
                    .init();
            }
            Profile::Development | Profile::Test => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_env_filter(env_filter(profile))
                    .init();
            }
        }
    });
    Ok(())
}
