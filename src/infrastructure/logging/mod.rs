// Logging module - Logging infrastructure
use crate::domain::error::{TdsGrabError, TdsGrabResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system
///
/// Logs go to stderr so stdout carries only the operator status lines.
/// `RUST_LOG` takes precedence over `level`; `verbose` forces debug output.
pub fn init_logging(level: &str, verbose: bool) -> TdsGrabResult<()> {
    let default_directive = if verbose {
        "tdsgrab=debug".to_string()
    } else {
        format!("tdsgrab={},warn", level)
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_directive))
        .map_err(|e| TdsGrabError::Config {
            message: format!("Invalid log level '{}': {}", level, e),
        })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true)
                .with_thread_ids(verbose)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init()
        .map_err(|e| TdsGrabError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("TDSGrab logging system initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init() {
        // Test that logging initialization doesn't panic
        assert!(init_logging("info", false).is_ok());
        // A second subscriber cannot be installed
        assert!(init_logging("info", false).is_err());
    }
}
