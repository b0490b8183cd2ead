//! Shared components for CLI commands
//!
//! Logging setup and report helpers used by both command runners.

use crate::Result;
use tracing::debug;

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fulltank={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Write report text to the given file, or to stdout when none is set
pub fn write_report(output_file: Option<&std::path::Path>, report: &str) -> Result<()> {
    match output_file {
        Some(path) => {
            std::fs::write(path, report).map_err(|e| {
                crate::Error::io(format!("Failed to write report to {}", path.display()), e)
            })?;
        }
        None => {
            println!("{}", report);
        }
    }
    Ok(())
}
