//! Refresh command implementation
//!
//! Drives the freshness-gated aggregation pipeline and reports the
//! outcome of the cycle.

use super::shared::setup_logging;
use crate::app::services::refresh::RefreshCoordinator;
use crate::cli::args::RefreshArgs;
use crate::{Config, Error, Result};
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Refresh command runner
pub async fn run_refresh(args: RefreshArgs, cancellation_token: CancellationToken) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting station refresh");
    debug!("Refresh arguments: {:?}", args);

    args.validate()?;

    let config = build_config(&args);
    let coordinator = RefreshCoordinator::new(config)?;

    // A refresh is all-or-nothing once started; honor a pending ctrl-c
    // before kicking it off
    if cancellation_token.is_cancelled() {
        return Err(Error::processing_interrupted(
            "Refresh cancelled before start".to_string(),
        ));
    }

    let (stations, stats) = if args.force {
        coordinator.refresh(args.show_progress(), args.dry_run).await?
    } else {
        coordinator
            .load_stations(args.show_progress(), args.dry_run)
            .await?
    };

    if !args.quiet {
        let marker = if stats.refreshed {
            "✓ Refresh complete:".green().bold()
        } else {
            "✓ Cache is current:".green().bold()
        };
        println!("{} {}", marker, stats.summary());

        if stats.refreshed && stations.is_empty() {
            println!(
                "{} all sources returned no stations",
                "⚠ Warning:".yellow().bold()
            );
        }
        if args.dry_run {
            println!("{}", "  (dry run, cache not modified)".dimmed());
        }
    }

    Ok(())
}

/// Apply command-line overrides to the default configuration
fn build_config(args: &RefreshArgs) -> Config {
    let mut config = Config::default();

    if let Some(database) = &args.database {
        config = config.with_database_path(database.clone());
    }
    if let Some(catalog) = &args.catalog {
        config = config.with_catalog_path(catalog.clone());
    }
    if let Some(ten_url) = &args.ten_url {
        config = config.with_ten_endpoint(ten_url.clone());
    }
    if let Some(mika_url) = &args.mika_url {
        config = config.with_mika_listing_url(mika_url.clone());
    }
    if let Some(geocoder_url) = &args.geocoder_url {
        config = config.with_geocoder_endpoint(geocoder_url.clone());
    }

    config
}
