//! CLI command implementations for FullTank
//!
//! This module dispatches parsed arguments to the command runners.

pub mod refresh;
pub mod shared;
pub mod stations;

use crate::cli::args::{Args, Commands};
use crate::Result;
use tokio_util::sync::CancellationToken;

/// Run the command selected on the command line
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.get_command() {
        Commands::Refresh(refresh_args) => {
            refresh::run_refresh(refresh_args, cancellation_token).await
        }
        Commands::Stations(stations_args) => stations::run_stations(stations_args).await,
    }
}
