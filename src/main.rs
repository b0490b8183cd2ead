use clap::Parser;
use fulltank::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(fulltank::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("FullTank - Israeli Gas Station Price Aggregator");
    println!("================================================");
    println!();
    println!("Aggregate gas station data from the Ten price API, the Mika station");
    println!("directory and a bundled dataset into a queryable local cache.");
    println!();
    println!("USAGE:");
    println!("    fulltank <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    refresh     Refresh the station cache from the upstream sources");
    println!("    stations    Query the cached station list");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Monthly refresh (skipped when the cache is current):");
    println!("    fulltank refresh");
    println!();
    println!("    # Force a refresh into a custom database:");
    println!("    fulltank refresh --force --database /tmp/stations.db");
    println!();
    println!("    # Search by address, cheapest diesel first:");
    println!("    fulltank stations --search \"תל אביב\" --fuel diesel --sort price");
    println!();
    println!("    # Nearby view around a point:");
    println!("    fulltank stations --near 32.0853,34.7818 --radius 10000");
    println!();
    println!("For detailed help on any command, use:");
    println!("    fulltank <COMMAND> --help");
}
