//! rdf-autocomplete command line tool
//!
//! Replays documents through the incremental completion engine and inspects
//! the syntaxes and vocabularies it knows about.
//!
//! # Usage
//!
//! ```bash
//! # Show every suggestion list opened while typing a Turtle file
//! rdf-autocomplete replay data.ttl
//!
//! # Same, as JSON lines, for a SPARQL query
//! rdf-autocomplete --json replay query.rq
//! ```

use rdf_autocomplete::cli::CliInterface;
use rdf_autocomplete::error::Result;
use tracing::Level;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Run the subcommand
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.handle_subcommand().await
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr so replay output on stdout stays machine readable.
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
