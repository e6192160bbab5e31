//! Course Marketplace CLI
//!
//! Replays a CSV file of marketplace operations and prints a report of the
//! final state.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --admin 0x00000000000000000000000000000000000000ad operations.csv > courses.csv
//! cargo run -- --config marketplace.toml --report accounts operations.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-pending 8 operations.csv
//! RUST_LOG=info cargo run -- --config marketplace.toml operations.csv
//! ```
//!
//! Logs go to stderr; the report goes to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad configuration, file not found, file not readable, etc.)

use course_marketplace_engine::cli;
use course_marketplace_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = match args.to_run_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), settings, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
