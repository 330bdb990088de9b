//! searchline - grammar-aware search query completion
//!
//! Completes and validates search queries against a schema of searchable
//! fields, either one query at a time or in an interactive shell.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell
//! searchline --schema foos.toml
//!
//! # One-shot completion (trailing space matters)
//! searchline --schema foos.toml complete "int "
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use searchline::cli::CliInterface;
use searchline::error::Result;
use searchline::repl::ReplEngine;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or start the interactive shell
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);
    debug!("Effective configuration: {:?}", cli.config());

    if cli.handle_subcommand()? {
        return Ok(());
    }

    run_interactive_mode(&cli)
}

/// Run the interactive shell until the user quits
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let state = cli.shared_state(false)?;
    cli.print_banner(&state);

    let display = &cli.config().display;
    let mut repl = ReplEngine::new(
        state,
        &cli.config().history,
        display.syntax_highlighting && display.color_output,
    )?;
    repl.run()?;

    println!("Goodbye!");
    Ok(())
}

/// Initialize logging from configuration and verbosity flags
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so one-shot
/// output on stdout stays machine-readable.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
