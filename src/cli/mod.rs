//! Command-line interface for searchline
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - One-shot subcommands (complete, validate, fields, completion, config)
//! - Application startup for the interactive shell

pub mod completion;

use clap::{Parser, Subcommand, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::{ConfigError, Result};
use crate::formatter::Formatter;
use crate::repl::SharedState;

/// Searchline - grammar-aware search query completion
#[derive(Parser, Debug)]
#[command(
    name = "searchline",
    version,
    about = "Grammar-aware completion and validation for search queries",
    long_about = "Completes and validates queries of the form `field comparator value`, \
joined by and/or, against a schema of searchable fields. Without a command, \
starts an interactive shell."
)]
pub struct CliArgs {
    /// Schema file describing the searchable fields
    #[arg(short = 's', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub schema: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Output format (plain, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Collapse relation groups when more candidates than this are listed
    #[arg(long, value_name = "N")]
    pub group_threshold: Option<usize>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for searchline
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print completions for a partially typed query
    Complete {
        /// Query text; trailing whitespace is significant
        #[arg(value_name = "QUERY", allow_hyphen_values = true)]
        query: String,

        /// Reject unknown fields and operators already typed
        #[arg(long)]
        checked: bool,
    },

    /// Validate a query and print its clauses
    Validate {
        #[arg(value_name = "QUERY", allow_hyphen_values = true)]
        query: String,
    },

    /// List the fields of the schema
    Fields,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// An invalid file falls back to defaults with a warning; invalid values
    /// given on the command line are an error.
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        config.validate()?;

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_schema_args(config, args);
        Self::apply_completion_args(config, args);
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    fn apply_schema_args(config: &mut Config, args: &CliArgs) {
        if let Some(path) = &args.schema {
            config.schema.path = Some(path.clone());
        }
    }

    fn apply_completion_args(config: &mut Config, args: &CliArgs) {
        if let Some(threshold) = args.group_threshold {
            config.completion.group_threshold = threshold;
        }
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if args.no_color {
            config.display.color_output = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        match format_str.to_lowercase().as_str() {
            "plain" | "text" => OutputFormat::Plain,
            "json" => OutputFormat::Json,
            _ => {
                eprintln!("Warning: Unknown format '{}', using plain", format_str);
                OutputFormat::Plain
            }
        }
    }

    /// Load the configured schema into shared state
    ///
    /// # Arguments
    /// * `require_schema` - Fail when no schema file is configured
    pub fn shared_state(&self, require_schema: bool) -> Result<SharedState> {
        if require_schema && self.config.schema.path.is_none() {
            return Err(ConfigError::MissingField(
                "schema.path (pass --schema FILE or set [schema] path)".to_string(),
            )
            .into());
        }
        SharedState::from_config(&self.config)
    }

    fn formatter(&self) -> Formatter {
        Formatter::from_config(&self.config.display)
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Complete { query, checked }) => {
                self.complete(query, *checked)?;
                Ok(true)
            }
            Some(Commands::Validate { query }) => {
                self.validate(query)?;
                Ok(true)
            }
            Some(Commands::Fields) => {
                self.list_fields()?;
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Print completions for `query`
    fn complete(&self, query: &str, checked: bool) -> Result<()> {
        let state = self.shared_state(true)?;
        let suggestions = if checked {
            state.engine().complete_checked(query)?
        } else {
            state.engine().complete(query)?
        };

        let output = self.formatter().format_suggestions(&suggestions)?;
        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(())
    }

    /// Validate `query` and print its clauses
    ///
    /// With JSON output the error object is also printed on stdout.
    fn validate(&self, query: &str) -> Result<()> {
        let state = self.shared_state(true)?;
        let formatter = self.formatter();

        match state.engine().validate(query) {
            Ok(validated) => {
                println!("{}", formatter.format_query(&validated)?);
                Ok(())
            }
            Err(e) => {
                if formatter.format_type().is_json() {
                    println!("{}", formatter.format_error(&e));
                }
                Err(e)
            }
        }
    }

    /// Print the schema's fields
    fn list_fields(&self) -> Result<()> {
        let state = self.shared_state(true)?;
        println!("{}", self.formatter().format_fields(&state.registry())?);
        Ok(())
    }

    /// Show version information
    fn show_version(&self) {
        println!("searchline version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file()?;
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return Ok(());
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }

        Ok(())
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!("# Effective configuration:");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Configuration file given on the command line, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.args.config_file.as_deref()
    }

    /// Print banner with version and schema info
    pub fn print_banner(&self, state: &SharedState) {
        if self.args.quiet {
            return;
        }

        println!("Using searchline: {}", env!("CARGO_PKG_VERSION"));
        match state.schema_path() {
            Some(path) => println!(
                "Schema: {} ({} fields) from {}",
                state.schema_name(),
                state.registry().len(),
                path.display()
            ),
            None => println!("No schema loaded; start with --schema FILE"),
        }
        println!("Type :help for help, Tab to complete.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        CliInterface { args, config }
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(vec!["searchline"]).unwrap();
        assert!(args.schema.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_with_flags() {
        let args =
            CliArgs::try_parse_from(vec!["searchline", "--no-color", "--quiet", "-s", "foos.toml"])
                .unwrap();
        assert!(args.no_color);
        assert!(args.quiet);
        assert_eq!(args.schema, Some(PathBuf::from("foos.toml")));
    }

    #[test]
    fn test_complete_keeps_trailing_space() {
        let args = CliArgs::try_parse_from(vec!["searchline", "complete", "int ", "--checked"])
            .unwrap();
        match args.command {
            Some(Commands::Complete { query, checked }) => {
                assert_eq!(query, "int ");
                assert!(checked);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_override_config() {
        let cli = cli(&[
            "searchline",
            "--schema",
            "foos.toml",
            "--format",
            "JSON",
            "--group-threshold",
            "20",
            "--no-color",
            "--vv",
        ]);

        let config = cli.config();
        assert_eq!(config.schema.path, Some(PathBuf::from("foos.toml")));
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.completion.group_threshold, 20);
        assert!(!config.display.color_output);
        assert_eq!(config.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_quiet_and_verbose_levels() {
        assert_eq!(cli(&["searchline", "-q"]).config().logging.level, LogLevel::Error);
        assert_eq!(cli(&["searchline", "-v"]).config().logging.level, LogLevel::Debug);
        assert_eq!(cli(&["searchline"]).config().logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(CliInterface::parse_output_format("plain"), OutputFormat::Plain);
        assert_eq!(CliInterface::parse_output_format("Json"), OutputFormat::Json);
        assert_eq!(CliInterface::parse_output_format("table"), OutputFormat::Plain);
    }

    #[test]
    fn test_schema_required_for_queries() {
        let cli = cli(&["searchline", "fields"]);
        assert!(cli.shared_state(true).is_err());
        assert!(cli.shared_state(false).is_ok());
    }

    #[test]
    fn test_shared_state_from_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foos.toml");
        std::fs::write(&path, "name = \"foos\"\n[[fields]]\nname = \"string\"\n").unwrap();

        let cli = cli(&["searchline", "-s", path.to_str().unwrap()]);
        let state = cli.shared_state(true).unwrap();

        assert_eq!(state.schema_name(), "foos");
        assert_eq!(state.engine().complete("str").unwrap(), [" string "]);
    }

    #[test]
    fn test_config_path_default() {
        let cli = cli(&["searchline"]);
        assert!(cli.config_path().is_none());
        assert_eq!(cli.get_config_path(), Config::default_config_path());
    }
}
