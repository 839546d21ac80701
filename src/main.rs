use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use refdedupe::config::{
    find_config_file, get_config, load_config, ConfigFile, DedupeConfig, CONFIG_FILE_NAME,
};
use refdedupe::dedupe::{Comparator, Duplicate, ScanEvent, ScanObserver, Scanner};
use refdedupe::models::Reference;
use refdedupe::ui::{self, ScanProgress, Status};
use refdedupe::utils::pair_count;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// refdedupe - Find duplicate bibliographic references
#[derive(Parser, Debug)]
#[command(name = "refdedupe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find duplicate bibliographic references", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Log line format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a JSON array of references for duplicate pairs
    #[command(alias = "s")]
    Scan {
        /// JSON file holding an array of references
        input: PathBuf,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Compare two references
    #[command(alias = "c")]
    Compare {
        /// JSON file holding the first reference
        left: PathBuf,

        /// JSON file holding the second reference
        right: PathBuf,
    },

    /// Show or write the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write the effective configuration to a file
    Init {
        /// Destination file
        #[arg(default_value = CONFIG_FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// JSON shape of a single comparison
#[derive(Serialize)]
struct CompareOutput<'a> {
    left: &'a Reference,
    right: &'a Reference,
    verdict: refdedupe::Verdict,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let logging = config_path
        .as_deref()
        .and_then(|path| ConfigFile::load(path).ok())
        .map(|file| file.logging)
        .unwrap_or_default();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };
    let log_format = cli.log_format.unwrap_or(match logging.format.as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Text,
    });

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("refdedupe={}", env_filter)),
    );
    let registry = tracing_subscriber::registry().with(filter);
    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    let config = resolve_config(config_path.as_deref())?;

    match cli.command {
        Commands::Scan { input, no_progress } => {
            let records: Vec<Reference> = read_json(&input)?;
            let scanner = Scanner::from_config(&config).context("Invalid configuration")?;
            let format = resolve_format(cli.output);

            let show_progress = !no_progress && !cli.quiet && ui::is_terminal();
            let mut progress = ScanProgress::new(pair_count(records.len()), show_progress);
            let mut dupes: Vec<Duplicate> = Vec::new();

            let mut handle = scanner.scan_all(records);
            while let Some(event) = handle.next_event().await {
                match event {
                    ScanEvent::Progress { index, total } => progress.on_progress(index, total),
                    ScanEvent::Dupe(duplicate) => {
                        progress.on_dupe(&duplicate);
                        dupes.push(duplicate);
                    }
                    ScanEvent::Error(err) => {
                        progress.on_error(&err);
                        return Err(err).context(format!("Scan of {} failed", input.display()));
                    }
                    ScanEvent::End(summary) if !cli.quiet => progress.on_end(&summary),
                    ScanEvent::End(_) => {}
                }
            }
            handle.join().await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dupes)?),
                _ if dupes.is_empty() => {
                    if !cli.quiet {
                        ui::print_status(Status::Info, "No duplicates found");
                    }
                }
                _ => println!("{}", ui::duplicates_table(&dupes)),
            }
        }

        Commands::Compare { left, right } => {
            let a: Reference = read_json(&left)?;
            let b: Reference = read_json(&right)?;
            let comparator = Comparator::from_config(&config).context("Invalid configuration")?;
            let verdict = comparator.compare(&a, &b);

            match resolve_format(cli.output) {
                OutputFormat::Json => {
                    let output = CompareOutput {
                        left: &a,
                        right: &b,
                        verdict,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                _ => ui::print_verdict(&a, &b, &verdict),
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                print!("{}", ConfigFile::from(config).to_toml()?);
            }
            ConfigCommands::Init { path, force } => {
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                ConfigFile::from(config).save(&path)?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote configuration to {}", path.display()),
                    );
                }
            }
        },
    }

    Ok(())
}

/// Load configuration from the given file, or from the environment alone
fn resolve_config(path: Option<&Path>) -> Result<DedupeConfig> {
    match path {
        Some(path) => {
            tracing::info!("Using config file: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => get_config().context("Failed to read configuration from environment"),
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if ui::is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["refdedupe", "scan", "refs.json"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.log_format.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["refdedupe", "-v", "scan", "refs.json"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["refdedupe", "-vv", "scan", "refs.json"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["refdedupe", "-o", "json", "scan", "refs.json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["refdedupe", "scan", "refs.json", "--output", "table"]);
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_cli_log_format() {
        let cli = Cli::parse_from(["refdedupe", "--log-format", "json", "config", "show"]);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["refdedupe", "--config", "/path/to/config.toml", "config", "show"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_scan_command() {
        let cli = Cli::parse_from(["refdedupe", "scan", "refs.json", "--no-progress"]);
        match cli.command {
            Commands::Scan { input, no_progress } => {
                assert_eq!(input, PathBuf::from("refs.json"));
                assert!(no_progress);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_compare_command() {
        let cli = Cli::parse_from(["refdedupe", "c", "a.json", "b.json"]);
        match cli.command {
            Commands::Compare { left, right } => {
                assert_eq!(left, PathBuf::from("a.json"));
                assert_eq!(right, PathBuf::from("b.json"));
            }
            _ => panic!("Expected Compare command"),
        }
    }

    #[test]
    fn test_cli_config_init_default_path() {
        let cli = Cli::parse_from(["refdedupe", "config", "init"]);
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Init { path, force },
            } => {
                assert_eq!(path, PathBuf::from(CONFIG_FILE_NAME));
                assert!(!force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_resolve_format_explicit() {
        assert_eq!(resolve_format(OutputFormat::Json), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Table), OutputFormat::Table);
    }

    #[test]
    fn test_read_json_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.json");
        std::fs::write(&path, r#"{"title": "A Study of X", "year": 2020}"#).unwrap();

        let reference: Reference = read_json(&path).unwrap();
        assert_eq!(reference.title(), Some("A Study of X"));
    }

    #[test]
    fn test_read_json_missing_file() {
        let err = read_json::<Reference>(Path::new("/nonexistent/ref.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
