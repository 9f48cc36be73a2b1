//! Comex CLI: price export budgets from the command line.
//!
//! Commands:
//! - `quote`: price a quote request and print the result as JSON
//! - `incoterms`: list the supported Incoterms with rank and total aggregate
//! - `config show`: print the effective configuration
//! - `config init`: write a default `comex.toml`
//!
//! A failed quote prints its JSON error to stderr and exits with 4 for
//! request errors or 5 for internal ones.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comex_cli::commands::{self, QuoteOptions};
use comex_cli::{ComexConfig, InMemoryCatalog};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "comex",
    version,
    about = "Comex CLI: Incoterm-aware export budget pricing"
)]
struct Cli {
    /// Path to a comex.toml. Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a quote request.
    Quote {
        /// Request JSON file, or `-` for stdin.
        #[arg(long)]
        request: String,

        /// JSON array of saved costs referenced by `costId`.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Price unknown Incoterm codes as FOB instead of failing.
        #[arg(long, default_value_t = false)]
        lenient_incoterm: bool,

        /// Pretty-print the JSON result.
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Print a plain-text summary instead of JSON.
        #[arg(long, default_value_t = false, conflicts_with = "pretty")]
        summary: bool,
    },
    /// List supported Incoterms.
    Incoterms {
        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write a default comex.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Quote {
            request,
            catalog,
            lenient_incoterm,
            pretty,
            summary,
        } => run_quote(
            cli.config,
            &request,
            catalog.as_deref(),
            QuoteOptions { lenient_incoterm },
            pretty,
            summary,
        ),
        Commands::Incoterms { json } => {
            let rows = commands::incoterm_table();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", commands::render_incoterms(&rows));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.config)?;
                print!("{}", config.to_toml()?);
                Ok(ExitCode::SUCCESS)
            }
            ConfigAction::Init { force } => run_config_init(cli.config, force),
        },
    }
}

/// Logs go to stderr so stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=comex=trace` - Show trace for comex crates only
/// - Default: `comex=info`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("comex=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_quote(
    config_path: Option<PathBuf>,
    request: &str,
    catalog: Option<&Path>,
    options: QuoteOptions,
    pretty: bool,
    summary: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let body = read_request(request)?;
    let catalog = match catalog {
        Some(path) => InMemoryCatalog::load(path)
            .with_context(|| format!("loading cost catalog {}", path.display()))?,
        None => InMemoryCatalog::new(),
    };

    let rendered = commands::quote_json(&body, &catalog, &config, options).and_then(|result| {
        if summary {
            Ok(commands::render_summary(&result))
        } else {
            commands::render_json(&result, pretty)
        }
    });

    match rendered {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.to_json());
            Ok(ExitCode::from(err.code.exit_status()))
        }
    }
}

/// An explicit `--config` must load; the platform default falls back to
/// built-in defaults when broken.
fn load_config(config_path: Option<PathBuf>) -> Result<ComexConfig> {
    match config_path {
        Some(path) => ComexConfig::load(Some(path)).context("loading configuration"),
        None => Ok(ComexConfig::load_or_default(None)),
    }
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("reading request from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading request {}", source))
    }
}

fn run_config_init(config_path: Option<PathBuf>, force: bool) -> Result<ExitCode> {
    let target = match config_path.or_else(ComexConfig::default_config_path) {
        Some(path) => path,
        None => bail!("no config directory available; pass --config"),
    };
    if target.exists() && !force {
        bail!("{} already exists; use --force to overwrite", target.display());
    }

    let path = ComexConfig::default().save(Some(target))?;
    println!("Wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}
