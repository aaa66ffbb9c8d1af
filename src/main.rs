//! Route table generator.
//!
//! # Architecture Overview
//!
//! ```text
//!   routegen.toml
//!        │
//!        ▼
//!   ┌──────────┐    ┌───────────────────────────────┐    ┌──────────────┐
//!   │  config  │───▶│           routegen            │───▶│     sink     │──▶ routes.json
//!   │ load +   │    │  health_check   backend_rules │    │  (JSON file  │
//!   │ validate │    │        │              │       │    │   or stdout) │
//!   └──────────┘    │        ▼              ▼       │    └──────────────┘
//!        ▲          │   ┌──────────────────────┐    │
//!        │          │   │ routing: template →  │    │
//!   ┌──────────┐    │   │ pattern → builder    │    │
//!   │ watcher  │    │   └──────────────────────┘    │
//!   │ (watch)  │    └───────────────────────────────┘
//!   └──────────┘
//! ```
//!
//! `generate` runs one pass and exits non-zero on any error.
//! `watch` regenerates on every config change and keeps the last good table
//! when a pass fails.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use route_generator::config::loader::load_config;
use route_generator::config::watcher::ConfigWatcher;
use route_generator::observability::logging::init_logging;
use route_generator::routegen::{generate_from_config, JsonSink, RouteSink, RouteTable};

#[derive(Parser)]
#[command(name = "routegen")]
#[command(about = "Generate proxy routes from a service description", long_about = None)]
struct Cli {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "routegen.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the route table once
    Generate {
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Regenerate the route table whenever the config changes
    Watch {
        /// Output file, replaced atomically on every successful pass.
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;

    let mut observability = config.observability.clone();
    if let Some(level) = cli.log_level {
        observability.log_level = level;
    }
    observability.json_logs |= cli.json_logs;
    init_logging(&observability)?;

    tracing::info!(
        config = ?cli.config,
        service = %config.service.name,
        http_rules = config.service.http_rules.len(),
        healthz = %config.options.healthz,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Generate { output } => {
            let table = generate_from_config(&config)?;
            match output {
                Some(path) => write_table(&path, &table)?,
                None => JsonSink::new(io::stdout().lock()).emit(&table)?,
            }
        }
        Commands::Watch { output } => {
            let table = generate_from_config(&config)?;
            write_table(&output, &table)?;

            let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
            let _handle = watcher.run()?;

            loop {
                tokio::select! {
                    Some(new_config) = updates.recv() => {
                        match generate_from_config(&new_config) {
                            Ok(table) => {
                                if let Err(e) = write_table(&output, &table) {
                                    tracing::error!(error = %e, output = ?output, "Failed to write route table");
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Generation failed, keeping previous route table");
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Write via a sibling temp file and rename, so readers never see a partial table.
fn write_table(path: &Path, table: &RouteTable) -> Result<(), Box<dyn std::error::Error>> {
    let tmp = temp_path(path);
    {
        let file = File::create(&tmp)?;
        JsonSink::new(BufWriter::new(file)).emit(table)?;
    }
    fs::rename(&tmp, path)?;

    tracing::info!(output = ?path, routes = table.len(), "Route table written");
    Ok(())
}

/// `routes.json` → `routes.json.tmp`, always distinct from `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("routes"));
    name.push(".tmp");
    path.with_file_name(name)
}
