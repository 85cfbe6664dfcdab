//! CLI entry point for the clean-water access mapper.
//!
//! Reads a village CSV, writes a district summary, a GeoJSON point layer
//! and a static web map into an output directory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clean_water_map::config::PipelineConfig;
use clean_water_map::pipeline;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "clean_water_map")]
#[command(about = "Map village access to clean water", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute access metrics and write the summary, GeoJSON and web map
    Run {
        /// Village CSV with a header row
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory to write outputs into (created if absent)
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Optional JSON config with a schema mapping and map view
        #[arg(long, value_name = "CONFIG_JSON")]
        schema: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Usage errors exit here, before any file is touched.
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/clean_water_map.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("clean_water_map.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    match cli.command {
        Commands::Run {
            input,
            output_dir,
            schema,
        } => {
            let config = match schema {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::default(),
            };

            let report = pipeline::run(&input, &output_dir, &config)?;
            info!(
                records = report.records,
                districts = report.districts,
                coercion_failures = report.coercion_failures,
                inconsistent_records = report.inconsistent_records,
                "Run complete"
            );

            println!("Analysis complete.");
            println!("Outputs generated in folder: {}", output_dir.display());
            println!("Files:");
            for artifact in &report.artifacts {
                let name = artifact
                    .strip_prefix(&output_dir)
                    .unwrap_or(artifact.as_path())
                    .display();
                if artifact.is_dir() {
                    println!(" - {name}/");
                } else {
                    println!(" - {name}");
                }
            }
            println!("Open index.html to view the map.");
        }
    }

    Ok(())
}
