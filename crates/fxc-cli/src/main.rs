//! `fxc` - drive the effect conformance suite from the command line
//!
//! Enumerates the reference factory, runs every instance through the suite,
//! prints one report per instance, and exits non-zero when any instance is
//! non-conformant or aborts outside the defined vocabulary.

use clap::Parser;
use fxc_conformance::{ConformanceConfig, TestHarness};
use fxc_effect::{EffectDescriptor, VolumeCapability};
use fxc_volume::VolumeFactory;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fxc", version, about = "Audio effect parameter conformance suite")]
struct Args {
    /// Runner configuration file (TOML)
    #[arg(long, env = "FXC_CONFIG")]
    config: Option<String>,

    /// Emit reports as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Run a single reference instance capped at this level instead of the
    /// full reference lineup
    #[arg(long)]
    max_level_db: Option<i32>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => match ConformanceConfig::from_file(path).await {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(path = %path, error = %err, "cannot load configuration");
                return ExitCode::from(2);
            }
        },
        None => ConformanceConfig::default(),
    };
    config.verbose |= args.verbose;

    let factory = match args.max_level_db {
        Some(max_level_db) => VolumeFactory::with_descriptors(vec![EffectDescriptor::new(
            "volume",
            VolumeCapability::capped(max_level_db),
        )
        .with_implementor("FXC Reference")
        .with_version(env!("CARGO_PKG_VERSION"))]),
        None => VolumeFactory::reference(),
    };

    let harness = TestHarness::with_config(config);
    let (all_conformant, runs) = harness.check_all_conformant(&factory).await;

    for run in &runs {
        match &run.outcome {
            Ok(report) if args.json => match report.to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    tracing::error!(instance = %run.instance, error = %err, "cannot render report");
                    return ExitCode::from(2);
                }
            },
            Ok(report) => println!("{}", report.to_text()),
            Err(err) if args.json => {
                let aborted = serde_json::json!({
                    "instance_name": run.instance,
                    "aborted": err.to_string(),
                });
                println!("{aborted}");
            }
            Err(err) => {
                eprintln!("instance {} aborted: {err}", run.instance);
            }
        }
    }

    if all_conformant {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
