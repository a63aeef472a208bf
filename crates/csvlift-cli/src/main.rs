//! 🚀 csvlift-cli — the front door, the bouncer, the maitre d' of csvlift.
//!
//! 📦 This binary crate is the thin CLI wrapper that sets up logging, loads
//! config, and then lets the library do the heavy lifting. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// 🪣 Render the sample dataset as CSV and upload it to S3.
///
/// Credentials and target come from AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY,
/// AWS_SESSION_TOKEN, AWS_REGION, S3_BUCKET, S3_KEY and S3_ENDPOINT_URL.
#[derive(Debug, Parser)]
#[command(name = "csvlift", version, about)]
struct Cli {
    /// Optional TOML file layered on top of the environment (file wins on conflicts).
    config_file: Option<PathBuf>,
}

/// 🚀 main() — where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (info by default, RUST_LOG to taste)
/// 2. Parse args
/// 3. Load config, run the upload
/// 4. On failure: log the whole onion, exit 1
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = lift(cli).await {
        // 🗑️ Exit with prejudice. Process exitus maximus.
        std::process::exit(csvlift::report::report_failure(&err));
    }
}

async fn lift(cli: Cli) -> Result<()> {
    // 🔒 Validate the config file exists before we get too emotionally attached
    let config_file = match cli.config_file.as_deref() {
        Some(path) => {
            let exists = path.try_exists().with_context(|| {
                format!(
                    "💀 Couldn't check whether the configuration file exists. Was checking here: '{}'",
                    path.display()
                )
            })?;
            anyhow::ensure!(
                exists,
                "💀 Configuration file '{}' does not exist. Double check the path, or use an absolute one.",
                path.display()
            );
            Some(path)
        }
        None => None,
    };

    let app_config = csvlift::app_config::load_config(config_file)
        .context("💀 In csvlift-cli, main, we couldn't load the configuration")?;

    // 🚀 SEND IT. No take-backs. One attempt.
    csvlift::run(app_config).await?;
    Ok(())
}
