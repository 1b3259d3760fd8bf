//! Pictor CLI: run the image pipeline against a local storage root.
//!
//! Configuration comes from the environment (and `.env`): STORAGE_ROOT,
//! PUBLIC_URL_PREFIX, MAX_FILE_SIZE_MB, MAX_IMAGE_WIDTH, THUMBNAIL_SIZE, ...

use anyhow::Context;
use clap::{Parser, Subcommand};
use pictor_cli::{guess_content_type, init_tracing};
use pictor_core::{AppError, ErrorMetadata, LogLevel, PipelineConfig};
use pictor_processing::{ImagePipeline, Remover, UploadRequest};
use pictor_storage::create_storage;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pictor", about = "Image ingestion pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an image file and write its original and thumbnail derivatives
    Ingest {
        /// Path to the image file
        file: PathBuf,
        /// Declared content type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Remove both derivatives of an image
    Remove {
        /// Public reference of the original, e.g. /uploads/images/original/<name>
        original_url: String,
        /// Public reference of the thumbnail
        thumbnail_url: String,
    },
}

/// Log a pipeline error at its own level and turn it into the message shown to the user.
fn report(err: AppError) -> anyhow::Error {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code = code, "Command failed"),
        LogLevel::Warn => tracing::warn!(error = %err, code = code, "Command failed"),
        LogLevel::Error => tracing::error!(error = %err, code = code, "Command failed"),
    }

    match err.suggested_action() {
        Some(action) if err.is_recoverable() => {
            anyhow::anyhow!("{} [{}]. {}", err.client_message(), code, action)
        }
        _ => anyhow::anyhow!("{} [{}]", err.client_message(), code),
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;
    let storage = create_storage(&config)
        .await
        .context("Failed to open storage root")?;

    match cli.command {
        Commands::Ingest { file, content_type } => {
            let content_type = content_type
                .or_else(|| guess_content_type(&file).map(String::from))
                .with_context(|| {
                    format!(
                        "Cannot guess content type of {}, pass --content-type",
                        file.display()
                    )
                })?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let handle = std::fs::File::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let size = handle
                .metadata()
                .with_context(|| format!("Failed to stat {}", file.display()))?
                .len();

            let pipeline = ImagePipeline::new(config, storage);
            let processed = pipeline
                .ingest(UploadRequest::new(handle, size, content_type, file_name))
                .await
                .map_err(report)?;
            print_json(&processed)?;
        }
        Commands::Remove {
            original_url,
            thumbnail_url,
        } => {
            let remover = Remover::new(storage, config.public_url_prefix.clone());
            remover
                .remove(&original_url, &thumbnail_url)
                .await
                .map_err(report)?;
            print_json(&serde_json::json!({
                "success": true,
                "removed": [original_url, thumbnail_url],
            }))?;
        }
    }

    Ok(())
}
