//! Alumnet CLI: upload local images and videos through the media pipeline.
//!
//! Configuration comes from the environment (or `.env`): STORAGE_BACKEND,
//! UPLOAD_BUCKET, LOCAL_STORAGE_PATH, S3_REGION, ...

use std::io::Write;
use std::path::{Path, PathBuf};

use alumnet_core::{AssetRef, ErrorMetadata, MediaKind, ProgressReport, UploadConfig};
use alumnet_storage::create_storage;
use alumnet_upload::telemetry::init_tracing;
use alumnet_upload::{CancellationToken, MediaUploader, UploadError, UploadOutcome};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "alumnet", about = "Alumnet media upload CLI")]
struct Cli {
    /// Emit JSON logs and results
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more images and videos
    Upload {
        /// Files to upload, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target bucket (defaults to UPLOAD_BUCKET)
        #[arg(long)]
        bucket: Option<String>,
        /// Total attempts per file (defaults to UPLOAD_MAX_RETRIES)
        #[arg(long)]
        max_retries: Option<u32>,
        /// Object key to use instead of a generated one (single file only)
        #[arg(long)]
        key: Option<String>,
        /// Media kind when it cannot be inferred from the extension: image, video
        #[arg(long)]
        kind: Option<String>,
    },
    /// Check a file against the size ceilings without uploading it
    Check {
        /// File to check
        file: PathBuf,
        /// Video ceiling in MB (defaults to MAX_VIDEO_SIZE_MB)
        #[arg(long)]
        max_video_size_mb: Option<u64>,
        /// Media kind when it cannot be inferred from the extension: image, video
        #[arg(long)]
        kind: Option<String>,
    },
}

/// Per-file result line.
#[derive(Serialize)]
struct FileResult {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_action: Option<&'static str>,
}

impl FileResult {
    fn new(path: &Path, outcome: &UploadOutcome) -> Self {
        let file = path.display().to_string();
        match outcome {
            Ok(uploaded) => FileResult {
                file,
                url: Some(uploaded.url.clone()),
                key: Some(uploaded.key.clone()),
                size_bytes: Some(uploaded.size_bytes),
                error_code: None,
                error: None,
                suggested_action: None,
            },
            Err(e) => FileResult {
                file,
                url: None,
                key: None,
                size_bytes: None,
                error_code: Some(e.error_code()),
                error: Some(e.client_message()),
                suggested_action: e.suggested_action(),
            },
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

fn resolve_asset(path: &Path, kind: Option<&str>) -> anyhow::Result<AssetRef> {
    match kind {
        Some(kind) => {
            let kind: MediaKind = kind.parse()?;
            Ok(AssetRef::new(path, kind))
        }
        None => AssetRef::from_path(path).with_context(|| {
            format!(
                "Cannot tell whether {} is an image or a video; pass --kind",
                path.display()
            )
        }),
    }
}

fn print_progress(report: ProgressReport) {
    let mut stderr = std::io::stderr();
    let _ = write!(
        stderr,
        "\r{:>5.1}% ({} / {} bytes)",
        report.percentage, report.bytes_loaded, report.bytes_total
    );
    let _ = stderr.flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = UploadConfig::from_env().context("Failed to load upload configuration")?;

    match cli.command {
        Commands::Upload {
            files,
            bucket,
            max_retries,
            key,
            kind,
        } => {
            if key.is_some() && files.len() > 1 {
                anyhow::bail!("--key can only be used with a single file");
            }

            let assets = files
                .iter()
                .map(|path| resolve_asset(path, kind.as_deref()))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage backend")?;
            let uploader = MediaUploader::from_config(storage, &config);

            let mut options = config.transfer_options();
            if let Some(bucket) = bucket {
                options = options.with_bucket(bucket);
            }
            if let Some(max_retries) = max_retries {
                options = options.with_max_retries(max_retries);
            }
            if !cli.json {
                options = options.with_progress(print_progress);
            }

            let outcomes: Vec<UploadOutcome> = match key {
                Some(key) => vec![uploader.upload_file(&assets[0], &key, &options).await],
                None => {
                    let cancel = CancellationToken::new();
                    let on_interrupt = cancel.clone();
                    tokio::spawn(async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            tracing::info!("Interrupted, cancelling remaining uploads");
                            on_interrupt.cancel();
                        }
                    });
                    uploader
                        .upload_batch_with_cancel(&assets, &options, &cancel)
                        .await
                }
            };

            let results: Vec<FileResult> = files
                .iter()
                .zip(outcomes.iter())
                .map(|(path, outcome)| FileResult::new(path, outcome))
                .collect();

            if cli.json {
                print_json(&results)?;
            } else {
                eprintln!();
                for result in &results {
                    match (&result.url, &result.error) {
                        (Some(url), _) => println!("{} -> {}", result.file, url),
                        (None, Some(error)) => match result.suggested_action {
                            Some(action) => {
                                println!("{}: {} ({})", result.file, error, action)
                            }
                            None => println!("{}: {}", result.file, error),
                        },
                        (None, None) => println!("{}: no result", result.file),
                    }
                }
            }

            let failed = outcomes.iter().filter(|o| o.is_err()).count();
            if failed > 0 {
                let cancelled = outcomes
                    .iter()
                    .any(|o| matches!(o, Err(UploadError::Cancelled)));
                anyhow::bail!(
                    "{} of {} upload(s) failed{}",
                    failed,
                    outcomes.len(),
                    if cancelled { " or were cancelled" } else { "" }
                );
            }
        }
        Commands::Check {
            file,
            max_video_size_mb,
            kind,
        } => {
            let asset = resolve_asset(&file, kind.as_deref())?;
            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage backend")?;
            let uploader = MediaUploader::from_config(storage, &config);

            let check = uploader
                .validate_file_size(
                    &asset,
                    max_video_size_mb.unwrap_or(config.max_video_size_mb),
                )
                .await;

            if cli.json {
                print_json(&check)?;
            } else if check.valid {
                println!("{}: OK ({:.1}MB)", file.display(), check.size_mb);
            } else {
                println!(
                    "{}: {}",
                    file.display(),
                    check.message.as_deref().unwrap_or("rejected")
                );
            }

            if !check.valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
