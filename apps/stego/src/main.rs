use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    preview::EMBED_INPUT_ID, FsImageReader, PreviewController, SelectedFile, StegoClient,
};
use server_api::{capacity_upload, embed_upload, extract_upload, ImageUpload, StegoContext};
use shared::protocol::{CapacityResponse, ExtractResponse};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stego", about = "Hide text in images and read it back")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed a message and write the resulting PNG.
    Embed {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        message: String,
        /// Defaults to `embedded_<stem>.png` in the current directory.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        server_url: Option<String>,
    },
    Extract {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        server_url: Option<String>,
    },
    Capacity {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        server_url: Option<String>,
    },
    /// Show what the page preview would display for a file.
    Preview {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = EMBED_INPUT_ID)]
        input_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Embed {
            image,
            message,
            output,
            server_url,
        } => {
            let upload = read_upload(&image)?;
            let (filename, png) = match server_url {
                Some(url) => {
                    let client = StegoClient::new(&url)?;
                    let download = client
                        .embed(&upload.filename, upload.bytes, &message)
                        .await?;
                    (download.filename, download.png)
                }
                None => {
                    let embedded = embed_upload(&StegoContext::default(), &upload, &message)?;
                    (embedded.filename, embedded.png)
                }
            };
            let output = output.unwrap_or_else(|| PathBuf::from(filename));
            std::fs::write(&output, &png)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(output = %output.display(), bytes = png.len(), "embedded image written");
            println!("{}", output.display());
        }
        Command::Extract { image, server_url } => {
            let upload = read_upload(&image)?;
            let extracted: ExtractResponse = match server_url {
                Some(url) => {
                    StegoClient::new(&url)?
                        .extract(&upload.filename, upload.bytes)
                        .await?
                }
                None => extract_upload(&StegoContext::default(), &upload)?,
            };
            if !extracted.delimiter_found {
                warn!(
                    bits_scanned = extracted.bits_scanned,
                    "no end marker found; message may be incomplete"
                );
            }
            println!("{}", extracted.message);
        }
        Command::Capacity { image, server_url } => {
            let upload = read_upload(&image)?;
            let capacity: CapacityResponse = match server_url {
                Some(url) => {
                    StegoClient::new(&url)?
                        .capacity(&upload.filename, upload.bytes)
                        .await?
                }
                None => capacity_upload(&StegoContext::default(), &upload)?,
            };
            println!(
                "{}x{}: {} blocks, {} bits, up to {} characters",
                capacity.width,
                capacity.height,
                capacity.full_blocks,
                capacity.capacity_bits,
                capacity.max_message_chars
            );
        }
        Command::Preview { image, input_id } => {
            let mut preview = PreviewController::new(input_id);
            preview
                .preview_image(&[SelectedFile::from_path(&image)], &FsImageReader)
                .await;
            if let Some(error) = preview.last_error() {
                bail!("{error}");
            }
            let view = preview.view();
            println!("{}", view.label.to_html());
            if let Some(source) = &view.source {
                println!("{source}");
            }
        }
    }

    Ok(())
}

fn read_upload(path: &Path) -> Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload { filename, bytes })
}
