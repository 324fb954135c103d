use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::RgbImage;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{CapacityResponse, ExtractResponse},
};
use stego::{DctCodec, StegoError};
use tracing::info;
use uuid::Uuid;

pub const MAX_FILENAME_BYTES: usize = 180;

#[derive(Debug, Clone, Default)]
pub struct StegoContext {
    pub codec: DctCodec,
    /// When set, every embedded PNG is also written here.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub filename: String,
    pub png: Vec<u8>,
    pub bits_embedded: usize,
    pub capacity_bits: usize,
    pub archived_to: Option<PathBuf>,
}

pub fn embed_upload(
    ctx: &StegoContext,
    upload: &ImageUpload,
    message: &str,
) -> Result<EmbeddedImage, ApiError> {
    validate_upload(upload)?;
    if message.trim().is_empty() {
        return Err(ApiError::validation("Please provide both image and message"));
    }

    let cover = decode(upload)?;
    let embedded = ctx.codec.embed(&cover, message).map_err(stego_error)?;
    let png = stego::encode_png(&embedded.image).map_err(stego_error)?;
    let filename = output_filename(&upload.filename);

    let archived_to = match ctx.output_dir.as_deref() {
        Some(dir) => Some(archive_output(dir, &filename, &png).map_err(internal)?),
        None => None,
    };

    info!(
        source = %upload.filename,
        output = %filename,
        bits = embedded.bits_embedded,
        capacity_bits = embedded.capacity.bits,
        "message embedded"
    );
    Ok(EmbeddedImage {
        filename,
        png,
        bits_embedded: embedded.bits_embedded,
        capacity_bits: embedded.capacity.bits,
        archived_to,
    })
}

pub fn extract_upload(
    ctx: &StegoContext,
    upload: &ImageUpload,
) -> Result<ExtractResponse, ApiError> {
    validate_upload(upload)?;
    let image = decode(upload)?;
    let extraction = ctx.codec.extract(&image).map_err(stego_error)?;
    info!(
        source = %upload.filename,
        bits_scanned = extraction.bits_scanned,
        delimiter_found = extraction.delimiter_found,
        "message extracted"
    );
    Ok(ExtractResponse {
        message: extraction.message,
        delimiter_found: extraction.delimiter_found,
        bits_scanned: extraction.bits_scanned,
    })
}

pub fn capacity_upload(
    ctx: &StegoContext,
    upload: &ImageUpload,
) -> Result<CapacityResponse, ApiError> {
    validate_upload(upload)?;
    let image = decode(upload)?;
    let capacity = ctx.codec.capacity(&image);
    Ok(CapacityResponse {
        width: image.width(),
        height: image.height(),
        full_blocks: capacity.full_blocks,
        capacity_bits: capacity.bits,
        max_message_chars: capacity.max_message_chars(),
    })
}

/// `photo.jpg` becomes `embedded_photo.png`; output is always PNG. Quotes,
/// backslashes and control characters are dropped so the name can sit
/// inside a quoted `Content-Disposition` parameter.
pub fn output_filename(original: &str) -> String {
    let stem: String = Path::new(original.trim())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .chars()
        .filter(|ch| !ch.is_control() && *ch != '"' && *ch != '\\')
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        return "embedded_image.png".to_string();
    }
    format!("embedded_{stem}.png")
}

fn validate_upload(upload: &ImageUpload) -> Result<(), ApiError> {
    let name = upload.filename.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Please select an image file"));
    }
    if name.len() > MAX_FILENAME_BYTES {
        return Err(ApiError::validation("filename is too long"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ApiError::validation(
            "filename must not contain path separators",
        ));
    }
    if upload.bytes.is_empty() {
        return Err(ApiError::validation("image file is empty"));
    }
    Ok(())
}

fn decode(upload: &ImageUpload) -> Result<RgbImage, ApiError> {
    stego::decode_image(&upload.bytes).map_err(stego_error)
}

fn archive_output(dir: &Path, filename: &str, png: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    let path = dir.join(format!("{}_{filename}", Uuid::new_v4().simple()));
    fs::write(&path, png)
        .with_context(|| format!("failed to write embedded image '{}'", path.display()))?;
    Ok(path)
}

fn stego_error(err: StegoError) -> ApiError {
    match err {
        StegoError::NoHiddenMessage { .. } => ApiError::new(
            ErrorCode::NotFound,
            "No hidden message found in the image",
        ),
        StegoError::CoverRejected { .. } => ApiError::validation(err.to_string()),
        StegoError::Encode(_) => ApiError::internal(err.to_string()),
        other => ApiError::validation(other.to_string()),
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
