use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the message to hide.
pub const MESSAGE_FIELD: &str = "message";

pub const EMBEDDED_BITS_HEADER: &str = "x-stego-embedded-bits";
pub const CAPACITY_BITS_HEADER: &str = "x-stego-capacity-bits";

pub fn embed_route() -> &'static str {
    "/embed"
}

pub fn extract_route() -> &'static str {
    "/extract"
}

pub fn capacity_route() -> &'static str {
    "/capacity"
}

pub fn theme_css_route() -> &'static str {
    "/theme.css"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub message: String,
    /// False when the scan ran out of bits before the end marker appeared.
    pub delimiter_found: bool,
    pub bits_scanned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResponse {
    pub width: u32,
    pub height: u32,
    pub full_blocks: usize,
    pub capacity_bits: usize,
    /// Characters available to the caller, end marker already subtracted.
    pub max_message_chars: usize,
}
