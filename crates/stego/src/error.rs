use thiserror::Error;

#[derive(Debug, Error)]
pub enum StegoError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("unsupported character {ch:?} at position {position}; only printable ASCII can be hidden")]
    UnsupportedCharacter { ch: char, position: usize },
    #[error("message must not contain the end marker \"###END###\"")]
    ContainsDelimiter,
    #[error("Message too long. Maximum capacity: {capacity_chars} characters, need: {required_chars}")]
    MessageTooLong {
        capacity_chars: usize,
        required_chars: usize,
    },
    #[error("this image cannot carry the message: the block at ({x}, {y}) loses bits when saved")]
    CoverRejected { x: u32, y: u32 },
    #[error("No hidden message found")]
    NoHiddenMessage { bits_scanned: usize },
    #[error("invalid embed step {0}; expected a positive finite number")]
    InvalidStep(f64),
    #[error("invalid extraction limit {0}; at least one byte must be scanned")]
    InvalidScanLimit(usize),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode png: {0}")]
    Encode(#[source] image::ImageError),
}
