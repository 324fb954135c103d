//! DCT-domain text steganography for RGB images.
//!
//! Bits are carried by the sign of the 49 AC coefficients `(1..8, 1..8)` of
//! each 8x8 block of the blue channel. Red and green are never touched.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

mod codec;
pub mod dct;
mod error;
pub mod payload;

pub use codec::{
    Capacity, DctCodec, Embedded, Extraction, BITS_PER_BLOCK, DEFAULT_MAX_EXTRACT_BITS, STEP,
};
pub use error::StegoError;
pub use payload::DELIMITER;

/// Decodes any supported container into 8-bit RGB; alpha is dropped.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, StegoError> {
    let decoded = image::load_from_memory(bytes).map_err(StegoError::Decode)?;
    Ok(decoded.to_rgb8())
}

/// Lossless output; any lossy re-encode would destroy the coefficient signs.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, StegoError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(StegoError::Encode)?;
    Ok(out.into_inner())
}
