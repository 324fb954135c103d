use image::RgbImage;
use tracing::debug;

use crate::{
    dct::{self, Block, BLOCK_SIZE},
    error::StegoError,
    payload::{self, PayloadDecoder, DELIMITER},
};

/// Minimum coefficient magnitude written for each bit.
pub const STEP: f64 = 10.0;
pub const DEFAULT_MAX_EXTRACT_BITS: usize = 10_000;
pub const BITS_PER_BLOCK: usize = (BLOCK_SIZE - 1) * (BLOCK_SIZE - 1);

const BLUE: usize = 2;

type Pixels = [[u8; BLOCK_SIZE]; BLOCK_SIZE];

/// How far a block may drift from the cover to keep its bits, tried in order.
/// `Preserve` only enlarges carried coefficients; `MinimalMagnitude` writes
/// them at exactly `step`; `Flatten` also drops every other AC coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Preserve,
    MinimalMagnitude,
    Flatten,
}

const FITS: [Fit; 3] = [Fit::Preserve, Fit::MinimalMagnitude, Fit::Flatten];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub full_blocks: usize,
    /// Usable payload bits, bounded by the extraction scan limit.
    pub bits: usize,
}

impl Capacity {
    pub fn chars(&self) -> usize {
        self.bits / 8
    }

    pub fn max_message_chars(&self) -> usize {
        self.chars().saturating_sub(DELIMITER.len())
    }
}

#[derive(Debug, Clone)]
pub struct Embedded {
    pub image: RgbImage,
    pub bits_embedded: usize,
    pub capacity: Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub message: String,
    pub delimiter_found: bool,
    pub bits_scanned: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DctCodec {
    step: f64,
    max_extract_bits: usize,
}

impl Default for DctCodec {
    fn default() -> Self {
        Self {
            step: STEP,
            max_extract_bits: DEFAULT_MAX_EXTRACT_BITS,
        }
    }
}

impl DctCodec {
    pub fn new(step: f64, max_extract_bits: usize) -> Result<Self, StegoError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(StegoError::InvalidStep(step));
        }
        if max_extract_bits < 8 {
            return Err(StegoError::InvalidScanLimit(max_extract_bits));
        }
        Ok(Self {
            step,
            max_extract_bits,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn max_extract_bits(&self) -> usize {
        self.max_extract_bits
    }

    pub fn capacity(&self, image: &RgbImage) -> Capacity {
        let full_blocks = block_origins(image).count();
        Capacity {
            full_blocks,
            bits: (full_blocks * BITS_PER_BLOCK).min(self.max_extract_bits),
        }
    }

    pub fn embed(&self, image: &RgbImage, message: &str) -> Result<Embedded, StegoError> {
        validate_message(message)?;

        let bits = payload::encode_bits(message);
        let capacity = self.capacity(image);
        debug!(
            width = image.width(),
            height = image.height(),
            payload_bits = bits.len(),
            capacity_bits = capacity.bits,
            "embedding message"
        );
        if bits.len() > capacity.bits {
            return Err(StegoError::MessageTooLong {
                capacity_chars: capacity.chars(),
                required_chars: bits.len() / 8,
            });
        }

        let mut out = image.clone();
        for ((x0, y0), chunk) in block_origins(image).zip(bits.chunks(BITS_PER_BLOCK)) {
            let original = dct::forward(&read_block(&out, x0, y0));
            let pixels = self
                .fit_block(&original, chunk)
                .ok_or(StegoError::CoverRejected { x: x0, y: y0 })?;
            write_block(&mut out, x0, y0, &pixels);
        }

        debug!(bits_embedded = bits.len(), "message embedded");
        Ok(Embedded {
            image: out,
            bits_embedded: bits.len(),
            capacity,
        })
    }

    pub fn extract(&self, image: &RgbImage) -> Result<Extraction, StegoError> {
        let mut decoder = PayloadDecoder::new();

        'scan: for (x0, y0) in block_origins(image) {
            let coeffs = dct::forward(&read_block(image, x0, y0));
            for (u, v) in coefficient_positions() {
                if decoder.bits_read() >= self.max_extract_bits {
                    break 'scan;
                }
                if let Some(message) = decoder.push_bit(bit_of(coeffs[u][v])) {
                    debug!(bits_scanned = decoder.bits_read(), "end marker found");
                    return Ok(Extraction {
                        message,
                        delimiter_found: true,
                        bits_scanned: decoder.bits_read(),
                    });
                }
            }
        }

        let bits_scanned = decoder.bits_read();
        let text = decoder.into_text();
        debug!(bits_scanned, recovered = text.len(), "scan ended without end marker");
        if text.is_empty() {
            return Err(StegoError::NoHiddenMessage { bits_scanned });
        }
        Ok(Extraction {
            message: text,
            delimiter_found: false,
            bits_scanned,
        })
    }

    /// Finds pixel values for one block that read back as `bits`. The first
    /// fit that survives rounding and clamping wins.
    fn fit_block(&self, original: &Block, bits: &[bool]) -> Option<Pixels> {
        FITS.iter().find_map(|&fit| {
            let pixels = place(&self.target_coefficients(original, bits, fit));
            if !carries(&pixels, bits) {
                return None;
            }
            if fit != Fit::Preserve {
                debug!(?fit, "block needed a tighter fit");
            }
            Some(pixels)
        })
    }

    fn target_coefficients(&self, original: &Block, bits: &[bool], fit: Fit) -> Block {
        let mut coeffs = *original;
        if fit == Fit::Flatten {
            for (u, row) in coeffs.iter_mut().enumerate() {
                for (v, coeff) in row.iter_mut().enumerate() {
                    if u + v > 0 {
                        *coeff = 0.0;
                    }
                }
            }
        }
        for ((u, v), &bit) in coefficient_positions().zip(bits) {
            let magnitude = match fit {
                Fit::Preserve => original[u][v].abs().max(self.step),
                Fit::MinimalMagnitude | Fit::Flatten => self.step,
            };
            coeffs[u][v] = if bit { magnitude } else { -magnitude };
        }
        coeffs
    }
}

fn validate_message(message: &str) -> Result<(), StegoError> {
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }
    if let Some((position, ch)) = message
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii() || !payload::is_printable(*ch as u8))
    {
        return Err(StegoError::UnsupportedCharacter { ch, position });
    }
    if message.contains(DELIMITER) {
        return Err(StegoError::ContainsDelimiter);
    }
    Ok(())
}

/// Top-left corners of blocks lying entirely inside the image, row-major.
fn block_origins(image: &RgbImage) -> impl Iterator<Item = (u32, u32)> {
    let size = BLOCK_SIZE as u32;
    let cols = image.width() / size;
    let rows = image.height() / size;
    (0..rows).flat_map(move |row| (0..cols).map(move |col| (col * size, row * size)))
}

fn coefficient_positions() -> impl Iterator<Item = (usize, usize)> {
    (1..BLOCK_SIZE).flat_map(|u| (1..BLOCK_SIZE).map(move |v| (u, v)))
}

fn read_block(image: &RgbImage, x0: u32, y0: u32) -> Block {
    let mut block = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for (row, cells) in block.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = f64::from(image.get_pixel(x0 + col as u32, y0 + row as u32).0[BLUE]);
        }
    }
    block
}

fn write_block(image: &mut RgbImage, x0: u32, y0: u32, pixels: &Pixels) {
    for (row, values) in pixels.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            image.get_pixel_mut(x0 + col as u32, y0 + row as u32).0[BLUE] = *value;
        }
    }
}

/// Inverse transform, then moves the block's mean by the smallest amount
/// that keeps every value inside 0..=255. Blocks whose range is wider than
/// that are centred and clamped.
fn place(coeffs: &Block) -> Pixels {
    let spatial = dct::inverse(coeffs);
    let (lo, hi) = spatial
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let shift = if hi - lo <= 255.0 {
        0.0_f64.clamp(-lo, 255.0 - hi)
    } else {
        (255.0 - hi - lo) / 2.0
    };

    let mut pixels = [[0u8; BLOCK_SIZE]; BLOCK_SIZE];
    for (row, values) in pixels.iter_mut().zip(spatial.iter()) {
        for (pixel, value) in row.iter_mut().zip(values) {
            *pixel = (value + shift).round().clamp(0.0, 255.0) as u8;
        }
    }
    pixels
}

/// Reads the block back exactly as extraction will.
fn carries(pixels: &Pixels, bits: &[bool]) -> bool {
    let block = pixels.map(|row| row.map(f64::from));
    let coeffs = dct::forward(&block);
    coefficient_positions()
        .zip(bits)
        .all(|((u, v), &bit)| bit_of(coeffs[u][v]) == bit)
}

fn bit_of(coeff: f64) -> bool {
    coeff > 0.0
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
