//! Bit framing for hidden messages.
//!
//! A payload is the message followed by [`DELIMITER`], each byte written most
//! significant bit first. No length prefix is stored; the reader scans until
//! the delimiter shows up in the printable text it has decoded.

pub const DELIMITER: &str = "###END###";

pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// Number of payload bits needed for `message`.
pub fn payload_bits(message: &str) -> usize {
    (message.len() + DELIMITER.len()) * 8
}

pub fn encode_bits(message: &str) -> Vec<bool> {
    message
        .bytes()
        .chain(DELIMITER.bytes())
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// Incremental reader fed one bit at a time.
#[derive(Debug, Default)]
pub struct PayloadDecoder {
    current: u8,
    filled: u8,
    bits: usize,
    text: String,
}

impl PayloadDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the message once the delimiter has been completed.
    pub fn push_bit(&mut self, bit: bool) -> Option<String> {
        self.bits += 1;
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled < 8 {
            return None;
        }

        let byte = self.current;
        self.current = 0;
        self.filled = 0;
        if !is_printable(byte) {
            return None;
        }
        self.text.push(char::from(byte));
        self.text
            .strip_suffix(DELIMITER)
            .map(|message| message.to_string())
    }

    pub fn bits_read(&self) -> usize {
        self.bits
    }

    /// Printable text decoded so far, used when no delimiter was found.
    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
#[path = "tests/payload_tests.rs"]
mod tests;
