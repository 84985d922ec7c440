//! STRING descriptor composition into an owned scratch buffer.
//!
//! Wire layout:
//! ```text
//! Byte 0: bLength (header included)
//! Byte 1: bDescriptorType (0x03)
//! Byte 2..: UTF-16LE code units, one per ASCII character (high byte 0)
//! ```
//!
//! The buffer keeps only the most recent composition. Every compose
//! overwrites it, and the slice handed out by [`DescBuffer::as_bytes`]
//! borrows the buffer, so a descriptor must be consumed before the next
//! one is composed.

use super::tables::STRING_TYPE;
use crate::config::{DESC_BUFFER_SIZE, MAX_STRING_CHARS};
use crate::error::DescriptorError;
use crate::unique_id::{IdBytes, NibbleMode};

/// Length of a composed serial-number descriptor: header + 8 UTF-16 digits.
pub const SERIAL_DESCRIPTOR_LEN: u8 = 2 + 4 * 2 * 2;

/// Scratch space for composed string descriptors.
#[derive(Clone, Debug)]
pub struct DescBuffer {
    buf: [u8; DESC_BUFFER_SIZE],
    len: u8,
}

impl Default for DescBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DescBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0; DESC_BUFFER_SIZE],
            len: 0,
        }
    }

    /// The most recently composed descriptor (empty before the first).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// Compose an ASCII literal as a STRING descriptor.
    ///
    /// Returns the descriptor length, `2 * s.len() + 2`. On error the
    /// previous contents are left untouched.
    pub fn compose_literal(&mut self, s: &str) -> Result<u8, DescriptorError> {
        let chars = s.as_bytes();
        if chars.len() > MAX_STRING_CHARS {
            warn!("string of {} chars exceeds descriptor buffer", chars.len());
            return Err(DescriptorError::BufferOverflow);
        }
        if !s.is_ascii() {
            return Err(DescriptorError::NonAscii);
        }

        let len = (2 * chars.len() + 2) as u8;
        self.buf[0] = len;
        self.buf[1] = STRING_TYPE;
        for (i, &c) in chars.iter().enumerate() {
            self.buf[2 * (i + 1)] = c;
            self.buf[2 * (i + 1) + 1] = 0x00;
        }
        self.len = len;
        Ok(len)
    }

    /// Compose the serial-number descriptor from identification bytes.
    ///
    /// Each byte becomes two hex digits, high nibble first, in ascending
    /// address order. Always returns [`SERIAL_DESCRIPTOR_LEN`].
    pub fn compose_serial(&mut self, id: IdBytes, mode: NibbleMode) -> u8 {
        let mut i = 1;
        self.buf[i] = STRING_TYPE;
        i += 1;

        for byte in id {
            for digit in mode.hex_pair(byte) {
                self.buf[i] = digit;
                self.buf[i + 1] = 0x00;
                i += 2;
            }
        }

        // Length goes in last, once the payload is complete.
        self.buf[0] = i as u8;
        self.len = i as u8;
        self.len
    }
}
