//! Per-chip identification bytes and their hex rendering.
//!
//! The serial number string is derived from four bytes programmed into
//! identification memory at production time. Where those bytes come from
//! is abstracted behind [`IdSource`] so the descriptor logic can run on
//! the host against a fixed value.

use core::cell::Cell;

use heapless::String;

use crate::config::{UNIQUE_ID_ADDR, UNIQUE_ID_LEN};

/// Upper-case hex digit table.
const HEX_DIGITS: [u8; 16] = *b"0123456789ABCDEF";

/// Length of the bare ASCII serial number.
pub const SERIAL_LEN: usize = UNIQUE_ID_LEN * 2;

/// Raw identification bytes, lowest address first.
pub type IdBytes = [u8; UNIQUE_ID_LEN];

/// Read-only source of the device's identification bytes.
///
/// Implementations must be idempotent: the bytes are hardware-programmed
/// and never change during the lifetime of the process.
pub trait IdSource {
    fn read_id_bytes(&self) -> IdBytes;
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn read_id_bytes(&self) -> IdBytes {
        (**self).read_id_bytes()
    }
}

/// A constant identification value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedId(pub IdBytes);

impl IdSource for FixedId {
    fn read_id_bytes(&self) -> IdBytes {
        self.0
    }
}

/// Identification bytes stored at [`UNIQUE_ID_ADDR`] inside a code-memory
/// image.
///
/// Addresses beyond the end of the image read as erased flash (0xFF).
#[derive(Clone, Copy, Debug)]
pub struct ImageId<'a> {
    image: &'a [u8],
}

impl<'a> ImageId<'a> {
    pub const fn new(image: &'a [u8]) -> Self {
        Self { image }
    }
}

impl IdSource for ImageId<'_> {
    fn read_id_bytes(&self) -> IdBytes {
        let mut id = [0xFF; UNIQUE_ID_LEN];
        for (i, byte) in id.iter_mut().enumerate() {
            if let Some(&b) = self.image.get(UNIQUE_ID_ADDR + i) {
                *byte = b;
            }
        }
        id
    }
}

/// Reads the wrapped source once and replays the result.
pub struct CachedId<S> {
    source: S,
    cached: Cell<Option<IdBytes>>,
}

impl<S: IdSource> CachedId<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            cached: Cell::new(None),
        }
    }
}

impl<S: IdSource> IdSource for CachedId<S> {
    fn read_id_bytes(&self) -> IdBytes {
        if let Some(id) = self.cached.get() {
            return id;
        }
        let id = self.source.read_id_bytes();
        debug!("identification bytes: {=[u8]:x}", &id[..]);
        self.cached.set(Some(id));
        id
    }
}

/// How a 4-bit value is mapped onto the hex digit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NibbleMode {
    /// `nibble % 0xF`, as computed by the shipped firmware. Nibble 15
    /// renders as `'0'` rather than `'F'`.
    Modulo15,
    /// `nibble & 0xF`, the conventional hex rendering.
    Masked,
}

impl NibbleMode {
    /// ASCII hex digit for the low four bits of `nibble`.
    pub const fn digit(self, nibble: u8) -> u8 {
        let nibble = nibble & 0x0F;
        let index = match self {
            NibbleMode::Modulo15 => nibble % 0x0F,
            NibbleMode::Masked => nibble,
        };
        HEX_DIGITS[index as usize]
    }

    /// Two ASCII hex digits for `byte`, high nibble first.
    pub const fn hex_pair(self, byte: u8) -> [u8; 2] {
        [self.digit(byte >> 4), self.digit(byte)]
    }
}

/// Render identification bytes as the bare ASCII serial number
/// (eight hex digits, lowest address first).
pub fn hex_serial(id: IdBytes, mode: NibbleMode) -> String<SERIAL_LEN> {
    let mut serial = String::new();
    for digit in id.iter().flat_map(|&byte| mode.hex_pair(byte)) {
        if serial.push(digit as char).is_err() {
            warn!("serial number truncated at {} digits", serial.len());
            break;
        }
    }
    serial
}
