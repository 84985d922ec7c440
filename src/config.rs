//! Device-wide constants and compile-time configuration.
//!
//! USB identity, string selector layout and identification-memory
//! parameters live here so they can be tuned in one place.

use crate::unique_id::NibbleMode;

// USB identity

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// Device release number (BCD).
pub const USB_DEVICE_RELEASE: u16 = 0x0100;

/// USB device strings.
pub const MANUFACTURER: &str = "Lotlab";
pub const PRODUCT: &str = "HID Keyboard";

/// Maximum bus current, in 2 mA units. 50 = 100 mA.
pub const USB_MAX_POWER: u8 = 50;

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

/// Control endpoint 0 packet size.
pub const USB_MAX_PACKET_SIZE_0: u8 = 64;

// String descriptor selectors

pub const STRING_DESCRIPTOR_LANG: u8 = 0;
pub const STRING_DESCRIPTOR_MANUFACTURER: u8 = 1;
pub const STRING_DESCRIPTOR_PRODUCT: u8 = 2;
pub const STRING_DESCRIPTOR_SERIAL: u8 = 3;

/// First interface-name selector. Selector `INTERFACE_BASE + k` names
/// interface `k`.
pub const STRING_DESCRIPTOR_INTERFACE_BASE: u8 = 4;

/// Interface names, in interface-number order.
pub const INTERFACE_NAMES: &[&str] = &["Keyboard", "Mouse", "Consumer Control"];

/// One past the last interface-name selector.
pub const STRING_DESCRIPTOR_INTERFACE_END: u8 =
    STRING_DESCRIPTOR_INTERFACE_BASE + INTERFACE_NAMES.len() as u8;

/// Supported string language (English, United States).
pub const LANGUAGE_ID: u16 = 0x0409;

// Composition

/// Capacity of the string-descriptor scratch buffer.
pub const DESC_BUFFER_SIZE: usize = 64;

/// Longest ASCII string that fits the scratch buffer as a descriptor.
pub const MAX_STRING_CHARS: usize = (DESC_BUFFER_SIZE - 2) / 2;

// Identification memory
//
// The last four bytes of the 16 KB code region are programmed with a
// per-chip value during production.

/// Address of the first identification byte in code memory.
pub const UNIQUE_ID_ADDR: usize = 0x3FFC;

/// Number of identification bytes.
pub const UNIQUE_ID_LEN: usize = 4;

/// Hex digit extraction used for the serial number string.
///
/// Shipped devices derived their serial with `% 0xF`; changing this
/// changes the serial hosts see for any chip with an `F` nibble.
pub const SERIAL_NIBBLE_MODE: NibbleMode = NibbleMode::Modulo15;
