//! Descriptor lookup errors.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! At the USB-stack boundary every variant collapses to the single
//! [`NOT_SUPPORTED`] length, which the control pipe turns into a STALL.

use core::fmt;

/// Length value reserved to mean "no such descriptor".
///
/// Real descriptors served by this device are always shorter than 0xFF.
pub const NOT_SUPPORTED: u8 = 0xFF;

/// Why a GET_DESCRIPTOR request could not be answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// Descriptor class byte is not device, configuration, string or HID report.
    UnsupportedClass(u8),

    /// String selector is outside every known selector range.
    UnsupportedString(u8),

    /// Interface-name index past the end of the interface string table.
    InterfaceOutOfRange(u8),

    /// HID report index past the end of the report table.
    ReportOutOfRange(u8),

    /// Interface string table contains a zero-length or truncated element.
    MalformedTable,

    /// String does not fit the composition buffer.
    BufferOverflow,

    /// String contains a byte outside 7-bit ASCII.
    NonAscii,

    /// Descriptor is too long for its length to be reported without
    /// colliding with [`NOT_SUPPORTED`].
    TooLong(usize),
}

impl DescriptorError {
    /// The wire-level sentinel for this error.
    ///
    /// Every variant maps to [`NOT_SUPPORTED`]: the control pipe only knows
    /// "stall", the variant itself is kept for logging.
    pub const fn sentinel(self) -> u8 {
        NOT_SUPPORTED
    }
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::UnsupportedClass(c) => write!(f, "unsupported descriptor class {c:#04x}"),
            DescriptorError::UnsupportedString(s) => write!(f, "unsupported string selector {s}"),
            DescriptorError::InterfaceOutOfRange(i) => write!(f, "interface string {i} out of range"),
            DescriptorError::ReportOutOfRange(i) => write!(f, "report descriptor {i} out of range"),
            DescriptorError::MalformedTable => f.write_str("malformed interface string table"),
            DescriptorError::BufferOverflow => f.write_str("string too long for descriptor buffer"),
            DescriptorError::NonAscii => f.write_str("string is not ASCII"),
            DescriptorError::TooLong(len) => write!(f, "descriptor of {len} bytes is too long"),
        }
    }
}
