//! HID report descriptors served on GET_DESCRIPTOR(0x22).
//!
//! One descriptor per HID interface, in interface-number order:
//!
//! - Interface 0: Keyboard (boot protocol)
//! - Interface 1: Mouse    (boot protocol)
//! - Interface 2: Consumer control

pub mod consumer;
pub mod keyboard;
pub mod mouse;

/// HID class descriptor type (0x21), embedded in the configuration descriptor.
pub const HID_DESCRIPTOR_TYPE: u8 = 0x21;

/// HID report descriptor type (0x22).
pub const REPORT_DESCRIPTOR_TYPE: u8 = 0x22;

/// HID class specification release 1.11 (BCD).
pub const HID_CLASS_RELEASE: u16 = 0x0111;
