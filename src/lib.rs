//! USB descriptor tables and GET_DESCRIPTOR dispatch for a fixed-layout
//! HID keyboard (keyboard + mouse + consumer control).
//!
//! Everything here is pure table lookup and byte composition, so it is
//! tested on the host (no embedded hardware required):
//!
//! Usage: `cargo test --lib` / `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and pulls the same tables from this library.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod descriptor;
pub mod error;
pub mod hid;
pub mod unique_id;

pub use descriptor::strings::{descriptor_text, StringSelector};
pub use descriptor::{DescriptorClass, DescriptorSet, Dispatcher, ReportDescriptor};
pub use error::{DescriptorError, NOT_SUPPORTED};
pub use unique_id::{hex_serial, CachedId, FixedId, IdSource, ImageId, NibbleMode};
