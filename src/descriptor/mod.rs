//! GET_DESCRIPTOR dispatch.
//!
//! The USB stack hands us the descriptor class (high byte of `wValue`),
//! the sub-selector (low byte of `wValue`) and an index (`wIndex`, the
//! interface number for HID report requests). We answer with a borrowed
//! byte slice:
//!
//! - device, configuration: static blobs, unconditionally
//! - string: see [`strings`]
//! - HID report: position `index` in the report table
//!
//! Composed strings borrow the dispatcher's scratch buffer, so only one
//! descriptor can be outstanding at a time; the borrow checker enforces
//! that it is consumed before the next request.

pub mod buffer;
pub mod strings;
pub mod tables;

#[cfg(test)]
mod tests;

use crate::config::{MANUFACTURER, PRODUCT, SERIAL_NIBBLE_MODE};
use crate::error::{DescriptorError, NOT_SUPPORTED};
use crate::unique_id::{IdSource, NibbleMode};
use buffer::DescBuffer;

/// Descriptor classes this device answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DescriptorClass {
    Device = 0x01,
    Configuration = 0x02,
    String = 0x03,
    HidReport = 0x22,
}

impl TryFrom<u8> for DescriptorClass {
    type Error = DescriptorError;

    fn try_from(class: u8) -> Result<Self, Self::Error> {
        match class {
            0x01 => Ok(DescriptorClass::Device),
            0x02 => Ok(DescriptorClass::Configuration),
            0x03 => Ok(DescriptorClass::String),
            0x22 => Ok(DescriptorClass::HidReport),
            other => Err(DescriptorError::UnsupportedClass(other)),
        }
    }
}

/// One entry of the HID report table. The table position is the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportDescriptor {
    bytes: &'static [u8],
}

impl ReportDescriptor {
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }

    pub const fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The static descriptor data a [`Dispatcher`] serves.
#[derive(Clone, Copy, Debug)]
pub struct DescriptorSet<'a> {
    pub device: &'a [u8],
    pub configuration: &'a [u8],
    /// Language list, already in wire format; its first byte is its length.
    pub language: &'a [u8],
    /// Concatenated interface-name STRING descriptors.
    pub interface_strings: &'a [u8],
    pub reports: &'a [ReportDescriptor],
    pub manufacturer: &'a str,
    pub product: &'a str,
}

impl DescriptorSet<'static> {
    /// The tables compiled into this firmware.
    pub const DEFAULT: Self = Self {
        device: &tables::DEVICE_DESCRIPTOR,
        configuration: &tables::CONFIG_DESCRIPTOR,
        language: &tables::LANG_STRING_DESC,
        interface_strings: &tables::INTERFACE_STRING_DESC,
        reports: &tables::REPORT_DESCRIPTORS,
        manufacturer: MANUFACTURER,
        product: PRODUCT,
    };
}

impl Default for DescriptorSet<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Answers GET_DESCRIPTOR requests.
///
/// Owns the only scratch buffer; a returned descriptor stays valid until
/// the next call.
pub struct Dispatcher<'a, S> {
    set: DescriptorSet<'a>,
    id: S,
    mode: NibbleMode,
    scratch: DescBuffer,
}

impl<S: IdSource> Dispatcher<'static, S> {
    /// Dispatcher over the compiled-in tables.
    pub fn with_default_tables(id: S) -> Self {
        Self::new(DescriptorSet::DEFAULT, id)
    }
}

impl<'a, S: IdSource> Dispatcher<'a, S> {
    pub fn new(set: DescriptorSet<'a>, id: S) -> Self {
        Self {
            set,
            id,
            mode: SERIAL_NIBBLE_MODE,
            scratch: DescBuffer::new(),
        }
    }

    /// Override how the serial number renders identification bytes.
    pub fn with_nibble_mode(mut self, mode: NibbleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn descriptor_set(&self) -> &DescriptorSet<'a> {
        &self.set
    }

    /// Resolve a descriptor request.
    pub fn resolve(&mut self, class: u8, sub: u8, index: u8) -> Result<&[u8], DescriptorError> {
        let result = self.lookup(class, sub, index);
        if let Err(e) = &result {
            debug!("GET_DESCRIPTOR {:x} {} {} rejected: {}", class, sub, index, e);
        }
        result
    }

    fn lookup(&mut self, class: u8, sub: u8, index: u8) -> Result<&[u8], DescriptorError> {
        let desc = match DescriptorClass::try_from(class)? {
            DescriptorClass::Device => Ok(self.set.device),
            DescriptorClass::Configuration => Ok(self.set.configuration),
            DescriptorClass::String => {
                strings::resolve_string(sub, &self.set, &self.id, self.mode, &mut self.scratch)
            }
            DescriptorClass::HidReport => self
                .set
                .reports
                .get(index as usize)
                .map(ReportDescriptor::bytes)
                .ok_or(DescriptorError::ReportOutOfRange(index)),
        }?;

        // Lengths must stay below the sentinel to be reportable.
        if desc.len() >= NOT_SUPPORTED as usize {
            return Err(DescriptorError::TooLong(desc.len()));
        }
        Ok(desc)
    }

    /// Resolve a descriptor request, reporting failure the way the control
    /// pipe expects: an empty slice with length [`NOT_SUPPORTED`].
    pub fn resolve_raw(&mut self, class: u8, sub: u8, index: u8) -> (&[u8], u8) {
        match self.resolve(class, sub, index) {
            Ok(desc) => match u8::try_from(desc.len()) {
                Ok(len) => (desc, len),
                Err(_) => (&[], NOT_SUPPORTED),
            },
            Err(e) => (&[], e.sentinel()),
        }
    }
}
