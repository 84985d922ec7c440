//! String descriptor resolution.
//!
//! Selector precedence:
//!
//! 1. language list (selector 0), served verbatim
//! 2. manufacturer, product: composed from literals
//! 3. serial: composed from identification bytes
//! 4. interface names: `STRING_DESCRIPTOR_INTERFACE_BASE..STRING_DESCRIPTOR_INTERFACE_END`,
//!    looked up in the pre-built interface string table
//!
//! Anything else is unsupported.

use heapless::String;

use super::buffer::DescBuffer;
use super::tables::STRING_TYPE;
use super::DescriptorSet;
use crate::config::{
    MAX_STRING_CHARS, STRING_DESCRIPTOR_INTERFACE_BASE, STRING_DESCRIPTOR_INTERFACE_END,
    STRING_DESCRIPTOR_LANG, STRING_DESCRIPTOR_MANUFACTURER, STRING_DESCRIPTOR_PRODUCT,
    STRING_DESCRIPTOR_SERIAL,
};
use crate::error::DescriptorError;
use crate::unique_id::{IdSource, NibbleMode};

/// What a string selector refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StringSelector {
    Language,
    Manufacturer,
    Product,
    Serial,
    /// Interface name, by position in the interface string table.
    Interface(u8),
}

impl TryFrom<u8> for StringSelector {
    type Error = DescriptorError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            STRING_DESCRIPTOR_LANG => Ok(StringSelector::Language),
            STRING_DESCRIPTOR_MANUFACTURER => Ok(StringSelector::Manufacturer),
            STRING_DESCRIPTOR_PRODUCT => Ok(StringSelector::Product),
            STRING_DESCRIPTOR_SERIAL => Ok(StringSelector::Serial),
            s if (STRING_DESCRIPTOR_INTERFACE_BASE..STRING_DESCRIPTOR_INTERFACE_END).contains(&s) => {
                Ok(StringSelector::Interface(s - STRING_DESCRIPTOR_INTERFACE_BASE))
            }
            s => Err(DescriptorError::UnsupportedString(s)),
        }
    }
}

/// Resolve a string selector to its wire-format descriptor.
///
/// Composed strings are written to `scratch`; the returned slice borrows
/// either `scratch` or the static tables in `set`.
pub fn resolve_string<'a, S: IdSource>(
    selector: u8,
    set: &DescriptorSet<'a>,
    id: &S,
    mode: NibbleMode,
    scratch: &'a mut DescBuffer,
) -> Result<&'a [u8], DescriptorError> {
    match StringSelector::try_from(selector)? {
        StringSelector::Language => language(set.language),
        StringSelector::Manufacturer => {
            scratch.compose_literal(set.manufacturer)?;
            Ok(scratch.as_bytes())
        }
        StringSelector::Product => {
            scratch.compose_literal(set.product)?;
            Ok(scratch.as_bytes())
        }
        StringSelector::Serial => {
            scratch.compose_serial(id.read_id_bytes(), mode);
            Ok(scratch.as_bytes())
        }
        StringSelector::Interface(index) => interface_string(set.interface_strings, index),
    }
}

/// The language list, trimmed to its own length byte.
fn language(table: &[u8]) -> Result<&[u8], DescriptorError> {
    let len = *table.first().ok_or(DescriptorError::MalformedTable)? as usize;
    table.get(..len).ok_or(DescriptorError::MalformedTable)
}

/// Walk a chain of length-prefixed STRING descriptors to element `index`.
///
/// Every step is bounds-checked against the table: an index past the last
/// element is `InterfaceOutOfRange`, and a zero-length or truncated
/// element is `MalformedTable`.
pub fn interface_string(table: &[u8], index: u8) -> Result<&[u8], DescriptorError> {
    let mut offset = 0usize;
    let mut remaining = index;
    loop {
        if offset >= table.len() {
            trace!("interface string {} past end of table", index);
            return Err(DescriptorError::InterfaceOutOfRange(index));
        }
        let len = table[offset] as usize;
        if len == 0 || offset + len > table.len() {
            warn!("malformed interface string element at offset {}", offset);
            return Err(DescriptorError::MalformedTable);
        }
        if remaining == 0 {
            return Ok(&table[offset..offset + len]);
        }
        offset += len;
        remaining -= 1;
    }
}

/// Number of elements in an interface string table, or `MalformedTable`
/// if the chain does not end exactly at the table end.
pub fn interface_count(table: &[u8]) -> Result<usize, DescriptorError> {
    let mut offset = 0usize;
    let mut count = 0;
    while offset < table.len() {
        let len = table[offset] as usize;
        if len == 0 || offset + len > table.len() {
            return Err(DescriptorError::MalformedTable);
        }
        offset += len;
        count += 1;
    }
    Ok(count)
}

/// Decode an ASCII STRING descriptor back to text.
///
/// Returns `None` if `desc` is not a STRING descriptor, its length byte
/// disagrees with the slice, or any code unit is outside ASCII.
pub fn descriptor_text(desc: &[u8]) -> Option<String<MAX_STRING_CHARS>> {
    if desc.len() < 2 || desc[0] as usize != desc.len() || desc[1] != STRING_TYPE {
        return None;
    }
    let payload = &desc[2..];
    if payload.len() % 2 != 0 {
        return None;
    }

    let mut text = String::new();
    for unit in payload.chunks_exact(2) {
        let c = u16::from_le_bytes([unit[0], unit[1]]);
        if c > 0x7F {
            return None;
        }
        text.push(c as u8 as char).ok()?;
    }
    Some(text)
}
