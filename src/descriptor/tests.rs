//! Unit tests for descriptor dispatch.
//!
//! These run on the host against the compiled-in tables and a fixed
//! identification value.

use super::tables::{
    CONFIG_DESCRIPTOR, DEVICE_DESCRIPTOR, INTERFACE_STRING_DESC, LANG_STRING_DESC,
    REPORT_DESCRIPTORS,
};
use super::{DescriptorClass, DescriptorSet, Dispatcher, ReportDescriptor};
use crate::config::{
    INTERFACE_NAMES, MANUFACTURER, PRODUCT, STRING_DESCRIPTOR_INTERFACE_BASE,
    STRING_DESCRIPTOR_INTERFACE_END,
};
use crate::error::{DescriptorError, NOT_SUPPORTED};
use crate::unique_id::{FixedId, NibbleMode};

const ID: FixedId = FixedId([0x1A, 0x2B, 0x3C, 0x4D]);

fn dispatcher() -> Dispatcher<'static, FixedId> {
    Dispatcher::with_default_tables(ID)
}

fn string_units(desc: &[u8]) -> heapless::Vec<u8, 32> {
    desc[2..].chunks_exact(2).map(|c| c[0]).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Class routing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn class_codes() {
    assert_eq!(DescriptorClass::try_from(0x01), Ok(DescriptorClass::Device));
    assert_eq!(DescriptorClass::try_from(0x22), Ok(DescriptorClass::HidReport));
    assert_eq!(
        DescriptorClass::try_from(0x21),
        Err(DescriptorError::UnsupportedClass(0x21))
    );
    assert_eq!(DescriptorClass::String as u8, 0x03);
}

#[test]
fn device_and_config_are_unconditional() {
    let mut d = dispatcher();
    for (sub, index) in [(0, 0), (7, 200), (0xFF, 0xFF)] {
        assert_eq!(d.resolve(1, sub, index), Ok(&DEVICE_DESCRIPTOR[..]));
        assert_eq!(d.resolve(2, sub, index), Ok(&CONFIG_DESCRIPTOR[..]));
    }
}

#[test]
fn unknown_classes_return_sentinel() {
    let mut d = dispatcher();
    for class in 0..=u8::MAX {
        if matches!(class, 0x01 | 0x02 | 0x03 | 0x22) {
            continue;
        }
        assert_eq!(d.resolve(class, 0, 0), Err(DescriptorError::UnsupportedClass(class)));
        let (desc, len) = d.resolve_raw(class, 0, 0);
        assert!(desc.is_empty());
        assert_eq!(len, NOT_SUPPORTED);
    }
}

#[test]
fn raw_length_matches_slice() {
    let mut d = dispatcher();
    let (desc, len) = d.resolve_raw(1, 0, 0);
    assert_eq!(len as usize, desc.len());
    assert_eq!(len, 18);
}

// ═══════════════════════════════════════════════════════════════════════════
// Strings
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn language_list_verbatim() {
    let mut d = dispatcher();
    assert_eq!(d.resolve(3, 0, 0), Ok(&LANG_STRING_DESC[..]));
    assert_eq!(d.resolve_raw(3, 0, 0).1, LANG_STRING_DESC[0]);
}

#[test]
fn manufacturer_and_product_are_composed() {
    let mut d = dispatcher();

    let desc = d.resolve(3, 1, 0).unwrap();
    assert_eq!(desc[0] as usize, 2 * MANUFACTURER.len() + 2);
    assert_eq!(desc[1], 0x03);
    assert_eq!(&string_units(desc)[..], MANUFACTURER.as_bytes());

    let desc = d.resolve(3, 2, 0).unwrap();
    assert_eq!(desc[0] as usize, 2 * PRODUCT.len() + 2);
    assert_eq!(&string_units(desc)[..], PRODUCT.as_bytes());
}

#[test]
fn serial_from_identification_bytes() {
    let mut d = dispatcher();
    let desc = d.resolve(3, 3, 0).unwrap();
    assert_eq!(desc.len(), 18);
    assert_eq!(desc[0], 18);
    assert_eq!(desc[1], 0x03);
    assert_eq!(&string_units(desc)[..], b"1A2B3C4D");
}

#[test]
fn serial_nibble_15_is_pinned() {
    let mut d = Dispatcher::with_default_tables(FixedId([0xF1, 0x2F, 0x00, 0xFF]));
    assert_eq!(&string_units(d.resolve(3, 3, 0).unwrap())[..], b"01200000");

    let mut d = Dispatcher::with_default_tables(FixedId([0xF1, 0x2F, 0x00, 0xFF]))
        .with_nibble_mode(NibbleMode::Masked);
    assert_eq!(&string_units(d.resolve(3, 3, 0).unwrap())[..], b"F12F00FF");
}

#[test]
fn interface_names_by_offset() {
    let mut d = dispatcher();
    for (k, name) in INTERFACE_NAMES.iter().enumerate() {
        let desc = d.resolve(3, STRING_DESCRIPTOR_INTERFACE_BASE + k as u8, 0).unwrap();
        assert_eq!(desc[0] as usize, desc.len());
        assert_eq!(&string_units(desc)[..], name.as_bytes());
    }
}

#[test]
fn interface_descriptor_points_into_table() {
    let mut d = dispatcher();
    let table = d.descriptor_set().interface_strings;
    let desc = d.resolve(3, STRING_DESCRIPTOR_INTERFACE_BASE + 1, 0).unwrap();
    let offset = desc.as_ptr() as usize - table.as_ptr() as usize;
    assert_eq!(offset, INTERFACE_STRING_DESC[0] as usize);
    assert_eq!(desc, &table[offset..offset + desc.len()]);
}

#[test]
fn interface_selector_past_table_is_rejected() {
    let mut d = dispatcher();
    assert_eq!(
        d.resolve(3, STRING_DESCRIPTOR_INTERFACE_END, 0),
        Err(DescriptorError::UnsupportedString(STRING_DESCRIPTOR_INTERFACE_END))
    );
    assert_eq!(d.resolve_raw(3, 0xFE, 0).1, NOT_SUPPORTED);
}

#[test]
fn interface_range_larger_than_table() {
    // Selector range reserves three interfaces but the table only holds one.
    let table = [4, 0x03, b'K', 0];
    let set = DescriptorSet {
        interface_strings: &table,
        ..DescriptorSet::DEFAULT
    };
    let mut d = Dispatcher::new(set, ID);
    assert_eq!(
        d.resolve(3, STRING_DESCRIPTOR_INTERFACE_BASE, 0),
        Ok(&table[..])
    );
    assert_eq!(
        d.resolve(3, STRING_DESCRIPTOR_INTERFACE_BASE + 1, 0),
        Err(DescriptorError::InterfaceOutOfRange(1))
    );
    assert_eq!(d.resolve_raw(3, STRING_DESCRIPTOR_INTERFACE_BASE + 2, 0).1, NOT_SUPPORTED);
}

#[test]
fn oversized_product_is_rejected() {
    let set = DescriptorSet {
        product: "This product name is far too long to fit",
        ..DescriptorSet::DEFAULT
    };
    let mut d = Dispatcher::new(set, ID);
    assert_eq!(d.resolve(3, 2, 0), Err(DescriptorError::BufferOverflow));
    assert_eq!(d.resolve_raw(3, 2, 0).1, NOT_SUPPORTED);
}

#[test]
fn unknown_string_selectors() {
    let mut d = dispatcher();
    for sub in STRING_DESCRIPTOR_INTERFACE_END..=u8::MAX {
        assert_eq!(d.resolve(3, sub, 0), Err(DescriptorError::UnsupportedString(sub)));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HID reports
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn report_descriptors_by_index() {
    let mut d = dispatcher();
    for (i, report) in REPORT_DESCRIPTORS.iter().enumerate() {
        let (desc, len) = d.resolve_raw(0x22, 0, i as u8);
        assert_eq!(desc, report.bytes());
        assert_eq!(len as usize, report.len());
    }
}

#[test]
fn report_index_out_of_range() {
    let mut d = dispatcher();
    let count = REPORT_DESCRIPTORS.len() as u8;
    for idx in count..=u8::MAX {
        assert_eq!(d.resolve(0x22, 0, idx), Err(DescriptorError::ReportOutOfRange(idx)));
    }
    assert_eq!(d.resolve_raw(0x22, 0, count).1, NOT_SUPPORTED);
}

#[test]
fn report_index_ignores_sub_selector() {
    let mut d = dispatcher();
    assert_eq!(d.resolve(0x22, 9, 1), Ok(REPORT_DESCRIPTORS[1].bytes()));
}

#[test]
fn empty_report_table() {
    static NONE: [ReportDescriptor; 0] = [];
    let set = DescriptorSet {
        reports: &NONE,
        ..DescriptorSet::DEFAULT
    };
    let mut d = Dispatcher::new(set, ID);
    assert_eq!(d.resolve(0x22, 0, 0), Err(DescriptorError::ReportOutOfRange(0)));
}

#[test]
fn oversized_report_never_reports_sentinel_length() {
    static LONG_255: [u8; 255] = [0x05; 255];
    static LONG_300: [u8; 300] = [0x05; 300];
    static LONGEST_OK: [u8; 254] = [0x05; 254];
    static REPORTS: [ReportDescriptor; 3] = [
        ReportDescriptor::new(&LONG_255),
        ReportDescriptor::new(&LONG_300),
        ReportDescriptor::new(&LONGEST_OK),
    ];
    let set = DescriptorSet {
        reports: &REPORTS,
        ..DescriptorSet::DEFAULT
    };
    let mut d = Dispatcher::new(set, ID);

    assert_eq!(d.resolve(0x22, 0, 0), Err(DescriptorError::TooLong(255)));
    assert_eq!(d.resolve(0x22, 0, 1), Err(DescriptorError::TooLong(300)));

    let (desc, len) = d.resolve_raw(0x22, 0, 0);
    assert!(desc.is_empty());
    assert_eq!(len, NOT_SUPPORTED);

    let (desc, len) = d.resolve_raw(0x22, 0, 1);
    assert!(desc.is_empty());
    assert_eq!(len, NOT_SUPPORTED);

    let (desc, len) = d.resolve_raw(0x22, 0, 2);
    assert_eq!(desc.len(), 254);
    assert_eq!(len, 254);
}

#[test]
fn oversized_configuration_is_rejected() {
    static CONFIG: [u8; 256] = [0x09; 256];
    let set = DescriptorSet {
        configuration: &CONFIG,
        ..DescriptorSet::DEFAULT
    };
    let mut d = Dispatcher::new(set, ID);
    assert_eq!(d.resolve(2, 0, 0), Err(DescriptorError::TooLong(256)));
    assert_eq!(d.resolve_raw(2, 0, 0).1, NOT_SUPPORTED);
}

// ═══════════════════════════════════════════════════════════════════════════
// Scratch buffer reuse
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn last_composed_wins() {
    let mut d = dispatcher();
    let manufacturer: heapless::Vec<u8, 64> = d.resolve(3, 1, 0).unwrap().iter().copied().collect();
    let serial = d.resolve(3, 3, 0).unwrap();
    assert_eq!(serial.len(), 18);
    assert_ne!(&manufacturer[..], serial);
}

#[test]
fn failures_leave_dispatcher_usable() {
    let mut d = dispatcher();
    assert!(d.resolve(0x99, 0, 0).is_err());
    assert!(d.resolve(0x22, 0, 0xFF).is_err());
    assert!(d.resolve(3, 0xFF, 0).is_err());
    assert_eq!(d.resolve(3, 3, 0).map(<[u8]>::len), Ok(18));
}
