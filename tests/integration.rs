//! Integration tests for usbdesc host-testable logic.

use usbdesc::config::{STRING_DESCRIPTOR_INTERFACE_BASE, UNIQUE_ID_ADDR};
use usbdesc::descriptor::strings::interface_count;
use usbdesc::{
    descriptor_text, hex_serial, CachedId, DescriptorSet, Dispatcher, ImageId, NibbleMode,
    NOT_SUPPORTED,
};

/// A 16 KB code image with the identification bytes programmed.
fn code_image(id: [u8; 4]) -> [u8; 0x4000] {
    let mut image = [0xFFu8; 0x4000];
    image[UNIQUE_ID_ADDR..UNIQUE_ID_ADDR + 4].copy_from_slice(&id);
    image
}

#[test]
fn enumeration_sequence() {
    let image = code_image([0x1A, 0x2B, 0x3C, 0x4D]);
    let mut d = Dispatcher::with_default_tables(CachedId::new(ImageId::new(&image)));

    // Device descriptor, first 18 bytes.
    let (device, len) = d.resolve_raw(0x01, 0, 0);
    assert_eq!(len, 18);
    assert_eq!(device[1], 0x01);
    let (manufacturer_idx, product_idx, serial_idx) = (device[14], device[15], device[16]);

    // Full configuration.
    let (config, len) = d.resolve_raw(0x02, 0, 0);
    assert_eq!(len as usize, config.len());
    let interface_string_idx = config[9 + 8];

    let (lang, _) = d.resolve_raw(0x03, 0, 0);
    assert_eq!(lang, &[4, 0x03, 0x09, 0x04]);

    let text = descriptor_text(d.resolve_raw(0x03, manufacturer_idx, 0x09).0).unwrap();
    assert_eq!(text.as_str(), usbdesc::config::MANUFACTURER);

    let text = descriptor_text(d.resolve_raw(0x03, product_idx, 0x09).0).unwrap();
    assert_eq!(text.as_str(), usbdesc::config::PRODUCT);

    let (serial, len) = d.resolve_raw(0x03, serial_idx, 0x09);
    assert_eq!(len, 18);
    assert_eq!(descriptor_text(serial).unwrap().as_str(), "1A2B3C4D");

    assert_eq!(interface_string_idx, STRING_DESCRIPTOR_INTERFACE_BASE);
    let text = descriptor_text(d.resolve_raw(0x03, interface_string_idx, 0x09).0).unwrap();
    assert_eq!(text.as_str(), "Keyboard");

    // HID report descriptor for interface 0 starts with Usage Page (Generic Desktop).
    let (report, len) = d.resolve_raw(0x22, 0, 0);
    assert!(len > 0 && len < NOT_SUPPORTED);
    assert_eq!(&report[..4], &[0x05, 0x01, 0x09, 0x06]);
}

#[test]
fn serial_matches_bare_hex_serial() {
    let id = [0x00, 0x9A, 0xFE, 0x71];
    let image = code_image(id);
    for mode in [NibbleMode::Modulo15, NibbleMode::Masked] {
        let mut d = Dispatcher::with_default_tables(ImageId::new(&image)).with_nibble_mode(mode);
        let desc = d.resolve(0x03, 0x03, 0).unwrap();
        let text = descriptor_text(desc).unwrap();
        assert_eq!(text.as_str(), hex_serial(id, mode).as_str());
    }
}

#[test]
fn rejections_collapse_to_sentinel() {
    let image = code_image([0; 4]);
    let mut d = Dispatcher::with_default_tables(ImageId::new(&image));
    assert_eq!(d.resolve_raw(0x06, 0, 0).1, NOT_SUPPORTED); // device qualifier
    assert_eq!(d.resolve_raw(0x0F, 0, 0).1, NOT_SUPPORTED); // BOS
    assert_eq!(d.resolve_raw(0x03, 0xEE, 0).1, NOT_SUPPORTED); // MS OS string
    assert_eq!(d.resolve_raw(0x22, 0, 3).1, NOT_SUPPORTED);
}

#[test]
fn compiled_interface_table_is_well_formed() {
    let set = DescriptorSet::DEFAULT;
    assert_eq!(
        interface_count(set.interface_strings),
        Ok(usbdesc::config::INTERFACE_NAMES.len())
    );
    assert_eq!(set.reports.len(), usbdesc::config::INTERFACE_NAMES.len());
}
