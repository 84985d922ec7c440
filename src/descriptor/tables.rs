//! Compiled descriptor tables.
//!
//! Everything here is built in `const` context from [`crate::config`] and
//! [`crate::hid`], so the tables live in flash and cannot drift from the
//! constants they are derived from.

use super::ReportDescriptor;
use crate::config::{
    INTERFACE_NAMES, LANGUAGE_ID, MAX_STRING_CHARS, STRING_DESCRIPTOR_INTERFACE_BASE,
    STRING_DESCRIPTOR_MANUFACTURER, STRING_DESCRIPTOR_PRODUCT, STRING_DESCRIPTOR_SERIAL,
    USB_DEVICE_RELEASE, USB_HID_POLL_MS, USB_MAX_PACKET_SIZE_0, USB_MAX_POWER, USB_PID, USB_VID,
};
use crate::hid::consumer::{CONSUMER_REPORT_DESCRIPTOR, CONSUMER_REPORT_SIZE};
use crate::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use crate::hid::mouse::{MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use crate::hid::{HID_CLASS_RELEASE, HID_DESCRIPTOR_TYPE, REPORT_DESCRIPTOR_TYPE};

/// Standard descriptor type codes.
pub const DEVICE_TYPE: u8 = 0x01;
pub const CONFIGURATION_TYPE: u8 = 0x02;
pub const STRING_TYPE: u8 = 0x03;
pub const INTERFACE_TYPE: u8 = 0x04;
pub const ENDPOINT_TYPE: u8 = 0x05;

pub const USB_CLASS_HID: u8 = 0x03;
const HID_SUBCLASS_NONE: u8 = 0x00;
const HID_SUBCLASS_BOOT: u8 = 0x01;
const HID_PROTOCOL_NONE: u8 = 0x00;
const HID_PROTOCOL_KEYBOARD: u8 = 0x01;
const HID_PROTOCOL_MOUSE: u8 = 0x02;
const ENDPOINT_INTERRUPT: u8 = 0x03;
const ENDPOINT_IN: u8 = 0x80;

const fn lsb(val: u16) -> u8 {
    val as u8
}

const fn msb(val: u16) -> u8 {
    (val >> 8) as u8
}

// Device

pub const DEVICE_DESCRIPTOR_LEN: usize = 18;

pub const DEVICE_DESCRIPTOR: [u8; DEVICE_DESCRIPTOR_LEN] = [
    DEVICE_DESCRIPTOR_LEN as u8,
    DEVICE_TYPE,
    lsb(0x0200), // bcdUSB 2.0
    msb(0x0200),
    0x00, // bDeviceClass (per interface)
    0x00, // bDeviceSubClass
    0x00, // bDeviceProtocol
    USB_MAX_PACKET_SIZE_0,
    lsb(USB_VID),
    msb(USB_VID),
    lsb(USB_PID),
    msb(USB_PID),
    lsb(USB_DEVICE_RELEASE),
    msb(USB_DEVICE_RELEASE),
    STRING_DESCRIPTOR_MANUFACTURER,
    STRING_DESCRIPTOR_PRODUCT,
    STRING_DESCRIPTOR_SERIAL,
    1, // bNumConfigurations
];

// Configuration
//
// Header followed by one (interface, HID, endpoint) block per interface.
// Interface `n` uses interrupt IN endpoint `n + 1` and string
// `STRING_DESCRIPTOR_INTERFACE_BASE + n`.

const CONFIG_HEADER_LEN: usize = 9;
const INTERFACE_BLOCK_LEN: usize = 9 + 9 + 7;
const NUM_INTERFACES: usize = 3;

/// HID class descriptor body: everything after bLength/bDescriptorType.
pub const HID_CLASS_DESCRIPTOR_BODY_LEN: usize = 7;

pub const CONFIG_DESCRIPTOR_LEN: usize = CONFIG_HEADER_LEN + NUM_INTERFACES * INTERFACE_BLOCK_LEN;

/// Layout of one HID interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HidInterface {
    pub subclass: u8,
    pub protocol: u8,
    pub report_descriptor: &'static [u8],
    /// Interrupt IN max packet size (one input report).
    pub max_packet: u8,
}

impl HidInterface {
    /// HID class descriptor body advertising this interface's report
    /// descriptor length.
    pub const fn hid_class_descriptor(&self) -> [u8; HID_CLASS_DESCRIPTOR_BODY_LEN] {
        let report_len = self.report_descriptor.len() as u16;
        [
            lsb(HID_CLASS_RELEASE),
            msb(HID_CLASS_RELEASE),
            0, // bCountryCode
            1, // bNumDescriptors
            REPORT_DESCRIPTOR_TYPE,
            lsb(report_len),
            msb(report_len),
        ]
    }
}

/// HID interfaces in interface-number order.
pub const HID_INTERFACES: [HidInterface; NUM_INTERFACES] = [
    HidInterface {
        subclass: HID_SUBCLASS_BOOT,
        protocol: HID_PROTOCOL_KEYBOARD,
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        max_packet: KEYBOARD_REPORT_SIZE,
    },
    HidInterface {
        subclass: HID_SUBCLASS_BOOT,
        protocol: HID_PROTOCOL_MOUSE,
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        max_packet: MOUSE_REPORT_SIZE,
    },
    HidInterface {
        subclass: HID_SUBCLASS_NONE,
        protocol: HID_PROTOCOL_NONE,
        report_descriptor: CONSUMER_REPORT_DESCRIPTOR,
        max_packet: CONSUMER_REPORT_SIZE,
    },
];

const fn interface_block(number: u8, iface: &HidInterface) -> [u8; INTERFACE_BLOCK_LEN] {
    let hid = iface.hid_class_descriptor();
    [
        // Interface
        9,
        INTERFACE_TYPE,
        number,
        0, // bAlternateSetting
        1, // bNumEndpoints
        USB_CLASS_HID,
        iface.subclass,
        iface.protocol,
        STRING_DESCRIPTOR_INTERFACE_BASE + number,
        // HID
        2 + HID_CLASS_DESCRIPTOR_BODY_LEN as u8,
        HID_DESCRIPTOR_TYPE,
        hid[0],
        hid[1],
        hid[2],
        hid[3],
        hid[4],
        hid[5],
        hid[6],
        // Endpoint
        7,
        ENDPOINT_TYPE,
        ENDPOINT_IN | (number + 1),
        ENDPOINT_INTERRUPT,
        iface.max_packet,
        0,
        USB_HID_POLL_MS,
    ]
}

const fn build_config_descriptor() -> [u8; CONFIG_DESCRIPTOR_LEN] {
    let header: [u8; CONFIG_HEADER_LEN] = [
        9,
        CONFIGURATION_TYPE,
        lsb(CONFIG_DESCRIPTOR_LEN as u16),
        msb(CONFIG_DESCRIPTOR_LEN as u16),
        NUM_INTERFACES as u8,
        1,    // bConfigurationValue
        0,    // iConfiguration
        0xA0, // bmAttributes: bus powered, remote wakeup
        USB_MAX_POWER,
    ];

    let mut out = [0u8; CONFIG_DESCRIPTOR_LEN];
    let mut i = 0;
    while i < CONFIG_HEADER_LEN {
        out[i] = header[i];
        i += 1;
    }
    let mut b = 0;
    while b < NUM_INTERFACES {
        let block = interface_block(b as u8, &HID_INTERFACES[b]);
        let mut j = 0;
        while j < INTERFACE_BLOCK_LEN {
            out[CONFIG_HEADER_LEN + b * INTERFACE_BLOCK_LEN + j] = block[j];
            j += 1;
        }
        b += 1;
    }
    out
}

pub const CONFIG_DESCRIPTOR: [u8; CONFIG_DESCRIPTOR_LEN] = build_config_descriptor();

// Strings

pub const LANG_STRING_DESC: [u8; 4] = [4, STRING_TYPE, lsb(LANGUAGE_ID), msb(LANGUAGE_ID)];

const fn interface_strings_len(names: &[&str]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < names.len() {
        total += 2 * names[i].len() + 2;
        i += 1;
    }
    total
}

pub const INTERFACE_STRING_DESC_LEN: usize = interface_strings_len(INTERFACE_NAMES);

/// Concatenated STRING descriptors, one per entry of [`INTERFACE_NAMES`].
const fn build_interface_strings() -> [u8; INTERFACE_STRING_DESC_LEN] {
    assert!(
        STRING_DESCRIPTOR_INTERFACE_BASE as usize + INTERFACE_NAMES.len() <= u8::MAX as usize,
        "interface string selectors overflow u8"
    );

    let mut out = [0u8; INTERFACE_STRING_DESC_LEN];
    let mut offset = 0;
    let mut n = 0;
    while n < INTERFACE_NAMES.len() {
        let name = INTERFACE_NAMES[n].as_bytes();
        assert!(!name.is_empty(), "interface name must not be empty");
        assert!(name.len() <= MAX_STRING_CHARS, "interface name too long");

        out[offset] = (2 * name.len() + 2) as u8;
        out[offset + 1] = STRING_TYPE;
        let mut c = 0;
        while c < name.len() {
            assert!(name[c].is_ascii(), "interface name must be ASCII");
            out[offset + 2 * (c + 1)] = name[c];
            out[offset + 2 * (c + 1) + 1] = 0;
            c += 1;
        }
        offset += 2 * name.len() + 2;
        n += 1;
    }
    out
}

pub const INTERFACE_STRING_DESC: [u8; INTERFACE_STRING_DESC_LEN] = build_interface_strings();

// HID reports, indexed by interface number

pub const REPORT_DESCRIPTORS: [ReportDescriptor; NUM_INTERFACES] = [
    ReportDescriptor::new(HID_INTERFACES[0].report_descriptor),
    ReportDescriptor::new(HID_INTERFACES[1].report_descriptor),
    ReportDescriptor::new(HID_INTERFACES[2].report_descriptor),
];
