//! USB device subsystem - presents the composite HID keyboard to the host.
//!
//! The nRF52840's USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`, which owns the control pipe and serialises the device
//! and configuration descriptors. This module feeds it the descriptor data
//! from the library:
//!
//! - manufacturer, product and the FICR-derived serial number
//! - one HID interface per entry of `HID_INTERFACES`, each naming its
//!   interface string (`STRING_DESCRIPTOR_INTERFACE_BASE + n`)
//! - a [`DescriptorHandler`] that answers interface-name strings and HID
//!   report descriptor requests through the [`Dispatcher`]

pub mod device;

use defmt::{debug, info};
use embassy_usb::control::{InResponse, OutResponse, Recipient, Request, RequestType};
use embassy_usb::types::StringIndex;
use heapless::String;
use usbdesc::config::{MAX_STRING_CHARS, UNIQUE_ID_LEN};
use usbdesc::unique_id::IdBytes;
use usbdesc::{descriptor_text, CachedId, DescriptorClass, Dispatcher, IdSource};

// HID class requests (HID 1.11, section 7.2).
const HID_REQ_SET_IDLE: u8 = 0x0A;
const HID_REQ_SET_PROTOCOL: u8 = 0x0B;

/// Identification bytes from the factory-programmed FICR DEVICEID
/// register (low word, least significant byte first).
pub struct FicrId;

impl IdSource for FicrId {
    fn read_id_bytes(&self) -> IdBytes {
        let word = embassy_nrf::pac::FICR.deviceid(0).read();
        let bytes = word.to_le_bytes();
        let mut id = [0u8; UNIQUE_ID_LEN];
        id.copy_from_slice(&bytes[..UNIQUE_ID_LEN]);
        id
    }
}

pub type DeviceDispatcher = Dispatcher<'static, CachedId<FicrId>>;

/// Answers the descriptor requests `embassy-usb` forwards: string indices
/// it did not allocate itself, and interface-recipient GET_DESCRIPTOR.
pub struct DescriptorHandler {
    dispatcher: DeviceDispatcher,
    text: String<MAX_STRING_CHARS>,
}

impl DescriptorHandler {
    pub fn new(dispatcher: DeviceDispatcher) -> Self {
        Self {
            dispatcher,
            text: String::new(),
        }
    }
}

impl embassy_usb::Handler for DescriptorHandler {
    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended: {}", suspended);
    }

    fn control_out(&mut self, req: Request, _data: &[u8]) -> Option<OutResponse> {
        if (req.request_type, req.recipient) != (RequestType::Class, Recipient::Interface) {
            return None;
        }
        match req.request {
            // Reports are only sent on change; idle rate and boot/report
            // protocol switches need no state here.
            HID_REQ_SET_IDLE | HID_REQ_SET_PROTOCOL => Some(OutResponse::Accepted),
            _ => None,
        }
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        if (req.request_type, req.recipient) != (RequestType::Standard, Recipient::Interface)
            || req.request != Request::GET_DESCRIPTOR
        {
            return None;
        }

        let class = (req.value >> 8) as u8;
        let sub = req.value as u8;
        let index = req.index as u8;
        match self.dispatcher.resolve(class, sub, index) {
            Ok(desc) => {
                let n = desc.len().min(buf.len()).min(req.length as usize);
                buf[..n].copy_from_slice(&desc[..n]);
                Some(InResponse::Accepted(&buf[..n]))
            }
            Err(e) => {
                debug!("interface descriptor {:x} for {} not served: {}", class, index, e);
                Some(InResponse::Rejected)
            }
        }
    }

    fn get_string(&mut self, index: StringIndex, _lang_id: u16) -> Option<&str> {
        let selector: u8 = index.into();
        match self
            .dispatcher
            .resolve(DescriptorClass::String as u8, selector, 0)
        {
            Ok(desc) => {
                self.text = descriptor_text(desc)?;
                Some(self.text.as_str())
            }
            Err(e) => {
                debug!("string {} not served: {}", selector, e);
                None
            }
        }
    }
}
