//! USB HID composite device - keyboard, mouse, consumer control.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral. Interfaces are laid out from `HID_INTERFACES`, the same
//! table the compiled configuration descriptor is built from, so interface
//! numbers, string indices and report lengths agree with the library.

use defmt::{assert_eq, info};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::{Builder, Config, UsbDevice};
use heapless::String;
use static_cell::StaticCell;
use usbdesc::config::{
    self, MANUFACTURER, PRODUCT, SERIAL_NIBBLE_MODE, STRING_DESCRIPTOR_INTERFACE_BASE,
    USB_HID_POLL_MS, USB_MAX_PACKET_SIZE_0,
};
use usbdesc::descriptor::tables::{HidInterface, HID_INTERFACES, USB_CLASS_HID};
use usbdesc::hid::HID_DESCRIPTOR_TYPE;
use usbdesc::unique_id::SERIAL_LEN;
use usbdesc::{hex_serial, CachedId, Dispatcher, IdSource};

use super::{DescriptorHandler, FicrId};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
pub type HidEndpoint = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;

static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_SERIAL: StaticCell<String<SERIAL_LEN>> = StaticCell::new();
static USB_HANDLER: StaticCell<DescriptorHandler> = StaticCell::new();

/// Build result containing the USB device runner and the interrupt IN
/// endpoints, in interface order (keyboard, mouse, consumer).
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub endpoints: [HidEndpoint; 3],
}

/// Add one HID interface, named by the next string index.
fn add_hid_interface(
    builder: &mut Builder<'static, UsbDriver>,
    number: usize,
    hid: &HidInterface,
) -> HidEndpoint {
    let name = builder.string();
    assert_eq!(u8::from(name), STRING_DESCRIPTOR_INTERFACE_BASE + number as u8);

    let mut func = builder.function(USB_CLASS_HID, hid.subclass, hid.protocol);
    let mut iface = func.interface();
    assert_eq!(u8::from(iface.interface_number()), number as u8);

    let mut alt = iface.alt_setting(USB_CLASS_HID, hid.subclass, hid.protocol, Some(name));
    alt.descriptor(HID_DESCRIPTOR_TYPE, &hid.hid_class_descriptor());
    alt.endpoint_interrupt_in(hid.max_packet as u16, USB_HID_POLL_MS)
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let id = CachedId::new(FicrId);
    let serial: &'static String<SERIAL_LEN> =
        USB_SERIAL.init(hex_serial(id.read_id_bytes(), SERIAL_NIBBLE_MODE));
    info!("USB serial number {}", serial.as_str());

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(MANUFACTURER);
    usb_config.product = Some(PRODUCT);
    usb_config.serial_number = Some(serial.as_str());
    usb_config.device_release = config::USB_DEVICE_RELEASE;
    usb_config.max_power = config::USB_MAX_POWER as u16 * 2; // mA
    usb_config.max_packet_size_0 = USB_MAX_PACKET_SIZE_0;
    usb_config.supports_remote_wakeup = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let handler = USB_HANDLER.init(DescriptorHandler::new(Dispatcher::with_default_tables(id)));
    builder.handler(handler);

    let endpoints = [
        add_hid_interface(&mut builder, 0, &HID_INTERFACES[0]),
        add_hid_interface(&mut builder, 1, &HID_INTERFACES[1]),
        add_hid_interface(&mut builder, 2, &HID_INTERFACES[2]),
    ];

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + mouse + consumer)");

    UsbHidDevice { device, endpoints }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles enumeration (including every GET_DESCRIPTOR request),
/// suspend/resume and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}
