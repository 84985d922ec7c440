//! Firmware entry point (nRF52840).
//!
//! Brings up the external high-frequency clock required by USBD, then
//! hands the controller to the USB task. Descriptor data and the serial
//! number come from the `usbdesc` library.

#![no_std]
#![no_main]

mod usb;

use defmt::info;
use embassy_executor::Spawner;
use embassy_nrf::pac;
use embassy_usb::UsbDevice;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, usb::device::UsbDriver>) -> ! {
    usb::device::run_usb_device(device).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    info!("Enabling ext hfosc...");
    pac::CLOCK.tasks_hfclkstart().write_value(1);
    while pac::CLOCK.events_hfclkstarted().read() != 1 {}

    let usb = usb::device::init(p.USBD);
    spawner.must_spawn(usb_task(usb.device));

    // The endpoints must outlive enumeration; nothing is reported yet.
    let _endpoints = usb.endpoints;
    core::future::pending::<()>().await;
}
