//! Human-readable description of a USB-to-serial adaptor.

use std::fmt;

use crate::{
    config::Config,
    device::{self, DeviceNode, DeviceService},
};

const UNKNOWN: &str = "UNKNOWN";

/// Identification read from the USB device an adaptor hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialDeviceInfo {
    pub serial_number: String,
    pub product_type: String,
    pub vendor_name: String,
}

impl Default for SerialDeviceInfo {
    fn default() -> Self {
        Self {
            serial_number: String::from(UNKNOWN),
            product_type: String::from(UNKNOWN),
            vendor_name: String::from(UNKNOWN),
        }
    }
}

impl SerialDeviceInfo {
    /// Read the info off the USB ancestor. Fields that are not set stay `UNKNOWN`.
    pub fn read<N: DeviceNode>(usb_ancestor: Option<&N>, serial_attribute: &str) -> Self {
        let mut info = Self::default();
        let Some(usb) = usb_ancestor else {
            return info;
        };

        if let Some(serial) = usb.attribute(serial_attribute) {
            info.serial_number = serial;
        }
        if let Some(product) = usb.attribute("product") {
            info.product_type = product.trim().to_owned();
        }
        // Not every device names its vendor, fall back to the numeric id.
        if let Some(vendor) = usb.attribute("manufacturer") {
            info.vendor_name = vendor.trim().to_owned();
        } else if let Some(id) = usb.attribute("idVendor") {
            info.vendor_name = format!("0x{}", id.trim());
        }
        info
    }
}

/// Look up the adaptor behind interface `name`. Devices that do not resolve are all `UNKNOWN`.
pub fn describe_device<S: DeviceService>(
    service: &S,
    config: &Config,
    name: &str,
) -> SerialDeviceInfo {
    let syspath = device::syspath(&config.class_root, name);
    match device::resolve_device(service, &config.class_root, name) {
        Ok(device) => {
            let usb_ancestor = device::find_ancestor(
                &device,
                &config.ancestor_subsystem,
                &config.ancestor_devtype,
            );
            SerialDeviceInfo::read(usb_ancestor.as_ref(), &config.serial_attribute)
        }
        Err(e) => {
            log::warn!("Cannot describe {}: {}", syspath.display(), e);
            SerialDeviceInfo::default()
        }
    }
}

impl fmt::Display for SerialDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.product_type, self.vendor_name)
    }
}
