//! The report printed for a resolved device.

use std::fmt;

use crate::{config::Config, device::DeviceNode};

/// Fields read off a device and its USB ancestor, plus the rule derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sysname: String,
    pub devpath: String,
    /// `None` if there is no USB ancestor or it has no serial attribute.
    pub serial: Option<String>,
    /// Driver of the ancestor's parent. `None` only if that parent does not exist.
    pub driver: Option<String>,
    pub rule: String,
}

impl Report {
    /// Read the report fields. A missing ancestor leaves serial and driver empty.
    pub fn build<N: DeviceNode>(device: &N, usb_ancestor: Option<&N>, config: &Config) -> Self {
        let serial = usb_ancestor.and_then(|ancestor| ancestor.attribute(&config.serial_attribute));

        // The driver line depends on the parent existing, not on a driver being bound.
        let driver = usb_ancestor
            .and_then(|ancestor| ancestor.parent())
            .map(|parent| parent.driver().unwrap_or_default());

        let rule = udev_rule(serial.as_deref().unwrap_or_default(), config);

        Self {
            sysname: device.sysname(),
            devpath: device.devpath(),
            serial,
            driver,
            rule,
        }
    }
}

/// Format a udev rule matching on `serial`.
///
/// The serial number is inserted verbatim. A value containing `"` produces a
/// broken rule; escaping it would change the output for the values that work today.
pub fn udev_rule(serial: &str, config: &Config) -> String {
    format!(
        "KERNEL==\"{}\", ATTRS{{{}}}==\"{}\", SYMLINK+=\"{}\", MODE=\"{}\"",
        config.rule_kernel, config.serial_attribute, serial, config.rule_symlink, config.rule_mode
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "I: DEVNAME={}", self.sysname)?;
        writeln!(f, "I: DEVPATH={}", self.devpath)?;
        writeln!(f, "I: SERIAL #={}", self.serial.as_deref().unwrap_or_default())?;
        if let Some(driver) = &self.driver {
            writeln!(f, "I: DRIVER={}", driver)?;
        }
        writeln!(f, "I: OUTPUT={}", self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::{FakeDevice, FakeNode, FakeTree};
    use crate::device::{DeviceNode, DeviceService};
    use std::path::Path;

    fn lookup(tree: FakeTree, syspath: &str) -> FakeNode {
        tree.into_service()
            .device_from_syspath(Path::new(syspath))
            .unwrap()
    }

    #[test]
    fn test_rule() {
        assert_eq!(
            "KERNEL==\"ttyUSB?\", ATTRS{serial}==\"AB12CD34\", SYMLINK+=\"ADAPTR\", MODE=\"0666\"",
            udev_rule("AB12CD34", &Config::default())
        );
    }

    #[test]
    fn test_rule_does_not_escape() {
        assert_eq!(
            "KERNEL==\"ttyUSB?\", ATTRS{serial}==\"a\"b\", SYMLINK+=\"ADAPTR\", MODE=\"0666\"",
            udev_rule("a\"b", &Config::default())
        );
    }

    #[test]
    fn test_without_ancestor() {
        let mut tree = FakeTree::new();
        tree.add(FakeDevice::new("/devices/virtual/tty/ttyS0", "ttyS0"));
        let device = lookup(tree, "/sys/devices/virtual/tty/ttyS0");

        let report = Report::build(&device, None, &Config::default());
        assert_eq!(None, report.serial);
        assert_eq!(None, report.driver);
        assert_eq!(
            "I: DEVNAME=ttyS0\n\
             I: DEVPATH=/devices/virtual/tty/ttyS0\n\
             I: SERIAL #=\n\
             I: OUTPUT=KERNEL==\"ttyUSB?\", ATTRS{serial}==\"\", SYMLINK+=\"ADAPTR\", MODE=\"0666\"\n",
            report.to_string()
        );
    }

    #[test]
    fn test_ancestor_without_parent_or_serial() {
        let mut tree = FakeTree::new();
        let root =
            tree.add(FakeDevice::new("/devices/usb1", "usb1").subsystem("usb", "usb_device"));
        tree.add_child(root, FakeDevice::new("/devices/usb1/ttyUSB0", "ttyUSB0"));
        let device = lookup(tree, "/sys/devices/usb1/ttyUSB0");
        let ancestor = device.parent_with_subsystem_devtype("usb", "usb_device");

        let report = Report::build(&device, ancestor.as_ref(), &Config::default());
        assert_eq!(None, report.serial);
        assert_eq!(None, report.driver);
        assert!(!report.to_string().contains("DRIVER"));
    }

    #[test]
    fn test_parent_without_driver_prints_empty_line() {
        let mut tree = FakeTree::new();
        let root = tree.add(FakeDevice::new("/devices/usb1", "usb1"));
        let adaptor = tree.add_child(
            root,
            FakeDevice::new("/devices/usb1/1-1", "1-1")
                .subsystem("usb", "usb_device")
                .attribute("serial", ""),
        );
        tree.add_child(adaptor, FakeDevice::new("/devices/usb1/1-1/ttyUSB0", "ttyUSB0"));
        let device = lookup(tree, "/sys/devices/usb1/1-1/ttyUSB0");
        let ancestor = device.parent_with_subsystem_devtype("usb", "usb_device");

        let report = Report::build(&device, ancestor.as_ref(), &Config::default());
        assert_eq!(Some(String::new()), report.serial);
        assert_eq!(Some(String::new()), report.driver);
        assert_eq!(1, report.to_string().matches("I: DRIVER=\n").count());
    }
}
