//! Access to the device hierarchy kept by udev.
//!
//! The reporter only needs a handful of reads, so the udev session and its
//! device handles sit behind [`DeviceService`] and [`DeviceNode`]. Handles hold
//! a reference on their session, so a session is never torn down while one of
//! its handles is alive. Dropping the handles before the session releases
//! everything in reverse order of acquisition.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use crate::error::SerialError;

#[cfg(test)]
pub(crate) mod fake;

/// One node in the device hierarchy.
pub trait DeviceNode: Sized {
    /// Kernel name of the device, e.g. `ttyUSB0`.
    fn sysname(&self) -> String;
    /// Path of the device below `/sys`, e.g. `/devices/.../ttyUSB0`.
    fn devpath(&self) -> String;
    /// The immediate parent, if the node is not a root.
    fn parent(&self) -> Option<Self>;
    /// Nearest ancestor that belongs to `subsystem` and has device type `devtype`.
    fn parent_with_subsystem_devtype(&self, subsystem: &str, devtype: &str) -> Option<Self>;
    /// Value of a sysfs attribute. `None` if the attribute is not set, which is not the same as empty.
    fn attribute(&self, name: &str) -> Option<String>;
    /// Name of the bound driver. `None` if no driver is bound.
    fn driver(&self) -> Option<String>;
}

/// An open session with the device-information service.
pub trait DeviceService {
    type Node: DeviceNode;

    /// Look up the device at an absolute sysfs path.
    fn device_from_syspath(&self, syspath: &Path) -> Result<Self::Node, SerialError>;
}

/// Build the sysfs path of an interface below the class root.
/// An empty name still gives a well-formed path, it just won't resolve.
pub fn syspath(class_root: &Path, interface_name: &str) -> PathBuf {
    PathBuf::from(format!("{}/{}", class_root.display(), interface_name))
}

/// Resolve interface `interface_name` below the class root.
///
/// udev happily opens the class directory itself, so an empty name is turned
/// away here instead of resolving to `/sys/class/tty`.
pub fn resolve_device<S: DeviceService>(
    service: &S,
    class_root: &Path,
    interface_name: &str,
) -> Result<S::Node, SerialError> {
    let syspath = syspath(class_root, interface_name);
    if interface_name.is_empty() {
        return Err(SerialError::DeviceNotFound {
            syspath,
            source: io::Error::new(io::ErrorKind::NotFound, "empty interface name"),
        });
    }
    resolve_syspath(service, &syspath)
}

/// Resolve the device at `syspath`.
pub fn resolve_syspath<S: DeviceService>(
    service: &S,
    syspath: &Path,
) -> Result<S::Node, SerialError> {
    let device = service.device_from_syspath(syspath)?;
    log::info!(
        "Resolved {} to device {}",
        syspath.display(),
        device.devpath()
    );
    Ok(device)
}

/// Find the nearest ancestor of `device` matching the filter.
/// Not finding one is a normal outcome for devices that are not attached through that bus.
pub fn find_ancestor<N: DeviceNode>(device: &N, subsystem: &str, devtype: &str) -> Option<N> {
    let ancestor = device.parent_with_subsystem_devtype(subsystem, devtype);
    match &ancestor {
        Some(ancestor) => log::debug!(
            "Found {}/{} ancestor {}",
            subsystem,
            devtype,
            ancestor.devpath()
        ),
        None => log::debug!(
            "No {}/{} ancestor above {}",
            subsystem,
            devtype,
            device.devpath()
        ),
    }
    ancestor
}

fn lossy(s: &OsStr) -> String {
    s.to_string_lossy().into_owned()
}

/// A session with the system's udev.
pub struct UdevService {
    udev: udev::Udev,
}

impl UdevService {
    /// Open the udev session.
    pub fn acquire() -> Result<Self, SerialError> {
        log::trace!("Entering UdevService::acquire.");
        let udev = udev::Udev::new().map_err(SerialError::ContextUnavailable)?;
        log::info!("Created udev context.");
        Ok(Self { udev })
    }
}

impl DeviceService for UdevService {
    type Node = udev::Device;

    fn device_from_syspath(&self, syspath: &Path) -> Result<Self::Node, SerialError> {
        udev::Device::from_syspath_with_context(self.udev.clone(), syspath).map_err(|source| {
            SerialError::DeviceNotFound {
                syspath: syspath.to_path_buf(),
                source,
            }
        })
    }
}

impl DeviceNode for udev::Device {
    fn sysname(&self) -> String {
        lossy(udev::Device::sysname(self))
    }

    fn devpath(&self) -> String {
        lossy(udev::Device::devpath(self))
    }

    fn parent(&self) -> Option<Self> {
        udev::Device::parent(self)
    }

    fn parent_with_subsystem_devtype(&self, subsystem: &str, devtype: &str) -> Option<Self> {
        // udev reports a missing ancestor as an error, we treat it as absent.
        udev::Device::parent_with_subsystem_devtype(self, subsystem, devtype)
            .unwrap_or_else(|e| {
                log::debug!("Ancestor lookup failed: {}", e);
                None
            })
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attribute_value(name).map(lossy)
    }

    fn driver(&self) -> Option<String> {
        udev::Device::driver(self).map(lossy)
    }
}
