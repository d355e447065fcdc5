//! In-memory device hierarchy for tests.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use super::{DeviceNode, DeviceService};
use crate::error::SerialError;

#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    devpath: String,
    sysname: String,
    aliases: Vec<PathBuf>,
    subsystem: Option<String>,
    devtype: Option<String>,
    driver: Option<String>,
    attributes: HashMap<String, String>,
    parent: Option<usize>,
}

impl FakeDevice {
    pub fn new(devpath: &str, sysname: &str) -> Self {
        Self {
            devpath: devpath.to_owned(),
            sysname: sysname.to_owned(),
            ..Default::default()
        }
    }

    /// Additional path the device can be looked up by, like a class symlink.
    pub fn syspath(mut self, path: &str) -> Self {
        self.aliases.push(PathBuf::from(path));
        self
    }

    pub fn subsystem(mut self, subsystem: &str, devtype: &str) -> Self {
        self.subsystem = Some(subsystem.to_owned());
        self.devtype = Some(devtype.to_owned());
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn driver(mut self, driver: &str) -> Self {
        self.driver = Some(driver.to_owned());
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeTree {
    devices: Vec<FakeDevice>,
}

impl FakeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, device: FakeDevice) -> usize {
        self.devices.push(device);
        self.devices.len() - 1
    }

    pub fn add_child(&mut self, parent: usize, mut device: FakeDevice) -> usize {
        device.parent = Some(parent);
        self.add(device)
    }

    pub fn into_service(self) -> FakeService {
        FakeService {
            tree: Rc::new(self),
        }
    }

    fn find(&self, syspath: &Path) -> Option<usize> {
        self.devices.iter().position(|device| {
            Path::new("/sys").join(device.devpath.trim_start_matches('/')) == syspath
                || device.aliases.iter().any(|alias| alias == syspath)
        })
    }
}

#[derive(Debug, Clone)]
pub struct FakeService {
    tree: Rc<FakeTree>,
}

impl DeviceService for FakeService {
    type Node = FakeNode;

    fn device_from_syspath(&self, syspath: &Path) -> Result<Self::Node, SerialError> {
        match self.tree.find(syspath) {
            Some(index) => Ok(FakeNode {
                tree: Rc::clone(&self.tree),
                index,
            }),
            None => Err(SerialError::DeviceNotFound {
                syspath: syspath.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    tree: Rc<FakeTree>,
    index: usize,
}

impl FakeNode {
    fn entry(&self) -> &FakeDevice {
        &self.tree.devices[self.index]
    }

    fn at(&self, index: usize) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            index,
        }
    }
}

impl DeviceNode for FakeNode {
    fn sysname(&self) -> String {
        self.entry().sysname.clone()
    }

    fn devpath(&self) -> String {
        self.entry().devpath.clone()
    }

    fn parent(&self) -> Option<Self> {
        self.entry().parent.map(|index| self.at(index))
    }

    fn parent_with_subsystem_devtype(&self, subsystem: &str, devtype: &str) -> Option<Self> {
        let mut current = self.parent();
        while let Some(node) = current {
            let entry = node.entry();
            if entry.subsystem.as_deref() == Some(subsystem)
                && entry.devtype.as_deref() == Some(devtype)
            {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.entry().attributes.get(name).cloned()
    }

    fn driver(&self) -> Option<String> {
        self.entry().driver.clone()
    }
}
