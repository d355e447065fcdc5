use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::error::SerialError;

/// Where to look for devices and how to phrase the generated rule.
/// The defaults describe USB-to-serial adaptors showing up as `ttyUSB*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sysfs class directory that interface names are resolved against.
    pub class_root: PathBuf,
    /// Subsystem of the ancestor carrying the serial number.
    pub ancestor_subsystem: String,
    /// Device type of the ancestor carrying the serial number.
    pub ancestor_devtype: String,
    /// Sysfs attribute holding the serial number.
    pub serial_attribute: String,
    /// Value of the `KERNEL==` match in the generated rule.
    pub rule_kernel: String,
    /// Value of the `SYMLINK+=` assignment in the generated rule.
    pub rule_symlink: String,
    /// Value of the `MODE=` assignment in the generated rule.
    pub rule_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_root: PathBuf::from("/sys/class/tty"),
            ancestor_subsystem: String::from("usb"),
            ancestor_devtype: String::from("usb_device"),
            serial_attribute: String::from("serial"),
            rule_kernel: String::from("ttyUSB?"),
            rule_symlink: String::from("ADAPTR"),
            rule_mode: String::from("0666"),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Class root: {}.\n\
            Ancestor filter: subsystem {}, devtype {}.\n\
            Serial attribute: {}.\n\
            Rule: KERNEL {}, SYMLINK {}, MODE {}.",
            self.class_root.display(),
            self.ancestor_subsystem,
            self.ancestor_devtype,
            self.serial_attribute,
            self.rule_kernel,
            self.rule_symlink,
            self.rule_mode,
        )
    }
}

impl Config {
    /// Read and parse a TOML config file. Missing keys take their default value.
    pub fn from_file(path: &Path) -> Result<Self, SerialError> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        toml::from_str(&contents).map_err(|source| SerialError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config at `path`. Without a path the defaults are used.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SerialError> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                log::info!("Opened config file {}", path.display());
                Ok(config)
            }
            None => {
                log::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Serialize config in TOML format.
    pub fn to_toml_string(&self) -> Result<String, SerialError> {
        Ok(toml::to_string_pretty(&self)?)
    }
}
