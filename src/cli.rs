use const_format::formatcp;
use std::{fmt, path::PathBuf};

use crate::error::SerialError;

pub const CONFIG_NAME: &str = "config.toml";
pub const CONFIG_PREFIX: &str = "udev_serial";
pub const DEFAULT_CONFIG_PATH: &str = formatcp!("/etc/{}/{}", CONFIG_PREFIX, CONFIG_NAME);
const FALLBACK_PROGRAM: &str = "udev-serial";

/// Command line of the reporter: the program name and the interface to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramArgs {
    /// Name the program was invoked as, used in the usage message.
    program: String,
    /// Interface name like `ttyUSB0`. `None` if it was not given.
    interface: Option<String>,
}

impl fmt::Display for ProgramArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interface() {
            Some(interface) => write!(f, "Interface: {}", interface),
            None => write!(f, "Interface: (none)"),
        }
    }
}

impl ProgramArgs {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    /// Read the process arguments.
    pub fn get() -> Self {
        Self::from_args(std::env::args())
    }

    /// Parse an argument list whose first element is the program name.
    /// Anything after the interface name is ignored.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let program = args
            .next()
            .unwrap_or_else(|| String::from(FALLBACK_PROGRAM));
        let interface = args.next();

        for arg in args {
            log::warn!("Ignoring extra argument: {}", arg);
        }

        Self { program, interface }
    }
}

/// Find a config file following XDG conventions, then `/etc/udev_serial`.
/// `None` means the default config should be used.
pub fn locate_config() -> Option<PathBuf> {
    let config = match xdg::BaseDirectories::with_prefix(CONFIG_PREFIX) {
        // First try to find an existing file in XDG_CONFIG_HOME and then XDG_CONFIG_DIRS.
        Ok(xdg_dirs) => xdg_dirs.find_config_file(CONFIG_NAME),
        Err(e) => {
            log::warn!("Failed to access XDG directories: {:?}.", e);
            None
        }
    };

    config.or_else(|| {
        let config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if config_path.exists() {
            Some(config_path)
        } else {
            None
        }
    })
}

/// Path of the user's config file in `XDG_CONFIG_HOME`, the first place [`locate_config`] looks.
/// The file and its directory may not exist yet.
pub fn user_config_path() -> Result<PathBuf, SerialError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX).map_err(anyhow::Error::from)?;
    Ok(xdg_dirs.get_config_file(CONFIG_NAME))
}
