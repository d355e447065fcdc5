//! Our application errors.

use std::{io, path::PathBuf};
use thiserror::Error;

/// General error type.
///
/// The first three variants are the terminal failures of the reporter. Their
/// `Display` output is the exact diagnostic printed on stderr.
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Missing network interface name.\nexample: {0} eth0")]
    Usage(String),
    #[error("Cannot create udev context.")]
    ContextUnavailable(#[source] io::Error),
    #[error("Failed to get device.")]
    DeviceNotFound {
        syspath: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Device reference {0} is invalid ({1})")]
    InvalidIndex(String, &'static str),
    #[error("Device reference is not an integer. List available devices to get this value.")]
    IndexNotInteger(String),
    #[error("{} cannot be found", .0.display())]
    ClassRootMissing(PathBuf, #[source] io::Error),
    #[error("{0}")]
    IO(#[from] io::Error),
    #[error("Failed to parse config file {}:\n{source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config file:\n{0}")]
    SerializeConfig(#[from] toml::ser::Error),
    #[error("{0}")]
    Generic(#[from] anyhow::Error),
}
