//! Listing of connected USB-to-serial adaptors.
//!
//! `/dev/ttyUSB*` nodes can linger after a device is gone, but the entries in
//! the tty class directory only exist while a device is connected, so that is
//! what gets scanned.

use std::{
    fs,
    io::{self, Write},
    num::NonZeroUsize,
    path::Path,
};

use clap::Parser;

use crate::{
    config::Config,
    device::DeviceService,
    error::SerialError,
    info::{describe_device, SerialDeviceInfo},
};

pub const DEVICE_PATH: &str = "/dev/";
const PREFIXES: [&str; 2] = ["ttyUSB", "ttyACM"];

/// Names of the connected adaptors below `class_root`, sorted.
pub fn connected_devices(class_root: &Path) -> Result<Vec<String>, SerialError> {
    let entries = fs::read_dir(class_root)
        .map_err(|e| SerialError::ClassRootMissing(class_root.to_path_buf(), e))?;

    let mut devices = Vec::new();
    for entry in entries {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            devices.push(name);
        }
    }
    devices.sort();
    log::debug!("Connected devices: {:?}", devices);
    Ok(devices)
}

/// Parse a device index given on the command line. Indices start at 1.
pub fn device_index(arg: &str) -> Result<NonZeroUsize, SerialError> {
    if arg.starts_with('-') {
        return Err(SerialError::InvalidIndex(arg.to_owned(), "negative integer"));
    }
    let index: usize = arg
        .parse()
        .map_err(|_| SerialError::IndexNotInteger(arg.to_owned()))?;
    NonZeroUsize::new(index).ok_or_else(|| SerialError::InvalidIndex(arg.to_owned(), "zero"))
}

/// List connected USB-to-serial adaptors.
///
/// With one adaptor connected its path is printed on stdout, e.g. `minicom -D $(tty-list)`.
/// With several, they are listed on stderr; call again with the index of the one to use.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tty-list", version)]
pub struct ListArgs {
    /// Index of an adaptor in the listing.
    #[arg(allow_negative_numbers = true)]
    pub index: Option<String>,
    /// Show product and vendor even if only one adaptor is connected.
    #[arg(short, long)]
    pub info: bool,
}

/// What the user asked to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// 1-based index into the listing.
    pub index: Option<NonZeroUsize>,
    /// Always print the table, even for a single device.
    pub show_info: bool,
}

/// Print the path of the selected device to `out`, or the table of devices to `err`.
///
/// `out` only ever receives a single path so the result can be used in a
/// command substitution like `minicom -D $(tty-list 2)`.
pub fn show_devices<F>(
    devices: &[String],
    selection: Selection,
    describe: F,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()>
where
    F: Fn(&str) -> SerialDeviceInfo,
{
    if devices.is_empty() {
        return writeln!(err, "No connected devices");
    }

    if devices.len() == 1 && !selection.show_info {
        if let Some(index) = selection.index.filter(|index| index.get() != 1) {
            writeln!(err, "WARNING {} is out of range (1)", index)?;
        }
        return writeln!(out, "{}{}", DEVICE_PATH, devices[0]);
    }

    let mut index = selection.index;
    if let Some(i) = index.filter(|i| i.get() > devices.len()) {
        writeln!(err, "WARNING {} is out of range (1-{})", i, devices.len())?;
        index = None;
    }

    if let Some(i) = index {
        if !selection.show_info {
            return writeln!(out, "{}{}", DEVICE_PATH, devices[i.get() - 1]);
        }
    }

    for (count, device) in (1..).zip(devices.iter().map(String::as_str)) {
        match index {
            None => writeln!(
                err,
                "{}. {}{}\t\t{}",
                count,
                DEVICE_PATH,
                device,
                describe(device)
            )?,
            Some(i) if i.get() == count => {
                writeln!(err, "{}{}\t\t{}", DEVICE_PATH, device, describe(device))?;
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Validate the arguments, scan for adaptors and show them.
///
/// Adaptors are still listed if the udev session cannot be opened, just without a description.
pub fn run<S, F>(
    args: &ListArgs,
    config: &Config,
    acquire: F,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), SerialError>
where
    S: DeviceService,
    F: FnOnce() -> Result<S, SerialError>,
{
    let selection = Selection {
        index: args.index.as_deref().map(device_index).transpose()?,
        show_info: args.info,
    };
    let devices = connected_devices(&config.class_root)?;

    let service = acquire().map_err(|e| log::warn!("{}", e)).ok();
    let describe = |name: &str| match &service {
        Some(service) => describe_device(service, config, name),
        None => SerialDeviceInfo::default(),
    };

    show_devices(&devices, selection, describe, out, err)?;
    Ok(())
}

/// Run the listing and turn the outcome into an exit code.
/// A missing class directory exits with 2, every other failure with 1.
pub fn execute<S, F>(
    args: &ListArgs,
    config: &Config,
    acquire: F,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32
where
    S: DeviceService,
    F: FnOnce() -> Result<S, SerialError>,
{
    match run(args, config, acquire, out, err) {
        Ok(()) => 0,
        Err(e) => {
            writeln!(err, "ERROR {} -- exiting", e).ok();
            match e {
                SerialError::ClassRootMissing(..) => 2,
                _ => 1,
            }
        }
    }
}
