//! The reporter pipeline: acquire the udev session, resolve the device, print the report.

use std::io::Write;

use crate::{
    cli::ProgramArgs,
    config::Config,
    device::{self, DeviceService},
    error::SerialError,
    info::SerialDeviceInfo,
    report::Report,
};

/// Run the reporter and write the report to `out`.
///
/// Nothing is written to `out` unless the device resolved. The session is only
/// opened after the device path has been printed to `err`.
pub fn run<S, F>(
    args: &ProgramArgs,
    config: &Config,
    acquire: F,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), SerialError>
where
    S: DeviceService,
    F: FnOnce() -> Result<S, SerialError>,
{
    let interface = args
        .interface()
        .ok_or_else(|| SerialError::Usage(args.program().to_owned()))?;

    let syspath = device::syspath(&config.class_root, interface);
    writeln!(err, "Device Path: {}", syspath.display())?;

    let service = acquire()?;
    let device = device::resolve_device(&service, &config.class_root, interface)?;
    let usb_ancestor = device::find_ancestor(
        &device,
        &config.ancestor_subsystem,
        &config.ancestor_devtype,
    );

    if log::log_enabled!(log::Level::Debug) {
        let info = SerialDeviceInfo::read(usb_ancestor.as_ref(), &config.serial_attribute);
        log::debug!("Adaptor: {} (serial {})", info, info.serial_number);
    }

    let report = Report::build(&device, usb_ancestor.as_ref(), config);
    write!(out, "{}", report)?;
    out.flush()?;

    // Handles go before the session.
    drop(usb_ancestor);
    drop(device);
    drop(service);
    log::trace!("Released udev handles.");
    Ok(())
}

/// Run the reporter and turn the outcome into an exit code, printing the diagnostic on failure.
pub fn execute<S, F>(
    args: &ProgramArgs,
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
            log::debug!("{:?}", e);
            writeln!(err, "{}", e).ok();
            1
        }
    }
}
