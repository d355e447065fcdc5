use std::{io, process::exit};

use udev_serial_rs::app::execute;
use udev_serial_rs::cli::{locate_config, ProgramArgs};
use udev_serial_rs::config::Config;
use udev_serial_rs::device::UdevService;

/// Print the USB serial number of a tty device and a udev rule matching it.
fn main() {
    env_logger::init();

    let args = ProgramArgs::get();
    log::info!("Using arguments: {}", args);

    let config = match Config::load(locate_config().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            exit(1)
        }
    };
    log::info!("Using config:\n{}", config);

    let code = execute(
        &args,
        &config,
        UdevService::acquire,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    exit(code)
}
