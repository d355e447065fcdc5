use clap::Parser;
use std::{io, process::exit};

use udev_serial_rs::cli::locate_config;
use udev_serial_rs::config::Config;
use udev_serial_rs::device::UdevService;
use udev_serial_rs::list::{self, ListArgs};

fn main() {
    env_logger::init();

    let args = ListArgs::parse();
    log::info!("Using arguments: {:?}", args);

    let config = match Config::load(locate_config().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR {} -- exiting", e);
            exit(1)
        }
    };

    let code = list::execute(
        &args,
        &config,
        UdevService::acquire,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    exit(code)
}
