use std::{fs, io::Write};

use anyhow::Context;
use udev_serial_rs::{cli::user_config_path, config::Config};

/// Write the default config to the user's config directory, where the tools look for it.
fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let config = Config::default();
    log::info!("Default config:\n{}", config);
    let s = config.to_toml_string()?;

    let path = user_config_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    f.write_all(s.as_bytes())?;
    println!("{}", path.display());
    Ok(())
}
