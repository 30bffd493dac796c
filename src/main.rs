//! Entry point for the **maynard** shell.
//!
//! Checks that the compositor offers everything the shell needs, then hands
//! the main thread to the GTK front-end.

use log::error;
use maynard::config::{config_dir, Config};
use maynard::handshake::{self, SHELL_GLOBALS};
use maynard::ini::ShellSettings;
use maynard::wayland::WaylandProbe;

/// Connect to the compositor and verify the required globals.  Exits the
/// process on failure.
fn check_compositor() {
    let mut probe = match WaylandProbe::connect() {
        Ok(p) => p,
        Err(e) => {
            error!("failed to get display: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = handshake::negotiate(&mut probe, &SHELL_GLOBALS) {
        error!("{}", e);
        std::process::exit(1);
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = Config::load_or_default(&config_dir().join("config.json"));
    let settings = ShellSettings::load(|key| std::env::var(key).ok());

    check_compositor();

    start_shell(config, settings);
}

#[cfg(feature = "shell-gtk")]
fn start_shell(config: Config, settings: ShellSettings) {
    let css_path = config_dir().join("style.css");
    maynard::ui::run_main_loop(config, settings, Some(css_path));
}

#[cfg(not(feature = "shell-gtk"))]
fn start_shell(_config: Config, _settings: ShellSettings) {
    error!("maynard was built without the `shell-gtk` feature, nothing to draw with");
    std::process::exit(1);
}
