use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retrobox_core::{Emulator, Software};
use retrobox_lib::Settings;

use crate::error::CliError;
use crate::session::Session;

/// Show the current settings and where each location comes from.
pub(crate) fn run_config_show(session: &Session) {
    log::info!(
        "{}",
        "Retrobox Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if session.settings_path.exists() {
        log::info!(
            "  Settings file: {} {}",
            session.settings_path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            session.settings_path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Working path:  {}",
        session.working_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "  Simulation:    {}",
        if session.simulate { "on" } else { "off" }
    );
    log::info!("");

    let settings = &session.settings;
    print_location("pinup", settings.pinup_path());
    for emulator in Emulator::all() {
        print_location(emulator.id(), settings.emulator_path(*emulator));
    }
    for software in Software::all() {
        print_location(software.id(), settings.software_path(*software));
    }
}

fn print_location(name: &str, path: Option<&Path>) {
    match path {
        Some(path) if path.exists() => log::info!(
            "  {:<17} {}",
            name,
            path.display().if_supports_color(Stdout, |t| t.green()),
        ),
        Some(path) => log::info!(
            "  {:<17} {} {}",
            name,
            path.display().if_supports_color(Stdout, |t| t.yellow()),
            "(missing)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  {:<17} {}",
            name,
            "not set".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}

pub(crate) fn run_config_path(session: &Session) {
    println!("{}", session.settings_path.display());
}

/// Set or clear one location, then save the settings file.
pub(crate) fn run_config_set(
    session: &Session,
    name: &str,
    path: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut settings = session.settings.clone();
    apply_location(&mut settings, name, path.clone())?;
    settings.save_to(&session.settings_path)?;
    match path {
        Some(path) => log::info!("{} set to {}", name, path.display()),
        None => log::info!("{} cleared", name),
    }
    Ok(())
}

pub(crate) fn run_config_simulate(session: &Session, enabled: bool) -> Result<(), CliError> {
    let settings = Settings {
        simulated: enabled,
        ..session.settings.clone()
    };
    settings.save_to(&session.settings_path)?;
    log::info!("Simulation {} by default", if enabled { "on" } else { "off" });
    Ok(())
}

fn apply_location(
    settings: &mut Settings,
    name: &str,
    path: Option<PathBuf>,
) -> Result<(), CliError> {
    match name.trim().to_lowercase().as_str() {
        "working_path" | "working" => settings.working_path = path,
        "pinup" | "pinup_popper" => settings.pinup.path = path,
        other => {
            if let Ok(emulator) = other.parse::<Emulator>() {
                settings.set_emulator_path(emulator, path);
            } else if let Ok(software) = other.parse::<Software>() {
                settings.set_software_path(software, path);
            } else {
                return Err(CliError::config(format!("Unknown location '{name}'")));
            }
        }
    }
    Ok(())
}
