use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retrobox_core::{Action, Category, Platform, Software};
use retrobox_frontend::{ManagerKind, PlatformMappings};
use retrobox_lib::Selection;

use crate::error::CliError;
use crate::session::Session;

pub(crate) fn run_list_categories() {
    log::info!("Categories:");
    for category in Category::all() {
        let actions: Vec<&str> = category.actions().iter().map(Action::id).collect();
        log::info!(
            "  {} [{}]",
            category.id().if_supports_color(Stdout, |t| t.bold()),
            actions.join(", ").if_supports_color(Stdout, |t| t.cyan()),
        );
    }
}

/// Canonical platforms, or with a software, the platforms that have a
/// folder in its install.
pub(crate) fn run_list_platforms(
    session: &Session,
    software: Option<Software>,
) -> Result<(), CliError> {
    let platforms = match software {
        Some(software) => {
            let manager = manager(session, software)?;
            log::info!(
                "Platforms installed in {}:",
                software.if_supports_color(Stdout, |t| t.bold())
            );
            manager.list_platforms()?
        }
        None => {
            log::info!("Supported platforms:");
            Platform::all().to_vec()
        }
    };
    for platform in platforms {
        log::info!(
            "  {} [{}]",
            platform.short_name().if_supports_color(Stdout, |t| t.bold()),
            platform.display_name().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

pub(crate) fn run_list_games(
    session: &Session,
    software: Software,
    platform: Platform,
) -> Result<(), CliError> {
    let manager = manager(session, software)?;
    let games = manager.list_games_with_rom(platform)?;
    log::info!(
        "{} games for {} in {}:",
        games.len(),
        platform.if_supports_color(Stdout, |t| t.bold()),
        software.if_supports_color(Stdout, |t| t.bold()),
    );
    for (rom, name) in &games {
        log::info!("  {} ({})", name, rom.if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

fn manager(session: &Session, software: Software) -> Result<ManagerKind, CliError> {
    let ctx =
        session.context(Selection::new(Category::Games, Action::Export).with_software(software));
    let mappings = PlatformMappings::load(&ctx.platforms_path())?;
    Ok(ManagerKind::from_settings(software, &ctx.settings, &mappings)?)
}
