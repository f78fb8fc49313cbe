use std::path::{Path, PathBuf};

use clap::Parser;

use retrobox_core::{Action, Category, Component, Emulator, Platform, RowColor, Software, Status};
use retrobox_engine::Row;
use retrobox_engine::rows::{read_rows, write_rows};
use retrobox_lib::Settings;

use crate::cli_types::{Cli, Commands, ConfigAction, SelectionArgs};
use crate::commands::config::{run_config_set, run_config_simulate};
use crate::commands::rows::run_select;
use crate::error::CliError;
use crate::session::{Session, selection};

fn session(dir: &Path) -> Session {
    Session {
        settings_path: dir.join("settings.toml"),
        settings: Settings::default(),
        working_path: dir.join("work"),
        simulate: false,
        quiet: true,
    }
}

fn tables_install() -> SelectionArgs {
    SelectionArgs {
        category: Category::Tables,
        action: Action::Install,
        emulator: Some(Emulator::VisualPinballX),
        platform: None,
        software: None,
    }
}

#[test]
fn test_parse_execute() {
    let cli = Cli::try_parse_from([
        "retrobox",
        "--simulate",
        "execute",
        "-c",
        "games",
        "-a",
        "install",
        "-p",
        "megadrive",
        "-s",
        "batocera",
        "--ids",
        "Sonic,Streets_of_Rage",
        "--components",
        "rom,media",
    ])
    .unwrap();
    assert!(cli.simulate);
    let Commands::Execute {
        selection,
        ids,
        components,
        native_platform,
        ..
    } = cli.command
    else {
        panic!("expected execute");
    };
    assert_eq!(selection.category, Category::Games);
    assert_eq!(selection.platform, Some(Platform::SegaMegadrive));
    assert_eq!(selection.software, Some(Software::Batocera));
    assert_eq!(
        ids,
        Some(vec!["Sonic".to_string(), "Streets_of_Rage".to_string()])
    );
    assert_eq!(components, vec![Component::Rom, Component::Media]);
    assert_eq!(native_platform, None);
}

#[test]
fn test_parse_rejects_unknown_category() {
    assert!(Cli::try_parse_from(["retrobox", "refresh", "-c", "wheels", "-a", "install"]).is_err());
}

#[test]
fn test_parse_config_simulate() {
    let cli = Cli::try_parse_from(["retrobox", "config", "simulate", "true"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Simulate { enabled: true }
        }
    ));
}

#[test]
fn test_selection_checks_action() {
    let mut args = tables_install();
    let built = selection(&args).unwrap();
    assert_eq!(built.emulator, Some(Emulator::VisualPinballX));

    args.category = Category::PinupDatabase;
    args.action = Action::Copy;
    assert!(matches!(selection(&args), Err(CliError::Selection(_))));
}

#[test]
fn test_select_marks_rows() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    let ctx = session.context(selection(&tables_install()).unwrap());
    let path = ctx.refresh_rows_path();
    write_rows(
        &path,
        &[
            Row::new("AFM", "Attack from Mars")
                .with(Component::EmulatorTable, Status::Absent)
                .colored(),
            Row::new("MM", "Medieval Madness")
                .with(Component::EmulatorTable, Status::Present)
                .colored(),
        ],
    )
    .unwrap();

    run_select(&session, &tables_install(), &[], false, true, false).unwrap();
    let rows = read_rows(&path).unwrap();
    let selected: Vec<&str> = rows
        .iter()
        .filter(|r| r.selected)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(selected, vec!["AFM"]);
    assert_eq!(rows[0].color, RowColor::Red);

    run_select(&session, &tables_install(), &["MM".to_string()], false, false, true).unwrap();
    let rows = read_rows(&path).unwrap();
    let selected: Vec<&str> = rows
        .iter()
        .filter(|r| r.selected)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(selected, vec!["MM"]);
}

#[test]
fn test_config_set_and_simulate() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    run_config_set(&session, "batocera", Some(PathBuf::from("/userdata"))).unwrap();
    let saved = Settings::load_from(&session.settings_path);
    assert_eq!(saved.software_path(Software::Batocera), Some(Path::new("/userdata")));

    let session = Session {
        settings: saved,
        ..session
    };
    run_config_simulate(&session, true).unwrap();
    let saved = Settings::load_from(&session.settings_path);
    assert!(saved.simulated);
    assert_eq!(saved.software_path(Software::Batocera), Some(Path::new("/userdata")));
}
