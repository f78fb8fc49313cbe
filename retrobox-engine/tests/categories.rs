//! PinUP database, config bundle and game round trips.

use std::fs;
use std::path::Path;

use retrobox_core::{Action, Category, Component, Emulator, Platform, RowColor, Software, Status};
use retrobox_db::{count_rows, open_memory};
use retrobox_engine::{ExecuteOptions, NoLookup, Services, execute, refresh};
use retrobox_frontend::{BatoceraManager, Manager};
use retrobox_lib::{
    CancelToken, MemoryRegistry, RegFile, RegValue, Registry, RunContext, Selection, Settings,
};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn context(work: &Path, selection: Selection) -> RunContext {
    let mut settings = Settings::default();
    settings.pinup.path = Some(work.join("PinUPSystem"));
    settings.set_emulator_path(Emulator::VisualPinballX, Some(work.join("vpx")));
    RunContext::new(work.to_path_buf(), settings, selection)
}

fn only(ids: &[&str]) -> ExecuteOptions {
    ExecuteOptions {
        ids: Some(ids.iter().map(|s| s.to_string()).collect()),
        components: Vec::new(),
    }
}

#[test]
fn test_pinup_database_export_clear_restore() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_memory().unwrap();
    conn.execute_batch("INSERT INTO Emulators (EMUID, EmuName) VALUES (1, 'Visual Pinball X');")
        .unwrap();
    let registry = MemoryRegistry::new();
    let services = Services::new(&registry, &NoLookup).with_database(&conn);
    let cancel = CancelToken::new();

    let export = context(dir.path(), Selection::new(Category::PinupDatabase, Action::Export));
    let before = refresh(&export, services, &cancel, None).unwrap();
    let emulators = before.rows.iter().find(|r| r.id == "Emulators").unwrap();
    assert_eq!(emulators.get(Component::PinupDatabase), Status::Absent);

    execute(&export, services, &only(&["Emulators"]), &cancel, None).unwrap();
    assert!(export.database_archive("Emulators").is_file());
    let after = refresh(&export, services, &cancel, None).unwrap();
    let emulators = after.rows.iter().find(|r| r.id == "Emulators").unwrap();
    assert_eq!(emulators.get(Component::PinupDatabase), Status::Present);

    let uninstall = context(dir.path(), Selection::new(Category::PinupDatabase, Action::Uninstall));
    execute(&uninstall, services, &only(&["Emulators"]), &cancel, None).unwrap();
    assert_eq!(count_rows(&conn, "Emulators").unwrap(), 0);
    let cleared = refresh(&uninstall, services, &cancel, None).unwrap();
    assert!(cleared.rows.iter().all(|r| r.color == RowColor::Green));

    let install = context(dir.path(), Selection::new(Category::PinupDatabase, Action::Install));
    execute(&install, services, &only(&["Emulators"]), &cancel, None).unwrap();
    assert_eq!(count_rows(&conn, "Emulators").unwrap(), 1);
    let restored = refresh(&install, services, &cancel, None).unwrap();
    let emulators = restored.rows.iter().find(|r| r.id == "Emulators").unwrap();
    assert_eq!(emulators.color, RowColor::Green);
}

#[test]
fn test_config_registry_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let export_file = dir.path().join("configs/PinUP_Popper/registry/popper.reg");
    write(
        &export_file,
        "Windows Registry Editor Version 5.00\r\n\r\n\
         [HKEY_CURRENT_USER\\Software\\PinUP]\r\n\"Theme\"=\"Dark\"\r\n",
    );
    let registry = MemoryRegistry::new();
    let services = Services::new(&registry, &NoLookup);
    let cancel = CancelToken::new();

    let install = context(dir.path(), Selection::new(Category::Configs, Action::Install));
    let before = refresh(&install, services, &cancel, None).unwrap();
    assert_eq!(before.rows[0].id, "PinUP_Popper");
    assert_eq!(before.rows[0].get(Component::Files), Status::NotApplicable);
    assert_eq!(before.rows[0].get(Component::Registry), Status::Absent);

    execute(&install, services, &only(&["PinUP_Popper"]), &cancel, None).unwrap();
    let after = refresh(&install, services, &cancel, None).unwrap();
    assert_eq!(after.rows[0].get(Component::Registry), Status::Present);

    registry
        .write_value(r"Software\PinUP", "Theme", &RegValue::String("Light".into()))
        .unwrap();
    let export = context(dir.path(), Selection::new(Category::Configs, Action::Export));
    let stale = refresh(&export, services, &cancel, None).unwrap();
    assert_eq!(stale.rows[0].get(Component::Registry), Status::Absent);
    execute(&export, services, &only(&["PinUP_Popper"]), &cancel, None).unwrap();
    let exported = RegFile::load(&export_file).unwrap();
    assert_eq!(
        exported.keys[0].values,
        vec![("Theme".to_string(), RegValue::String("Light".into()))]
    );

    let uninstall = context(dir.path(), Selection::new(Category::Configs, Action::Uninstall));
    execute(&uninstall, services, &only(&["PinUP_Popper"]), &cancel, None).unwrap();
    assert!(!registry.key_exists(r"Software\PinUP").unwrap());
}

const GAMELIST_XML: &str = r#"<?xml version="1.0"?>
<gameList>
	<game>
		<path>./Sonic.md</path>
		<name>Sonic the Hedgehog</name>
		<desc>Blue hedgehog.</desc>
		<image>./images/Sonic-image.png</image>
	</game>
</gameList>
"#;

#[test]
fn test_game_export_then_install_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path().join("work");
    let source = dir.path().join("batocera");
    let platform_dir = source.join("roms/megadrive");
    write(&platform_dir.join("gamelist.xml"), GAMELIST_XML);
    write(&platform_dir.join("Sonic.md"), "rom");
    write(&platform_dir.join("images/Sonic-image.png"), "png");

    let registry = MemoryRegistry::new();
    let cancel = CancelToken::new();
    let selection = |action| {
        Selection::new(Category::Games, action)
            .with_platform(Platform::SegaMegadrive)
            .with_software(Software::Batocera)
    };

    let live = BatoceraManager::new(&source, &[]).unwrap();
    let services = Services::new(&registry, &NoLookup).with_manager(&live);
    let export = context(&work, selection(Action::Export));
    let before = refresh(&export, services, &cancel, None).unwrap();
    assert_eq!(before.rows.len(), 1);
    assert_eq!(before.rows[0].id, "Sonic_the_Hedgehog");
    assert_eq!(before.rows[0].color, RowColor::Red);

    execute(&export, services, &only(&["Sonic_the_Hedgehog"]), &cancel, None).unwrap();
    let archive = export.game_archive(Platform::SegaMegadrive, "Sonic_the_Hedgehog");
    assert!(archive.join("rom/Sonic.md").is_file());
    assert!(archive.join("batocera.xml").is_file());
    let after = refresh(&export, services, &cancel, None).unwrap();
    assert_eq!(after.rows[0].get(Component::Rom), Status::Present);
    assert_eq!(after.rows[0].get(Component::Media), Status::Present);
    assert_eq!(after.rows[0].get(Component::GameInfo), Status::Present);

    let target_root = dir.path().join("other");
    let target = BatoceraManager::new(&target_root, &[]).unwrap();
    let services = Services::new(&registry, &NoLookup).with_manager(&target);
    let install = context(&work, selection(Action::Install));
    let missing = refresh(&install, services, &cancel, None).unwrap();
    assert_eq!(missing.rows[0].name, "Sonic the Hedgehog");
    assert_eq!(missing.rows[0].get(Component::Rom), Status::Absent);

    execute(&install, services, &only(&["Sonic_the_Hedgehog"]), &cancel, None).unwrap();
    assert!(target_root.join("roms/megadrive/Sonic.md").is_file());
    let installed = refresh(&install, services, &cancel, None).unwrap();
    assert_eq!(installed.rows[0].color, RowColor::Green);
    assert!(target
        .retrieve_game_info(
            Platform::SegaMegadrive,
            &retrobox_frontend::GameRef::new("Sonic the Hedgehog")
        )
        .unwrap()
        .is_some());
}
