use super::*;

const GAMELIST_XML: &str = r#"<?xml version="1.0"?>
<gameList>
	<game>
		<path>./Sonic.md</path>
		<name>Sonic the Hedgehog</name>
		<desc>Blue hedgehog.</desc>
		<image>./images/Sonic-image.png</image>
		<marquee>./images/Sonic-marquee.png</marquee>
	</game>
	<game>
		<path>./Missing.md</path>
		<name>Missing Game</name>
	</game>
</gameList>
"#;

fn setup(root: &Path) -> BatoceraManager {
    let dir = root.join("roms").join("megadrive");
    std::fs::create_dir_all(dir.join("images")).unwrap();
    std::fs::create_dir_all(root.join("roms").join("snes")).unwrap();
    std::fs::write(dir.join(GAMELIST), GAMELIST_XML).unwrap();
    std::fs::write(dir.join("Sonic.md"), "rom").unwrap();
    std::fs::write(dir.join("images").join("Sonic-image.png"), "png").unwrap();
    BatoceraManager::new(root, &[]).unwrap()
}

#[test]
fn test_list_platforms_ignores_unknown_folders() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    assert_eq!(manager.list_platforms().unwrap(), vec![Platform::SegaMegadrive]);
}

#[test]
fn test_list_games_requires_payload() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let games = manager.list_games_with_rom(Platform::SegaMegadrive).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games.get("Sonic.md").map(String::as_str), Some("Sonic the Hedgehog"));

    // No game list for this platform
    assert!(manager.list_games_with_rom(Platform::SegaMasterSystem).unwrap().is_empty());
}

#[test]
fn test_unmapped_platform_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let err = manager.list_games_with_rom(Platform::NintendoSnes).unwrap_err();
    assert!(matches!(err, FrontendError::UnknownPlatform { .. }));
}

#[test]
fn test_inconsistent_gamelist() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let gamelist = dir.path().join("roms").join("megadrive").join(GAMELIST);
    std::fs::write(
        &gamelist,
        "<gameList><game><path>./a.md</path><name>A</name></game>\
         <game><path>./b.md</path></game></gameList>",
    )
    .unwrap();
    let err = manager.list_games_with_rom(Platform::SegaMegadrive).unwrap_err();
    assert!(matches!(err, FrontendError::Inconsistent { .. }));
}

#[test]
fn test_retrieve_media_rom_and_info() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let game = GameRef::new("Sonic the Hedgehog");

    let media = manager.retrieve_media_files(Platform::SegaMegadrive, &game).unwrap();
    // The marquee is listed but missing on disk
    assert_eq!(media.len(), 1);
    assert!(media[&Media::ScreenshotGame].ends_with("images/Sonic-image.png"));

    let rom = manager.retrieve_rom_file(Platform::SegaMegadrive, &game).unwrap().unwrap();
    assert!(rom.ends_with("Sonic.md"));
    let missing = GameRef::new("Missing Game");
    assert!(manager.retrieve_rom_file(Platform::SegaMegadrive, &missing).unwrap().is_none());

    let info = manager.retrieve_game_info(Platform::SegaMegadrive, &game).unwrap().unwrap();
    assert!(info.starts_with("\t<game>"));
    assert!(info.contains("<desc>Blue hedgehog.</desc>"));
    assert!(!info.contains("./"));
}

#[test]
fn test_install_writes_payload_media_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("archive");
    std::fs::create_dir_all(&archive).unwrap();
    std::fs::write(archive.join("Columns.md"), "rom").unwrap();
    std::fs::write(archive.join("shot.png"), "png").unwrap();
    std::fs::write(archive.join("manual.pdf"), "pdf").unwrap();
    std::fs::write(
        archive.join("batocera.xml"),
        "\t<game>\n\t\t<name>Columns</name>\n\t\t<genre>Puzzle</genre>\n\t</game>",
    )
    .unwrap();

    let root = dir.path().join("batocera");
    let manager = BatoceraManager::new(&root, &[]).unwrap();
    let mut payload = InstallPayload {
        rom_file: Some(archive.join("Columns.md")),
        ..InstallPayload::default()
    };
    payload.media_files.insert(Media::ScreenshotGame, archive.join("shot.png"));
    payload.media_files.insert(Media::Manual, archive.join("manual.pdf"));
    payload.game_info_files.insert(Software::Batocera, archive.join("batocera.xml"));

    let game = GameRef::new("Columns");
    assert!(manager
        .install_game(Platform::SegaMegadrive, &game, &payload, &FileOps::new(false))
        .unwrap());

    let platform_dir = root.join("roms").join("megadrive");
    assert!(platform_dir.join("Columns.md").is_file());
    assert!(platform_dir.join("images").join("Columns-image.png").is_file());
    assert!(platform_dir.join("manuals").join("Columns-manual.pdf").is_file());

    let games = manager.list_games_with_rom(Platform::SegaMegadrive).unwrap();
    assert_eq!(games.get("Columns.md").map(String::as_str), Some("Columns"));
    let media = manager.retrieve_media_files(Platform::SegaMegadrive, &game).unwrap();
    assert_eq!(media.len(), 2);
    let info = manager.retrieve_game_info(Platform::SegaMegadrive, &game).unwrap().unwrap();
    assert!(info.contains("<genre>Puzzle</genre>"));

    // Installing again replaces the record instead of duplicating it
    manager
        .install_game(Platform::SegaMegadrive, &game, &payload, &FileOps::new(false))
        .unwrap();
    let names =
        retrobox_lib::document::list_values(&platform_dir.join(GAMELIST), Some("game"), "name")
            .unwrap();
    assert_eq!(names, vec!["Columns"]);
}

#[test]
fn test_install_without_game_info_copies_rom_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Columns.md"), "rom").unwrap();
    let root = dir.path().join("batocera");
    let manager = BatoceraManager::new(&root, &[]).unwrap();
    let payload = InstallPayload {
        rom_file: Some(dir.path().join("Columns.md")),
        ..InstallPayload::default()
    };
    assert!(manager
        .install_game(
            Platform::SegaMasterSystem,
            &GameRef::new("Columns"),
            &payload,
            &FileOps::new(false)
        )
        .unwrap());
    let platform_dir = root.join("roms").join("mastersystem");
    assert!(platform_dir.join("Columns.md").is_file());
    assert!(!platform_dir.join(GAMELIST).exists());
}

#[test]
fn test_uninstall_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let game = GameRef::new("Sonic the Hedgehog");
    assert!(manager
        .uninstall_game(Platform::SegaMegadrive, &game, &FileOps::new(false))
        .unwrap());

    let platform_dir = dir.path().join("roms").join("megadrive");
    assert!(!platform_dir.join("Sonic.md").exists());
    assert!(!platform_dir.join("images").join("Sonic-image.png").exists());
    assert!(manager.retrieve_game_info(Platform::SegaMegadrive, &game).unwrap().is_none());
}

#[test]
fn test_simulated_uninstall_keeps_files() {
    let dir = tempfile::tempdir().unwrap();
    let manager = setup(dir.path());
    let game = GameRef::new("Sonic the Hedgehog");
    manager
        .uninstall_game(Platform::SegaMegadrive, &game, &FileOps::new(true))
        .unwrap();
    assert!(dir.path().join("roms").join("megadrive").join("Sonic.md").exists());
    assert!(manager.retrieve_game_info(Platform::SegaMegadrive, &game).unwrap().is_some());
}

#[test]
fn test_overrides_change_the_folder() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("roms").join("genesis")).unwrap();
    let overrides = [(Platform::SegaMegadrive, "genesis".to_string())];
    let manager = BatoceraManager::new(dir.path(), &overrides).unwrap();
    assert_eq!(manager.list_platforms().unwrap(), vec![Platform::SegaMegadrive]);
    assert_eq!(manager.native_key(Platform::SegaMegadrive).unwrap(), "genesis");
}
