use retrobox_core::Emulator;
use retrobox_db::*;

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO Emulators (EMUID, EmuName)
             VALUES (1, 'Visual Pinball X'), (2, 'Future Pinball');
         INSERT INTO Games (GameID, EMUID, GameName, GameDisplay, GameVer, ROM) VALUES
             (1, 1, 'Attack from Mars', 'Attack from Mars (Bally 1995)', '2.0', 'afm_113b'),
             (2, 1, 'Twilight Zone', NULL, '', NULL),
             (3, 2, 'Frankenstein', 'Frankenstein', '1.1', NULL),
             (4, 1, NULL, 'Broken', NULL, NULL);
         INSERT INTO Playlists (PlayListID, PlayName, PlayDisplayOrder) VALUES
             (1, 'Williams Classics', 2), (2, 'Bally', 1);",
    )
    .unwrap();
    conn
}

#[test]
fn list_tables_per_emulator() {
    let conn = setup_db();
    let tables = list_tables(&conn, Emulator::VisualPinballX).unwrap();
    assert_eq!(tables.len(), 2);

    assert_eq!(tables[0].id, "Attack_from_Mars");
    assert_eq!(tables[0].name, "Attack from Mars (Bally 1995)");
    assert_eq!(tables[0].version.as_deref(), Some("2.0"));
    assert_eq!(tables[0].rom.as_deref(), Some("afm_113b"));

    // Missing display name falls back to the game name, empty version is none
    assert_eq!(tables[1].id, "Twilight_Zone");
    assert_eq!(tables[1].name, "Twilight Zone");
    assert_eq!(tables[1].version, None);
    assert_eq!(tables[1].rom, None);

    let fp = list_tables(&conn, Emulator::FuturePinball).unwrap();
    assert_eq!(fp.len(), 1);
    assert_eq!(fp[0].id, "Frankenstein");
}

#[test]
fn list_playlists_in_display_order() {
    let conn = setup_db();
    let playlists = list_playlists(&conn).unwrap();
    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["Bally", "Williams_Classics"]);
    assert!(playlists.iter().all(|p| p.version.is_none()));
}

#[test]
fn count_rows_of_known_and_unknown_tables() {
    let conn = setup_db();
    assert_eq!(count_rows(&conn, "Games").unwrap(), 4);
    assert_eq!(count_rows(&conn, "PlayListDetails").unwrap(), 0);
    assert!(matches!(
        count_rows(&conn, "Nope"),
        Err(DbError::UnknownTable(name)) if name == "Nope"
    ));
}
