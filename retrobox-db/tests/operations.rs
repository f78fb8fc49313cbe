use retrobox_db::*;

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO Playlists (PlayListID, PlayName, PlayDisplayOrder, Logo) VALUES
             (1, 'Williams', 1, NULL), (2, 'Bally', 2, 'bally.png');",
    )
    .unwrap();
    conn
}

#[test]
fn dump_clear_restore() {
    let conn = setup_db();
    let dump = dump_table(&conn, "Playlists").unwrap();
    assert_eq!(
        dump.columns,
        vec!["PlayListID", "PlayName", "PlayDisplayOrder", "Logo", "PlayListSQL", "Active"]
    );
    assert_eq!(dump.rows.len(), 2);
    assert_eq!(dump.rows[0][0].as_deref(), Some("1"));
    assert_eq!(dump.rows[0][3], None);
    assert_eq!(dump.rows[1][3].as_deref(), Some("bally.png"));

    assert_eq!(clear_table(&conn, "Playlists").unwrap(), 2);
    assert_eq!(count_rows(&conn, "Playlists").unwrap(), 0);

    assert_eq!(restore_table(&conn, "Playlists", &dump).unwrap(), 2);
    assert_eq!(count_rows(&conn, "Playlists").unwrap(), 2);
    let id: i64 = conn
        .query_row(
            "SELECT PlayListID FROM Playlists WHERE PlayName = 'Bally'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(id, 2);
}

#[test]
fn restore_replaces_existing_rows() {
    let conn = setup_db();
    let dump = TableDump {
        columns: vec!["PlayListID".into(), "PlayName".into()],
        rows: vec![vec![Some("7".into()), Some("Stern".into())]],
    };
    restore_table(&conn, "Playlists", &dump).unwrap();
    let names: Vec<String> = {
        let mut stmt = conn.prepare("SELECT PlayName FROM Playlists").unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    };
    assert_eq!(names, vec!["Stern"]);
}

#[test]
fn restore_rejects_ragged_rows() {
    let conn = setup_db();
    let dump = TableDump {
        columns: vec!["PlayListID".into(), "PlayName".into()],
        rows: vec![vec![Some("7".into())]],
    };
    let err = restore_table(&conn, "Playlists", &dump).unwrap_err();
    assert!(matches!(err, DbError::ColumnMismatch { expected: 2, found: 1, .. }));
    // Nothing was touched
    assert_eq!(count_rows(&conn, "Playlists").unwrap(), 2);
}

#[test]
fn unknown_table_is_rejected() {
    let conn = setup_db();
    assert!(matches!(
        dump_table(&conn, "x\"; DROP TABLE Games; --"),
        Err(DbError::UnknownTable(_))
    ));
    assert!(table_exists(&conn, "Games").unwrap());
}
