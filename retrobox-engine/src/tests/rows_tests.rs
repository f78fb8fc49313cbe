use retrobox_core::Component;

use super::*;

fn row(id: &str, name: &str, statuses: &[(Component, Status)]) -> Row {
    let mut row = Row::new(id, name);
    for (component, status) in statuses {
        row.set(*component, *status);
    }
    row.colored()
}

#[test]
fn test_sort_red_first_then_name() {
    let mut rows = vec![
        row("b", "Bravo", &[(Component::PinupMedia, Status::Present)]),
        row("c", "Charlie", &[(Component::PinupMedia, Status::Absent)]),
        row("a", "Alpha", &[(Component::PinupMedia, Status::Present)]),
        Row::new("z", "Zulu"),
        row("d", "Delta", &[(Component::PinupMedia, Status::Absent)]),
    ];
    sort_rows(&mut rows);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "d", "a", "b", "z"]);
}

#[test]
fn test_selection_never_affects_color() {
    let mut r = row("a", "Alpha", &[(Component::Files, Status::Present)]);
    r.selected = false;
    r.recolor();
    assert_eq!(r.color, RowColor::Green);
}

#[test]
fn test_partial_merge_keeps_other_rows() {
    let previous = vec![
        row("a", "Alpha", &[(Component::Files, Status::Absent)]),
        row("b", "Bravo", &[(Component::Files, Status::Absent)]),
        row("c", "Charlie", &[(Component::Files, Status::Present)]),
    ];
    let fresh = vec![row("b", "Bravo", &[(Component::Files, Status::Present)])];
    let merged = merge_partial(fresh, previous, &["b".to_string()]);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].id, "a");
    let bravo = merged.iter().find(|r| r.id == "b").unwrap();
    assert_eq!(bravo.get(Component::Files), Status::Present);
    assert_eq!(bravo.color, RowColor::Green);
    assert_eq!(merged.iter().filter(|r| r.id == "b").count(), 1);
}

#[test]
fn test_persist_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refresh").join("tables_install.csv");
    let mut rows = vec![
        row(
            "Attack_from_Mars",
            "Attack from Mars",
            &[
                (Component::EmulatorTable, Status::Present),
                (Component::PinupVideos, Status::NotApplicable),
            ],
        )
        .with(Column::LatestVersion, Status::Absent)
        .colored(),
        row(
            "Medieval_Madness",
            "Medieval Madness, Remake",
            &[(Component::PinupMedia, Status::Present)],
        ),
    ];
    rows[1].selected = true;
    write_rows(&path, &rows).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "selection,id,name,color,latest_version,emulator_table,pinup_media,pinup_videos"
    );
    assert!(text.contains("NO,Attack_from_Mars,Attack from Mars,red,NO,YES,,"));

    let loaded = read_rows(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].color, RowColor::Red);
    assert!(!loaded[0].selected);
    assert_eq!(loaded[0].get(Column::LatestVersion), Status::Absent);
    assert_eq!(loaded[0].get(Component::EmulatorTable), Status::Present);
    assert_eq!(loaded[0].get(Component::PinupVideos), Status::NotApplicable);
    assert_eq!(loaded[1].name, "Medieval Madness, Remake");
    assert!(loaded[1].selected);
    assert_eq!(loaded[1].color, RowColor::Green);
    assert_eq!(loaded[1].columns.len(), 1);
}

#[test]
fn test_missing_file_has_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_rows(&dir.path().join("none.csv")).unwrap().is_empty());
}
