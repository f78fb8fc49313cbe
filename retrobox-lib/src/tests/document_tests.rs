use super::*;

const GAMELIST: &str = r#"<?xml version="1.0"?>
<gameList>
	<game>
		<path>./Sonic.md</path>
		<name>Sonic the Hedgehog</name>
		<image>./images/Sonic-image.png</image>
	</game>
	<game>
		<path>./Streets of Rage.md</path>
		<name>Streets of Rage &amp; Friends</name>
	</game>
	<folder>
		<path>./hacks</path>
		<name>Hacks</name>
	</folder>
</gameList>
"#;

fn write_gamelist(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("gamelist.xml");
    std::fs::write(&path, GAMELIST).unwrap();
    path
}

#[test]
fn test_list_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gamelist(dir.path());

    assert_eq!(
        list_values(&path, Some("game"), "path").unwrap(),
        vec!["./Sonic.md", "./Streets of Rage.md"]
    );
    assert_eq!(
        list_values(&path, None, "name").unwrap(),
        vec!["Sonic the Hedgehog", "Streets of Rage & Friends", "Hacks"]
    );
    assert_eq!(list_values(&path, Some("gameList"), "game").unwrap().len(), 2);
}

#[test]
fn test_get_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gamelist(dir.path());

    let record = get_record(&path, None, "game", &[("path", "./Sonic.md")]).unwrap();
    assert_eq!(record.get("name"), Some("Sonic the Hedgehog"));
    assert_eq!(record.get("image"), Some("./images/Sonic-image.png"));
    assert_eq!(record.len(), 3);

    let none = get_record(&path, None, "game", &[("path", "./Missing.md")]).unwrap();
    assert!(none.is_empty());

    let partial = get_record(
        &path,
        None,
        "game",
        &[("path", "./Sonic.md"), ("name", "Other")],
    )
    .unwrap();
    assert!(partial.is_empty());
}

#[test]
fn test_get_raw_content_is_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gamelist(dir.path());

    let raw = get_raw_content(&path, None, "game", &[("path", "./Streets of Rage.md")])
        .unwrap()
        .unwrap();
    assert!(raw.starts_with("<game>"));
    assert!(raw.ends_with("</game>"));
    assert!(raw.contains("Streets of Rage &amp; Friends"));
    assert!(!raw.contains("Sonic"));

    assert!(get_raw_content(&path, None, "game", &[("path", "x")]).unwrap().is_none());
}

#[test]
fn test_delete_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gamelist(dir.path());

    assert!(delete_record(&path, None, "game", &[("path", "./Sonic.md")]).unwrap());
    assert!(!delete_record(&path, None, "game", &[("path", "./Sonic.md")]).unwrap());

    let remaining = list_values(&path, Some("game"), "path").unwrap();
    assert_eq!(remaining, vec!["./Streets of Rage.md"]);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("<folder>"));
}

#[test]
fn test_create_and_replace_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("platforms.xml");

    replace_record(
        &path,
        "platforms",
        "platform",
        &[("id", "sega_megadrive")],
        Record::new().with("id", "sega_megadrive").with("batocera", "megadrive"),
    )
    .unwrap();
    replace_record(
        &path,
        "platforms",
        "platform",
        &[("id", "sega_master_system")],
        Record::new().with("id", "sega_master_system").with("batocera", "mastersystem"),
    )
    .unwrap();
    replace_record(
        &path,
        "platforms",
        "platform",
        &[("id", "sega_megadrive")],
        Record::new()
            .with("id", "sega_megadrive")
            .with("batocera", "genesis")
            .with("launchbox", "Sega Genesis"),
    )
    .unwrap();

    let records = list_records(&path, Some("platforms"), "platform").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("batocera"), Some("genesis"));
    assert_eq!(records[0].get("launchbox"), Some("Sega Genesis"));
    assert_eq!(records[1].get("id"), Some("sega_master_system"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(
        "<?xml version='1.0' encoding='utf-8'?>\n<platforms>\n    <platform>\n        <id>"
    ));
}

#[test]
fn test_append_raw() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gamelist(dir.path());
    append_raw(
        &path,
        "<game>\n\t<path>./Columns.md</path>\n\t<name>Columns</name>\n</game>",
    )
    .unwrap();
    let paths = list_values(&path, Some("game"), "path").unwrap();
    assert_eq!(paths.last().map(String::as_str), Some("./Columns.md"));
}

#[test]
fn test_malformed_document_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.xml");
    std::fs::write(&path, "<a><b></a>").unwrap();
    assert!(list_values(&path, None, "b").is_err());
}

#[test]
fn test_contains_tag_literal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("B2STableSettings.xml");
    // Not well-formed: the writer leaves a stray closing tag
    std::fs::write(
        &path,
        "<B2STableSettings>\n  <afm_113b>\n    <HideGrill>0</HideGrill>\n  \
         </afm_113b>\n</B2STableSettings></x>",
    )
    .unwrap();
    assert!(contains_tag_literal(&path, "afm_113b").unwrap());
    assert!(!contains_tag_literal(&path, "afm").unwrap());
    assert!(!contains_tag_literal(&dir.path().join("none.xml"), "afm_113b").unwrap());
}

#[test]
fn test_tag_block_text_edits() {
    let text = "<B2STableSettings>\n  <tz_94h>\n    <A>1</A>\n  </tz_94h>\n  \
                <afm_113b/>\n</B2STableSettings>";
    let block = find_tag_block(text, "tz_94h").unwrap();
    assert!(text[block].ends_with("</tz_94h>"));

    let removed = remove_tag_block(text, "tz_94h").unwrap();
    assert!(!removed.contains("tz_94h"));
    assert!(removed.contains("<afm_113b/>"));
    assert!(remove_tag_block(&removed, "tz_94h").is_none());

    let inserted = insert_before_root_close(&removed, "<tz_94h><A>2</A></tz_94h>").unwrap();
    assert!(inserted.contains("<tz_94h><A>2</A></tz_94h>\n</B2STableSettings>"));
}
