use super::*;
use std::fs;

fn touch(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn test_is_cache_path() {
    assert!(is_cache_path(Path::new("Wheel/thumbs/a.png")));
    assert!(is_cache_path(Path::new("pthumbs/a.png")));
    assert!(is_cache_path(Path::new("Thumbs/a.png")));
    assert!(!is_cache_path(Path::new("Wheel/a.png")));
}

#[test]
fn test_compare_files_symmetric() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.bin", b"1234");
    touch(dir.path(), "b.bin", b"abcd");
    touch(dir.path(), "c.bin", b"12");
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    let c = dir.path().join("c.bin");
    let missing = dir.path().join("missing.bin");
    let other_missing = dir.path().join("other.bin");

    let cases = [
        (&a, &b, true),
        (&a, &c, false),
        (&a, &missing, false),
        (&missing, &other_missing, true),
    ];
    for (x, y, expected) in cases {
        assert_eq!(compare_files(x, y), expected);
        assert_eq!(compare_files(y, x), expected);
    }
}

#[test]
fn test_list_relative_paths_matching() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "Wheel/Attack.png", b"x");
    touch(dir.path(), "Wheel/Attack.apng", b"x");
    touch(dir.path(), "Wheel/Attack_2.png", b"x");
    touch(dir.path(), "Topper/Attack", b"x");
    touch(dir.path(), "Loading/Attack/one.png", b"x");
    touch(dir.path(), "Loading/Attack/two.png", b"x");
    touch(dir.path(), "Wheel/Other.png", b"x");

    let ops = FileOps::new(false);
    let found = ops.list_relative_paths(dir.path(), "Attack", false).unwrap();
    let mut found = names(&found);
    found.sort();
    assert_eq!(
        found,
        vec![
            "Loading/Attack/one.png",
            "Loading/Attack/two.png",
            "Topper/Attack",
            "Wheel/Attack.apng",
            "Wheel/Attack.png",
        ]
    );

    let prefixed = ops.list_relative_paths(dir.path(), "Attack*", false).unwrap();
    assert!(names(&prefixed).contains(&"Wheel/Attack_2.png".to_string()));
}

#[test]
fn test_list_relative_paths_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let ops = FileOps::new(false);
    let missing = dir.path().join("nope");
    assert!(ops.list_relative_paths(&missing, ANY, false).unwrap().is_empty());
    let err = ops.list_relative_paths(&missing, "table", true).unwrap_err();
    assert!(matches!(err, LibError::MissingFile { .. }));
}

#[test]
fn test_thumbs_db_deleted() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "media/Thumbs.db", b"cache");
    touch(dir.path(), "media/a.png", b"x");

    let ops = FileOps::new(false);
    let found = ops.list_relative_paths(dir.path(), ANY, false).unwrap();
    assert_eq!(names(&found), vec!["media/a.png"]);
    assert!(!dir.path().join("media/Thumbs.db").exists());
}

#[test]
fn test_thumbs_db_kept_in_simulation() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "Thumbs.db", b"cache");

    let ops = FileOps::new(true);
    let found = ops.list_relative_paths(dir.path(), ANY, false).unwrap();
    assert!(found.is_empty());
    assert!(dir.path().join("Thumbs.db").exists());
}

#[test]
fn test_list_sub_directories() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "2.0/a", b"x");
    touch(dir.path(), "1.0/a", b"x");
    touch(dir.path(), "file.txt", b"x");
    assert_eq!(list_sub_directories(dir.path()).unwrap(), vec!["1.0", "2.0"]);
    assert!(list_sub_directories(&dir.path().join("none")).unwrap().is_empty());
}

#[test]
fn test_copy_file_skips_equal_destination() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "src/a.bin", b"1234");
    let ops = FileOps::new(false);
    let dest = dir.path().join("out/deep/a.bin");
    assert!(ops.copy_file(&dir.path().join("src/a.bin"), &dest).unwrap());
    assert_eq!(fs::read(&dest).unwrap(), b"1234");
    assert!(!ops.copy_file(&dir.path().join("src/a.bin"), &dest).unwrap());
}

#[test]
fn test_simulation_never_mutates() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.bin", b"1234");
    touch(dir.path(), "folder/b.bin", b"1");
    let ops = FileOps::new(true);

    assert!(ops.copy_file(&dir.path().join("a.bin"), &dir.path().join("c.bin")).unwrap());
    assert!(ops.delete_file(&dir.path().join("a.bin"), false).unwrap());
    assert!(ops.delete_folder(&dir.path().join("folder")).unwrap());
    assert!(ops.write_file(&dir.path().join("new.txt"), "hello").unwrap());

    assert!(!dir.path().join("c.bin").exists());
    assert!(dir.path().join("a.bin").exists());
    assert!(dir.path().join("folder/b.bin").exists());
    assert!(!dir.path().join("new.txt").exists());
}

#[test]
fn test_delete_file_all_extensions() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "game.png", b"x");
    touch(dir.path(), "game.mp4", b"x");
    touch(dir.path(), "other.png", b"x");
    let ops = FileOps::new(false);
    assert!(ops.delete_file(&dir.path().join("game.png"), true).unwrap());
    assert!(!dir.path().join("game.mp4").exists());
    assert!(dir.path().join("other.png").exists());
}

#[test]
fn test_copy_and_move_folder() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "src/a/b.txt", b"x");
    let ops = FileOps::new(false);
    ops.copy_folder(&dir.path().join("src"), &dir.path().join("copy")).unwrap();
    assert!(dir.path().join("copy/a/b.txt").is_file());
    ops.move_folder(&dir.path().join("copy"), &dir.path().join("moved")).unwrap();
    assert!(dir.path().join("moved/a/b.txt").is_file());
    assert!(!dir.path().join("copy").exists());
}

#[test]
fn test_move_file_and_create_folder() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.txt", b"data");
    let ops = FileOps::new(false);
    assert!(ops.create_folder(&dir.path().join("x/y")).unwrap());
    assert!(dir.path().join("x/y").is_dir());
    ops.move_file(&dir.path().join("a.txt"), &dir.path().join("x/y/a.txt")).unwrap();
    assert!(!dir.path().join("a.txt").exists());
    assert_eq!(fs::read(dir.path().join("x/y/a.txt")).unwrap(), b"data");

    let simulated = FileOps::new(true);
    assert!(simulated.create_folder(&dir.path().join("z")).unwrap());
    assert!(!dir.path().join("z").exists());
}

#[test]
fn test_read_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ops = FileOps::new(false);
    assert_eq!(ops.read_file(&dir.path().join("none.txt")).unwrap(), "");
}
