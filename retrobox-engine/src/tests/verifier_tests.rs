use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::sync::Once;

use retrobox_core::{Action, CatalogEntry, Category, Column, Component, Emulator, Status};
use retrobox_db::InstalledItem;
use retrobox_lib::{MemoryRegistry, RunContext, Selection, Settings};

use super::*;
use crate::web::{NoLookup, VersionLookup};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn context(work: &Path, action: Action) -> RunContext {
    RunContext::new(
        work.to_path_buf(),
        Settings::default(),
        Selection::new(Category::Tables, action).with_emulator(Emulator::VisualPinballX),
    )
}

thread_local! {
    static LOGGED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Keeps the warnings and errors logged by the current test thread.
struct Capture;

impl log::Log for Capture {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            LOGGED.with(|logged| logged.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;
static INSTALL_CAPTURE: Once = Once::new();

/// Run `f`, returning its result and the warnings it logged.
fn warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    INSTALL_CAPTURE.call_once(|| {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Warn);
        }
    });
    LOGGED.with(|logged| logged.borrow_mut().clear());
    let result = f();
    (result, LOGGED.with(RefCell::take))
}

struct FixedLookup(Result<Option<&'static str>, ()>);

impl VersionLookup for FixedLookup {
    fn latest_version(&self, url: &str) -> Result<Option<String>, EngineError> {
        match self.0 {
            Ok(version) => Ok(version.map(str::to_string)),
            Err(()) => Err(EngineError::lookup(format!("unreachable {url}"))),
        }
    }
}

#[test]
fn test_mirror_matching_trees() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = (dir.path().join("src"), dir.path().join("dst"));
    for root in [&source, &target] {
        write(&root.join("Tables/AFM.vpx"), "table");
        write(&root.join("Wheel/AFM.png"), "wheel");
    }
    let ctx = context(dir.path(), Action::Install);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));

    assert_eq!(verifier.mirror(&source, "*", &target, true).unwrap(), Status::Present);
}

#[test]
fn test_mirror_missing_or_different_file() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = (dir.path().join("src"), dir.path().join("dst"));
    write(&source.join("Tables/AFM.vpx"), "table");
    write(&source.join("Wheel/AFM.png"), "wheel");
    write(&target.join("Tables/AFM.vpx"), "table");
    let ctx = context(dir.path(), Action::Install);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));

    let (status, logged) = warnings(|| verifier.mirror(&source, "*", &target, true).unwrap());
    assert_eq!(status, Status::Absent);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].starts_with("Missing file"));
    assert!(logged[0].contains("AFM.png"));

    write(&target.join("Wheel/AFM.png"), "a bigger wheel");
    assert_eq!(verifier.mirror(&source, "*", &target, true).unwrap(), Status::Absent);

    write(&target.join("Wheel/AFM.png"), "wheel");
    let (status, logged) = warnings(|| verifier.mirror(&source, "*", &target, true).unwrap());
    assert_eq!(status, Status::Present);
    assert!(logged.is_empty());
}

#[test]
fn test_mirror_ignores_cache_files() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = (dir.path().join("src"), dir.path().join("dst"));
    write(&source.join("Wheel/AFM.png"), "wheel");
    write(&target.join("Wheel/AFM.png"), "wheel");
    let ctx = context(dir.path(), Action::Install);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));
    let before = verifier.mirror(&source, "*", &target, true).unwrap();

    write(&source.join("Wheel/pthumbs/AFM.png"), "cache");
    write(&source.join("Wheel/AFM_thumb.png"), "cache");
    assert_eq!(verifier.mirror(&source, "*", &target, true).unwrap(), before);
    assert_eq!(before, Status::Present);
}

#[test]
fn test_mirror_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), Action::Install);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));
    let missing = dir.path().join("missing");

    assert_eq!(verifier.mirror(&missing, "*", dir.path(), true).unwrap(), Status::Absent);
    assert_eq!(verifier.mirror(&missing, "*", dir.path(), false).unwrap(), Status::Present);
}

#[test]
fn test_removed() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = (dir.path().join("src"), dir.path().join("dst"));
    write(&source.join("Tables/AFM.vpx"), "table");
    let ctx = context(dir.path(), Action::Uninstall);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));

    assert_eq!(verifier.removed(&source, "*", &target).unwrap(), Status::Present);
    write(&target.join("Tables/AFM.vpx"), "table");
    assert_eq!(verifier.removed(&source, "*", &target).unwrap(), Status::Absent);
}

#[test]
fn test_unique_per_folder_exempts_loading() {
    let dir = tempfile::tempdir().unwrap();
    let media = dir.path().join("media");
    write(&media.join("Wheel/AFM.png"), "wheel");
    write(&media.join("Loading/AFM_1.mp4"), "a");
    write(&media.join("Loading/AFM_2.mp4"), "b");
    let ctx = context(dir.path(), Action::Edit);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));

    assert_eq!(verifier.unique_per_folder(&media).unwrap(), Status::Present);

    write(&media.join("Wheel/AFM_old.png"), "old wheel");
    assert_eq!(verifier.unique_per_folder(&media).unwrap(), Status::Absent);
    assert_eq!(
        verifier.unique_per_folder(&dir.path().join("none")).unwrap(),
        Status::Absent
    );
}

#[test]
fn test_csv_bdd_version() {
    assert!(verify_csv_bdd_version(Some("1.2"), Some("1.2")));
    assert!(!verify_csv_bdd_version(Some("1.2"), Some("1.3")));
    assert!(!verify_csv_bdd_version(None, Some("1.2")));
    assert!(!verify_csv_bdd_version(Some("None"), Some("None")));
    assert!(!verify_csv_bdd_version(Some(""), Some("")));
}

#[test]
fn test_version_agreement() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), Action::Install);
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));
    let item = Item::new(
        CatalogEntry::new("Attack from Mars")
            .with_id("AFM")
            .with_version("1.0"),
    );
    let installed = |version: &str| InstalledItem {
        id: "AFM".to_string(),
        name: "Attack from Mars".to_string(),
        version: Some(version.to_string()),
        rom: None,
    };

    let current = item.clone().with_installed(installed("1.0"));
    let (status, logged) = warnings(|| verifier.version_agreement(&current));
    assert_eq!(status, Status::Present);
    assert!(logged.is_empty());

    let behind = item.clone().with_installed(installed("0.9"));
    let (status, logged) = warnings(|| verifier.version_agreement(&behind));
    assert_eq!(status, Status::Absent);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].contains("0.9"));

    assert_eq!(verifier.version_agreement(&item), Status::Absent);
}

#[test]
fn test_unique_and_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), Action::Edit);
    let root = ctx.table_root(Emulator::VisualPinballX, "AFM");
    write(&root.join("1.0/media/Wheel/AFM.png"), "wheel");
    let registry = MemoryRegistry::new();
    let entry =
        CatalogEntry::new("AFM").with_weblink_url("https://vpuniverse.com/files/file/1-afm/");

    let found = FixedLookup(Ok(Some("1.0")));
    let verifier = Verifier::new(&ctx, Services::new(&registry, &found));
    assert_eq!(verifier.unique_version(&root).unwrap(), Status::Present);
    assert_eq!(verifier.latest_version(&entry, &root).unwrap(), Status::Present);

    let newer = FixedLookup(Ok(Some("1.1")));
    let verifier = Verifier::new(&ctx, Services::new(&registry, &newer));
    assert_eq!(verifier.latest_version(&entry, &root).unwrap(), Status::Absent);

    let failing = FixedLookup(Err(()));
    let verifier = Verifier::new(&ctx, Services::new(&registry, &failing));
    assert_eq!(verifier.latest_version(&entry, &root).unwrap(), Status::NotApplicable);
    assert_eq!(
        verifier.latest_version(&CatalogEntry::new("AFM"), &root).unwrap(),
        Status::NotApplicable
    );

    write(&root.join("1.1/media/Wheel/AFM.png"), "wheel");
    assert_eq!(verifier.unique_version(&root).unwrap(), Status::Absent);
}

#[test]
fn test_none_like_version_is_not_applicable() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.set_emulator_path(Emulator::VisualPinballX, Some(dir.path().join("vpx")));
    settings.pinup.path = Some(dir.path().join("pinup"));
    let ctx = RunContext::new(
        dir.path().to_path_buf(),
        settings,
        Selection::new(Category::Tables, Action::Install).with_emulator(Emulator::VisualPinballX),
    );
    let registry = MemoryRegistry::new();
    let verifier = Verifier::new(&ctx, Services::new(&registry, &NoLookup));

    let item = Item::new(CatalogEntry::new("Attack from Mars").with_version("None"));
    let row = verifier.verify(&item).unwrap();
    for component in [
        Component::EmulatorTable,
        Component::PinupMedia,
        Component::PinupVideos,
        Component::ConfigXml,
        Component::ConfigReg,
    ] {
        assert_eq!(row.get(component), Status::NotApplicable);
    }
    // an unknown catalog version never agrees with PinUP
    assert_eq!(row.get(Column::LatestVersion), Status::Absent);
    assert_eq!(row.color, retrobox_core::RowColor::Red);
}
