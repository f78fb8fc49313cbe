//! Run context: the operation selection plus every location the verifiers
//! and executors read from or write to.
//!
//! Built once at startup from the settings and the command line, then
//! passed by reference. Nothing here is lazily initialized.

use std::path::{Component as PathComponent, Path, PathBuf};

use retrobox_core::{Action, Category, Emulator, Platform, Software};

use crate::files::FileOps;
use crate::settings::Settings;

/// Sub-folders of a table archive version.
pub const EMULATOR_FOLDER: &str = "emulator";
pub const MEDIA_FOLDER: &str = "media";
pub const PUP_VIDEOS_FOLDER: &str = "PUPVideos";
pub const CONFIG_FOLDER: &str = "config";

/// Sub-folders of a config archive.
pub const FILES_FOLDER: &str = "files";
pub const REGISTRY_FOLDER: &str = "registry";

/// Sub-folders of a game archive.
pub const ROM_FOLDER: &str = "rom";

/// PinUP media folder for playlists, shared by every emulator.
pub const PLAYLIST_MEDIA_NAME: &str = "Default";

/// What the current run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub action: Action,
    /// Tables: the pinball emulator
    pub emulator: Option<Emulator>,
    /// Games: canonical platform
    pub platform: Option<Platform>,
    /// Games: front-end or scraper on the live side
    pub software: Option<Software>,
    /// Partial refresh: only these ids are recomputed
    pub only_ids: Option<Vec<String>>,
}

impl Selection {
    pub fn new(category: Category, action: Action) -> Self {
        Self {
            category,
            action,
            emulator: None,
            platform: None,
            software: None,
            only_ids: None,
        }
    }

    pub fn with_emulator(mut self, emulator: Emulator) -> Self {
        self.emulator = Some(emulator);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_software(mut self, software: Software) -> Self {
        self.software = Some(software);
        self
    }

    pub fn with_only_ids(mut self, ids: Vec<String>) -> Self {
        self.only_ids = Some(ids);
        self
    }

    /// True when the id takes part in this run.
    pub fn includes(&self, id: &str) -> bool {
        self.only_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|i| i == id))
    }

    /// Stable key naming the persisted row set of this selection.
    pub fn scope_key(&self) -> String {
        let mut key = format!("{}_{}", self.category.id(), self.action.id());
        if let Some(emulator) = self.emulator {
            key.push('_');
            key.push_str(emulator.id());
        }
        if let Some(platform) = self.platform {
            key.push('_');
            key.push_str(platform.short_name());
        }
        if let Some(software) = self.software {
            key.push('_');
            key.push_str(software.id());
        }
        key
    }
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub working_path: PathBuf,
    pub simulated: bool,
    pub settings: Settings,
    pub selection: Selection,
}

impl RunContext {
    pub fn new(working_path: PathBuf, settings: Settings, selection: Selection) -> Self {
        Self {
            working_path,
            simulated: settings.simulated,
            settings,
            selection,
        }
    }

    pub fn with_simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }

    pub fn files(&self) -> FileOps {
        FileOps::new(self.simulated)
    }

    /// `<working>/tables/<emulator>/<id>`: every archived version of a table.
    pub fn table_root(&self, emulator: Emulator, id: &str) -> PathBuf {
        self.working_path.join("tables").join(emulator.id()).join(id)
    }

    /// `<working>/tables/<emulator>/<id>/<version>`
    pub fn table_archive(&self, emulator: Emulator, id: &str, version: &str) -> PathBuf {
        self.table_root(emulator, id).join(version)
    }

    /// `<working>/playlists/<id>`
    pub fn playlist_root(&self, id: &str) -> PathBuf {
        self.working_path.join("playlists").join(id)
    }

    /// `<working>/playlists/<id>/<version>`
    pub fn playlist_archive(&self, id: &str, version: &str) -> PathBuf {
        self.playlist_root(id).join(version)
    }

    /// `<working>/configs`
    pub fn configs_path(&self) -> PathBuf {
        self.working_path.join("configs")
    }

    /// `<working>/configs/<name>`
    pub fn config_archive(&self, name: &str) -> PathBuf {
        self.configs_path().join(name)
    }

    /// `<working>/games/<platform>`
    pub fn games_path(&self, platform: Platform) -> PathBuf {
        self.working_path.join("games").join(platform.short_name())
    }

    /// `<working>/games/<platform>/<id>`
    pub fn game_archive(&self, platform: Platform, id: &str) -> PathBuf {
        self.games_path(platform).join(id)
    }

    /// `<working>/pinup_database/<table>.csv`: exported rows of one PinUP
    /// database table.
    pub fn database_archive(&self, table: &str) -> PathBuf {
        self.working_path
            .join("pinup_database")
            .join(format!("{table}.csv"))
    }

    /// `<working>/csv/<name>.csv`
    pub fn csv_path(&self, name: &str) -> PathBuf {
        self.working_path.join("csv").join(format!("{name}.csv"))
    }

    /// Catalog source for the tables of one emulator.
    pub fn tables_csv(&self, emulator: Emulator) -> PathBuf {
        self.csv_path(&format!("tables_{}", emulator.id()))
    }

    pub fn playlists_csv(&self) -> PathBuf {
        self.csv_path("playlists")
    }

    /// Persisted rows of the current selection.
    pub fn refresh_rows_path(&self) -> PathBuf {
        self.working_path
            .join("refresh")
            .join(format!("{}.csv", self.selection.scope_key()))
    }

    /// Platform mapping records.
    pub fn platforms_path(&self) -> PathBuf {
        self.working_path.join("platforms.xml")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.working_path.join("logs")
    }

    pub fn emulator_path(&self, emulator: Emulator) -> Option<&Path> {
        self.settings.emulator_path(emulator)
    }

    pub fn software_path(&self, software: Software) -> Option<&Path> {
        self.settings.software_path(software)
    }

    pub fn pinup_path(&self) -> Option<&Path> {
        self.settings.pinup_path()
    }

    /// `<pinup>/POPMedia/<emulator name>`
    pub fn pinup_media_path(&self, emulator: Emulator) -> Option<PathBuf> {
        self.pinup_path()
            .map(|p| p.join("POPMedia").join(emulator.pinup_name()))
    }

    /// `<pinup>/POPMedia/Default`, where playlist media live.
    pub fn playlist_media_path(&self) -> Option<PathBuf> {
        self.pinup_path()
            .map(|p| p.join("POPMedia").join(PLAYLIST_MEDIA_NAME))
    }

    /// `<pinup>/PUPVideos`
    pub fn pinup_videos_path(&self) -> Option<PathBuf> {
        self.pinup_path().map(|p| p.join(PUP_VIDEOS_FOLDER))
    }

    /// `<pinup>/PUPDatabase.db`
    pub fn pinup_database_path(&self) -> Option<PathBuf> {
        self.pinup_path().map(|p| p.join("PUPDatabase.db"))
    }

    /// Root of the drive holding PinUP; config bundle files are stored
    /// relative to it.
    pub fn drive_root(&self) -> Option<PathBuf> {
        let pinup = self.pinup_path()?;
        let root: PathBuf = pinup
            .components()
            .take_while(|c| matches!(c, PathComponent::Prefix(_) | PathComponent::RootDir))
            .collect();
        if root.as_os_str().is_empty() {
            None
        } else {
            Some(root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RunContext {
        let mut settings = Settings::default();
        settings.pinup.path = Some(PathBuf::from("/games/PinUPSystem"));
        RunContext::new(
            PathBuf::from("/work"),
            settings,
            Selection::new(Category::Tables, Action::Install)
                .with_emulator(Emulator::VisualPinballX),
        )
    }

    #[test]
    fn test_archive_layout() {
        let ctx = context();
        assert_eq!(
            ctx.table_archive(Emulator::VisualPinballX, "Attack_from_Mars", "1.0"),
            PathBuf::from("/work/tables/visual_pinball_x/Attack_from_Mars/1.0")
        );
        assert_eq!(
            ctx.playlist_archive("Williams", "2"),
            PathBuf::from("/work/playlists/Williams/2")
        );
        assert_eq!(
            ctx.game_archive(Platform::SegaMegadrive, "Sonic"),
            PathBuf::from("/work/games").join(Platform::SegaMegadrive.short_name()).join("Sonic")
        );
        assert_eq!(
            ctx.tables_csv(Emulator::VisualPinballX),
            PathBuf::from("/work/csv/tables_visual_pinball_x.csv")
        );
        assert_eq!(
            ctx.database_archive("Games"),
            PathBuf::from("/work/pinup_database/Games.csv")
        );
        assert_eq!(
            ctx.refresh_rows_path(),
            PathBuf::from("/work/refresh/tables_install_visual_pinball_x.csv")
        );
    }

    #[test]
    fn test_pinup_paths() {
        let ctx = context();
        assert_eq!(
            ctx.pinup_media_path(Emulator::VisualPinballX),
            Some(PathBuf::from("/games/PinUPSystem/POPMedia/Visual Pinball X"))
        );
        assert_eq!(
            ctx.playlist_media_path(),
            Some(PathBuf::from("/games/PinUPSystem/POPMedia/Default"))
        );
        assert_eq!(ctx.drive_root(), Some(PathBuf::from("/")));
    }

    #[test]
    fn test_selection_includes() {
        let all = Selection::new(Category::Tables, Action::Edit);
        assert!(all.includes("anything"));
        let some = all.with_only_ids(vec!["a".into()]);
        assert!(some.includes("a"));
        assert!(!some.includes("b"));
    }
}
