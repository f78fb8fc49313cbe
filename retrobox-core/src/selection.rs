//! Operation selectors: what kind of catalog item is handled, which action
//! is applied to it, and the component columns reported for each row.

use crate::ParseError;

/// Kind of catalog item a refresh or execute operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tables,
    Playlists,
    PinupDatabase,
    Configs,
    Games,
}

const ALL_CATEGORIES: &[Category] = &[
    Category::Tables,
    Category::Playlists,
    Category::PinupDatabase,
    Category::Configs,
    Category::Games,
];

impl Category {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Playlists => "playlists",
            Self::PinupDatabase => "pinup_database",
            Self::Configs => "configs",
            Self::Games => "games",
        }
    }

    /// Actions that make sense for this category.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Self::Tables | Self::Playlists => &[
                Action::Install,
                Action::Uninstall,
                Action::Export,
                Action::Copy,
                Action::Edit,
            ],
            Self::PinupDatabase => &[Action::Install, Action::Uninstall, Action::Export],
            Self::Configs => &[
                Action::Install,
                Action::Uninstall,
                Action::Export,
                Action::Edit,
            ],
            Self::Games => &[
                Action::Install,
                Action::Uninstall,
                Action::Export,
                Action::Edit,
            ],
        }
    }

    pub fn all() -> &'static [Category] {
        ALL_CATEGORIES
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        match lower.as_str() {
            "tables" | "table" => Ok(Self::Tables),
            "playlists" | "playlist" => Ok(Self::Playlists),
            "pinup_database" | "database" | "bdd_tables" | "bdd" => Ok(Self::PinupDatabase),
            "configs" | "config" => Ok(Self::Configs),
            "games" | "game" => Ok(Self::Games),
            _ => Err(ParseError::new("category", s)),
        }
    }
}

/// Action applied to the selected catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Uninstall,
    Export,
    Copy,
    Edit,
}

const ALL_ACTIONS: &[Action] = &[
    Action::Install,
    Action::Uninstall,
    Action::Export,
    Action::Copy,
    Action::Edit,
];

impl Action {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Export => "export",
            Self::Copy => "copy",
            Self::Edit => "edit",
        }
    }

    pub fn all() -> &'static [Action] {
        ALL_ACTIONS
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|a| a.id() == lower)
            .ok_or_else(|| ParseError::new("action", s))
    }
}

/// One independently verified sub-aspect of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    EmulatorTable,
    EmulatorPlaylist,
    PinupMedia,
    PinupVideos,
    ConfigXml,
    ConfigReg,
    PinupDatabase,
    Files,
    Registry,
    Rom,
    Media,
    GameInfo,
}

const ALL_COMPONENTS: &[Component] = &[
    Component::EmulatorTable,
    Component::EmulatorPlaylist,
    Component::PinupMedia,
    Component::PinupVideos,
    Component::ConfigXml,
    Component::ConfigReg,
    Component::PinupDatabase,
    Component::Files,
    Component::Registry,
    Component::Rom,
    Component::Media,
    Component::GameInfo,
];

impl Component {
    /// Column key used in persisted row files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::EmulatorTable => "emulator_table",
            Self::EmulatorPlaylist => "emulator_playlist",
            Self::PinupMedia => "pinup_media",
            Self::PinupVideos => "pinup_videos",
            Self::ConfigXml => "config_xml",
            Self::ConfigReg => "config_reg",
            Self::PinupDatabase => "pinup_database",
            Self::Files => "files",
            Self::Registry => "registry",
            Self::Rom => "rom",
            Self::Media => "media",
            Self::GameInfo => "game_info",
        }
    }

    pub fn all() -> &'static [Component] {
        ALL_COMPONENTS
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Component {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_COMPONENTS
            .iter()
            .copied()
            .find(|c| c.key() == lower)
            .ok_or_else(|| ParseError::new("component", s))
    }
}

/// A status column of a row: either a component or one of the two
/// version checks that sit alongside components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    LatestVersion,
    UniqueVersion,
    Component(Component),
}

impl Column {
    pub fn key(&self) -> &'static str {
        match self {
            Self::LatestVersion => "latest_version",
            Self::UniqueVersion => "unique_version",
            Self::Component(c) => c.key(),
        }
    }
}

impl From<Component> for Column {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Column {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "latest_version" => Ok(Self::LatestVersion),
            "unique_version" => Ok(Self::UniqueVersion),
            other => other
                .parse::<Component>()
                .map(Self::Component)
                .map_err(|_| ParseError::new("column", s)),
        }
    }
}
