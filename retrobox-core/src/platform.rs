use crate::ParseError;

/// Canonical platform identifiers shared by every front-end and scraper.
///
/// Each manager keeps its own table from native folder or XML names to
/// these variants, so this enum is the pivot used when moving a game from
/// one target system to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    // Sega
    SegaMasterSystem,
    SegaMegadrive,
    SegaGameGear,
    SegaSaturn,
    SegaDreamcast,

    // Nintendo
    NintendoNes,
    NintendoSnes,
    Nintendo64,
    NintendoGameBoy,
    NintendoGameBoyAdvance,

    // Sony
    SonyPlaystation,

    // Arcade
    Arcade,
}

/// All platform variants in registration order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::SegaMasterSystem,
    Platform::SegaMegadrive,
    Platform::SegaGameGear,
    Platform::SegaSaturn,
    Platform::SegaDreamcast,
    Platform::NintendoNes,
    Platform::NintendoSnes,
    Platform::Nintendo64,
    Platform::NintendoGameBoy,
    Platform::NintendoGameBoyAdvance,
    Platform::SonyPlaystation,
    Platform::Arcade,
];

impl Platform {
    /// Canonical short name used for CLI arguments and archive folders.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::SegaMasterSystem => "sega_mastersystem",
            Self::SegaMegadrive => "sega_megadrive",
            Self::SegaGameGear => "sega_gamegear",
            Self::SegaSaturn => "sega_saturn",
            Self::SegaDreamcast => "sega_dreamcast",
            Self::NintendoNes => "nintendo_nes",
            Self::NintendoSnes => "nintendo_snes",
            Self::Nintendo64 => "nintendo_64",
            Self::NintendoGameBoy => "nintendo_gameboy",
            Self::NintendoGameBoyAdvance => "nintendo_gba",
            Self::SonyPlaystation => "sony_playstation",
            Self::Arcade => "arcade",
        }
    }

    /// Full display name for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SegaMasterSystem => "Sega Master System",
            Self::SegaMegadrive => "Sega Mega Drive / Genesis",
            Self::SegaGameGear => "Sega Game Gear",
            Self::SegaSaturn => "Sega Saturn",
            Self::SegaDreamcast => "Sega Dreamcast",
            Self::NintendoNes => "Nintendo Entertainment System",
            Self::NintendoSnes => "Super Nintendo Entertainment System",
            Self::Nintendo64 => "Nintendo 64",
            Self::NintendoGameBoy => "Game Boy / Game Boy Color",
            Self::NintendoGameBoyAdvance => "Game Boy Advance",
            Self::SonyPlaystation => "Sony PlayStation",
            Self::Arcade => "Arcade",
        }
    }

    /// All accepted names for this platform (case-insensitive matching).
    ///
    /// The first entry is always the short name.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::SegaMasterSystem => {
                &["sega_mastersystem", "sms", "mastersystem", "master system"]
            }
            Self::SegaMegadrive => &[
                "sega_megadrive",
                "megadrive",
                "mega drive",
                "genesis",
                "md",
            ],
            Self::SegaGameGear => &["sega_gamegear", "gamegear", "game gear", "gg"],
            Self::SegaSaturn => &["sega_saturn", "saturn"],
            Self::SegaDreamcast => &["sega_dreamcast", "dreamcast", "dc"],
            Self::NintendoNes => &["nintendo_nes", "nes", "famicom"],
            Self::NintendoSnes => &["nintendo_snes", "snes", "sfc", "super nintendo"],
            Self::Nintendo64 => &["nintendo_64", "n64", "nintendo 64"],
            Self::NintendoGameBoy => &["nintendo_gameboy", "gb", "gbc", "gameboy"],
            Self::NintendoGameBoyAdvance => &["nintendo_gba", "gba", "game boy advance"],
            Self::SonyPlaystation => &["sony_playstation", "psx", "ps1", "playstation"],
            Self::Arcade => &["arcade", "mame"],
        }
    }

    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = ParseError;

    /// Parse a platform from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.aliases().iter().any(|a| *a == lower))
            .ok_or_else(|| ParseError::new("platform", s))
    }
}
