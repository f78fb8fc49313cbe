use crate::ParseError;

/// Third-party front-ends and scrapers whose on-disk state can be managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Software {
    Batocera,
    LaunchBox,
    EmuMovies,
    Skraper,
}

const ALL_SOFTWARE: &[Software] = &[
    Software::Batocera,
    Software::LaunchBox,
    Software::EmuMovies,
    Software::Skraper,
];

impl Software {
    /// Identifier used in settings keys, archive file names and XML tags.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Batocera => "batocera",
            Self::LaunchBox => "launchbox",
            Self::EmuMovies => "emu_movies",
            Self::Skraper => "skraper",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Batocera => "Batocera",
            Self::LaunchBox => "LaunchBox",
            Self::EmuMovies => "EmuMovies",
            Self::Skraper => "Skraper",
        }
    }

    pub fn all() -> &'static [Software] {
        ALL_SOFTWARE
    }
}

impl std::fmt::Display for Software {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Software {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace(['-', ' '], "_");
        ALL_SOFTWARE
            .iter()
            .copied()
            .find(|sw| sw.id() == lower || sw.display_name().to_lowercase() == lower)
            .or(match lower.as_str() {
                "emumovies" => Some(Self::EmuMovies),
                _ => None,
            })
            .ok_or_else(|| ParseError::new("software", s))
    }
}

/// Pinball emulators registered in PinUP Popper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emulator {
    VisualPinballX,
    FuturePinball,
}

const ALL_EMULATORS: &[Emulator] = &[Emulator::VisualPinballX, Emulator::FuturePinball];

impl Emulator {
    /// Identifier used for archive folders (`tables/<id>/...`) and CSV names.
    pub fn id(&self) -> &'static str {
        match self {
            Self::VisualPinballX => "visual_pinball_x",
            Self::FuturePinball => "future_pinball",
        }
    }

    /// Name of the emulator as stored in the PinUP `Emulators.EmuName` column
    /// and used for the `POPMedia/<name>` media folder.
    pub fn pinup_name(&self) -> &'static str {
        match self {
            Self::VisualPinballX => "Visual Pinball X",
            Self::FuturePinball => "Future Pinball",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::VisualPinballX => &["visual_pinball_x", "vpx", "visual pinball x"],
            Self::FuturePinball => &["future_pinball", "fp", "future pinball"],
        }
    }

    pub fn all() -> &'static [Emulator] {
        ALL_EMULATORS
    }
}

impl std::fmt::Display for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pinup_name())
    }
}

impl std::str::FromStr for Emulator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_EMULATORS
            .iter()
            .copied()
            .find(|e| e.aliases().iter().any(|a| *a == lower))
            .ok_or_else(|| ParseError::new("emulator", s))
    }
}
