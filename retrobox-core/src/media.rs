use crate::ParseError;

/// Canonical media categories.
///
/// Every front-end names its artwork differently (`thumbnail`, `Box_3D`,
/// `box3d`...). Managers translate their native keys to these variants so
/// media can be archived once and reinstalled into any other target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Media {
    ScreenshotGame,
    ScreenshotTitle,
    Box2dFront,
    Box2dSide,
    Box2dBack,
    Box3d,
    Support,
    Logo,
    LogoCarbon,
    LogoSteel,
    FanArt,
    Bezel,
    Manual,
    Video,
}

const ALL_MEDIA: &[Media] = &[
    Media::ScreenshotGame,
    Media::ScreenshotTitle,
    Media::Box2dFront,
    Media::Box2dSide,
    Media::Box2dBack,
    Media::Box3d,
    Media::Support,
    Media::Logo,
    Media::LogoCarbon,
    Media::LogoSteel,
    Media::FanArt,
    Media::Bezel,
    Media::Manual,
    Media::Video,
];

impl Media {
    /// Folder name used under `games/<platform>/<id>/media/`.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::ScreenshotGame => "screenshot_game",
            Self::ScreenshotTitle => "screenshot_title",
            Self::Box2dFront => "box_2d_front",
            Self::Box2dSide => "box_2d_side",
            Self::Box2dBack => "box_2d_back",
            Self::Box3d => "box_3d",
            Self::Support => "support",
            Self::Logo => "logo",
            Self::LogoCarbon => "logo_carbon",
            Self::LogoSteel => "logo_steel",
            Self::FanArt => "fan_art",
            Self::Bezel => "bezel",
            Self::Manual => "manual",
            Self::Video => "video",
        }
    }

    /// Default extension when a front-end does not record one.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Manual => "pdf",
            _ => "png",
        }
    }

    pub fn all() -> &'static [Media] {
        ALL_MEDIA
    }
}

impl std::fmt::Display for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

impl std::str::FromStr for Media {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_MEDIA
            .iter()
            .copied()
            .find(|m| m.folder_name() == lower)
            .ok_or_else(|| ParseError::new("media", s))
    }
}
