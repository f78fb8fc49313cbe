use serde::{Deserialize, Serialize};

/// Token written for [`Status::Present`] in row files.
pub const CSV_YES: &str = "YES";
/// Token written for [`Status::Absent`] in row files.
pub const CSV_NO: &str = "NO";

/// Result of one verification predicate.
///
/// `NotApplicable` is distinct from `Absent`: it marks a component that does
/// not concern the item (no video pack, no ROM name...) and never affects the
/// row color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    Present,
    Absent,
    #[default]
    NotApplicable,
}

impl Status {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    /// Swap `Present` and `Absent`; `NotApplicable` is unchanged.
    pub fn negate(self) -> Self {
        match self {
            Self::Present => Self::Absent,
            Self::Absent => Self::Present,
            Self::NotApplicable => Self::NotApplicable,
        }
    }

    /// Serialize to the row-file token: `YES`, `NO` or an empty cell.
    pub fn as_csv(&self) -> &'static str {
        match self {
            Self::Present => CSV_YES,
            Self::Absent => CSV_NO,
            Self::NotApplicable => "",
        }
    }

    /// Parse a row-file cell. Unknown tokens yield `None`.
    pub fn from_csv(cell: &str) -> Option<Self> {
        match cell.trim() {
            CSV_YES => Some(Self::Present),
            CSV_NO => Some(Self::Absent),
            "" => Some(Self::NotApplicable),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent => Some(false),
            Self::NotApplicable => None,
        }
    }
}

impl From<bool> for Status {
    fn from(value: bool) -> Self {
        if value { Self::Present } else { Self::Absent }
    }
}

impl From<Option<bool>> for Status {
    fn from(value: Option<bool>) -> Self {
        value.map(Self::from).unwrap_or(Self::NotApplicable)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Severity classification of a row.
///
/// `Black` is kept for rows persisted by older versions; fresh rows are
/// always `Green` or `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RowColor {
    Red,
    Green,
    #[default]
    Black,
}

impl RowColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Black => "black",
        }
    }

    /// Sort rank: rows are ordered by the color name's first letter,
    /// descending, so red comes before green and green before black.
    pub fn sort_rank(&self) -> std::cmp::Reverse<u8> {
        std::cmp::Reverse(self.as_str().as_bytes()[0])
    }
}

impl std::fmt::Display for RowColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RowColor {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "black" | "" => Ok(Self::Black),
            _ => Err(crate::ParseError::new("color", s)),
        }
    }
}
