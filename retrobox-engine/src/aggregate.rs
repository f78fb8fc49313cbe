use retrobox_core::{RowColor, Status};

/// Color of a row from the statuses of its columns.
///
/// Red as soon as one status is `Absent`, green otherwise. Not-applicable
/// statuses never count, so a row without applicable column is green.
pub fn row_color<I>(statuses: I) -> RowColor
where
    I: IntoIterator<Item = Status>,
{
    if statuses.into_iter().any(|s| s.is_absent()) {
        RowColor::Red
    } else {
        RowColor::Green
    }
}
