use super::*;

#[test]
fn csv_tokens() {
    assert_eq!(Status::Present.as_csv(), "YES");
    assert_eq!(Status::Absent.as_csv(), "NO");
    assert_eq!(Status::NotApplicable.as_csv(), "");

    assert_eq!(Status::from_csv("YES"), Some(Status::Present));
    assert_eq!(Status::from_csv("NO"), Some(Status::Absent));
    assert_eq!(Status::from_csv(""), Some(Status::NotApplicable));
    assert_eq!(Status::from_csv("maybe"), None);
}

#[test]
fn option_conversions() {
    assert_eq!(Status::from(Some(true)), Status::Present);
    assert_eq!(Status::from(Some(false)), Status::Absent);
    assert_eq!(Status::from(None::<bool>), Status::NotApplicable);
    assert_eq!(Status::Absent.as_option(), Some(false));
}

#[test]
fn negate_keeps_not_applicable() {
    assert_eq!(Status::Present.negate(), Status::Absent);
    assert_eq!(Status::Absent.negate(), Status::Present);
    assert_eq!(Status::NotApplicable.negate(), Status::NotApplicable);
}

#[test]
fn color_sort_rank_orders_red_green_black() {
    let mut colors = vec![RowColor::Black, RowColor::Green, RowColor::Red];
    colors.sort_by_key(|c| c.sort_rank());
    assert_eq!(colors, vec![RowColor::Red, RowColor::Green, RowColor::Black]);
}

#[test]
fn color_parse() {
    assert_eq!("red".parse::<RowColor>().unwrap(), RowColor::Red);
    assert_eq!("GREEN".parse::<RowColor>().unwrap(), RowColor::Green);
    assert_eq!("".parse::<RowColor>().unwrap(), RowColor::Black);
    assert!("orange".parse::<RowColor>().is_err());
}
