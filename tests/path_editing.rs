use drillpath::error::{EditError, ParseError};
use drillpath::{Path, Point, SvgCommand};

#[test]
fn parse_then_display_round_trips() {
    for raw in [
        "M 0 0 L 100 100",
        "M 0 0 Q 50 0 100 100",
        "M 0 0 C 10 0 90 100 100 100",
        "M 0 0 L 100 0 L 100 100 Z",
        "M 0 0 L 10 0 Z M 50 50 L 60 50",
    ] {
        let path = Path::parse(raw).unwrap();
        assert_eq!(path.to_string(), raw);
    }
}

#[test]
fn parse_normalizes_float_noise() {
    let path = Path::parse("M 0.0 0.5 L 100.25 0.0").unwrap();
    assert_eq!(path.to_string(), "M 0 0.5 L 100.25 0");
}

#[test]
fn parse_rejects_malformed_input() {
    assert!(matches!(Path::parse(""), Err(ParseError::EmptyPath)));
    assert!(matches!(
        Path::parse("L 0 0"),
        Err(ParseError::MissingLeadingMove)
    ));
    assert!(matches!(
        Path::parse("M 0 0 X 1 2"),
        Err(ParseError::InvalidCommand(_))
    ));
    assert!(matches!(
        Path::parse("M 0 0 Q 50 0"),
        Err(ParseError::ArityMismatch {
            command: SvgCommand::Quadratic,
            expected: 2,
            got: 1,
        })
    ));
    assert!(matches!(
        Path::parse("M 0 abc"),
        Err(ParseError::InvalidNumber(_))
    ));
}

#[test]
fn append_continues_away_from_the_previous_point() {
    let path = Path::parse("M 0 0 L 100 0").unwrap();
    assert_eq!(path.append_segment().to_string(), "M 0 0 L 100 0 L 350 0");

    // leftward path keeps heading left
    let leftward = Path::parse("M 100 0 L 0 0").unwrap();
    assert_eq!(
        leftward.append_segment().to_string(),
        "M 100 0 L 0 0 L -250 0"
    );
}

#[test]
fn append_after_close_continues_from_the_sub_path_start() {
    let path = Path::parse("M 0 0 L 100 0 Z").unwrap();
    let extended = path.append_segment();
    assert_eq!(extended.segment_count(), 4);
    assert_eq!(extended.last_point(), Point::new(250.0, 0.0));
}

#[test]
fn leading_move_cannot_be_replaced_or_removed() {
    let path = Path::parse("M 0 0 L 100 0").unwrap();
    assert!(matches!(
        path.retype_segment(0, SvgCommand::Line),
        Err(EditError::CannotEditAnchor)
    ));
    assert!(matches!(
        path.remove_segment(0),
        Err(EditError::CannotEditAnchor)
    ));
    // but its coordinate can still be dragged
    let moved = path.with_coordinate(0, 0, Point::new(5.0, 5.0)).unwrap();
    assert_eq!(moved.to_string(), "M 5 5 L 100 0");
}

#[test]
fn retype_synthesizes_control_points_on_the_chord() {
    let path = Path::parse("M 0 0 L 90 30").unwrap();
    let quad = path.retype_segment(1, SvgCommand::Quadratic).unwrap();
    assert_eq!(quad.to_string(), "M 0 0 Q 45 15 90 30");
    let cubic = path.retype_segment(1, SvgCommand::Cubic).unwrap();
    assert_eq!(cubic.to_string(), "M 0 0 C 30 10 60 20 90 30");
}

#[test]
fn remove_segment_checks_bounds() {
    let path = Path::parse("M 0 0 L 100 0 L 200 0").unwrap();
    assert!(matches!(
        path.remove_segment(5),
        Err(EditError::IndexOutOfBounds { index: 5, len: 3 })
    ));
    let trimmed = path.remove_segment(2).unwrap();
    assert_eq!(trimmed.to_string(), "M 0 0 L 100 0");
}

#[test]
fn path_serde_round_trips_as_a_string() {
    let path = Path::parse("M 0 0 Q 50 50 100 0").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"M 0 0 Q 50 50 100 0\"");
    let back: Path = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
    assert!(serde_json::from_str::<Path>("\"L 1 2\"").is_err());
}
