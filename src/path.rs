use std::fmt;

use crate::core::{BezPath, Point, Vec2};
use crate::error::{EditError, ParseError};
use crate::segment::{PathSegment, SvgCommand};

/// How far past the last point `append_segment` reaches, in field pixels.
const APPEND_REACH: f64 = 250.0;

/// An ordered sequence of [`PathSegment`]s, always starting with a Move.
///
/// A `Path` is never mutated in place: every edit returns a new instance, so
/// renderers and editors holding earlier snapshots are unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Result<Path, ParseError> {
        if segments.is_empty() {
            return Err(ParseError::EmptyPath);
        }
        if segments[0].command() != SvgCommand::Move {
            return Err(ParseError::MissingLeadingMove);
        }
        Ok(Path { segments })
    }

    /// Parses the compact path-string notation: single-letter commands, each
    /// followed by exactly the number of `x y` pairs its arity requires.
    pub fn parse(input: &str) -> Result<Path, ParseError> {
        let mut tokens = input.split_whitespace();
        let mut segments = Vec::new();
        while let Some(token) = tokens.next() {
            let command = SvgCommand::from_letter(token)
                .ok_or_else(|| ParseError::InvalidCommand(token.to_string()))?;
            let mut coordinates = Vec::with_capacity(command.arity());
            for pair in 0..command.arity() {
                let x = next_coordinate(&mut tokens, command, pair)?;
                let y = next_coordinate(&mut tokens, command, pair)?;
                coordinates.push(Point::new(x, y));
            }
            segments.push(PathSegment::new(command, coordinates)?);
        }
        Path::new(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total number of coordinate pairs across all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.coordinates().len()).sum()
    }

    pub fn first_point(&self) -> Point {
        // constructors guarantee a leading Move with one coordinate
        self.segments[0].coordinates()[0]
    }

    /// End point of the whole path, resolving a trailing Close to the first
    /// point of its sub-path.
    pub fn last_point(&self) -> Point {
        self.end_point_of(self.segments.len() - 1)
    }

    /// End point of the segment at `index`, resolving Close to the first
    /// point of the sub-path it terminates.
    pub fn end_point_of(&self, index: usize) -> Point {
        let mut sub_path_first = self.first_point();
        let mut current = sub_path_first;
        for segment in &self.segments[..=index] {
            match segment.command() {
                SvgCommand::Move => {
                    // end_point is always Some for Move
                    current = segment.end_point().unwrap_or(current);
                    sub_path_first = current;
                }
                SvgCommand::Close => current = sub_path_first,
                _ => current = segment.end_point().unwrap_or(current),
            }
        }
        current
    }

    /// Coordinate at `(segment_index, coordinate_index)`, if both are in
    /// bounds.
    pub fn coordinate_at(&self, segment_index: usize, coordinate_index: usize) -> Option<Point> {
        self.segments
            .get(segment_index)
            .and_then(|s| s.coordinates().get(coordinate_index))
            .copied()
    }

    /// New path with every coordinate of every segment translated.
    pub fn with_offset(&self, dx: f64, dy: f64) -> Path {
        let offset = Vec2::new(dx, dy);
        Path {
            segments: self.segments.iter().map(|s| s.with_offset(offset)).collect(),
        }
    }

    /// New path with one coordinate slot rewritten. Control-handle drags go
    /// through here; anchor coordinates may move, only their command is fixed.
    pub fn with_coordinate(
        &self,
        segment_index: usize,
        coordinate_index: usize,
        point: Point,
    ) -> Result<Path, EditError> {
        let segment = self
            .segments
            .get(segment_index)
            .ok_or(EditError::IndexOutOfBounds {
                index: segment_index,
                len: self.segments.len(),
            })?;
        let replaced = segment.with_coordinate(coordinate_index, point)?;
        let mut segments = self.segments.clone();
        segments[segment_index] = replaced;
        Ok(Path { segments })
    }

    /// Replaces the segment at `index` wholesale. The leading Move anchors
    /// the shape and cannot be replaced.
    pub fn replace_segment(&self, index: usize, segment: PathSegment) -> Result<Path, EditError> {
        if index >= self.segments.len() {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            });
        }
        if index == 0 {
            return Err(EditError::CannotEditAnchor);
        }
        let mut segments = self.segments.clone();
        segments[index] = segment;
        Ok(Path { segments })
    }

    /// Rebuilds the segment at `index` as `command`, keeping its end point and
    /// synthesizing control points along the chord from the previous end point
    /// (midpoint for quadratic, thirds for cubic).
    pub fn retype_segment(&self, index: usize, command: SvgCommand) -> Result<Path, EditError> {
        if index >= self.segments.len() {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            });
        }
        if index == 0 {
            return Err(EditError::CannotEditAnchor);
        }

        let end = self.end_point_of(index);
        let prev_end = self.end_point_of(index - 1);
        let chord = end - prev_end;

        let segment = match command {
            SvgCommand::Move => PathSegment::move_to(end),
            SvgCommand::Line => PathSegment::line_to(end),
            SvgCommand::Quadratic => PathSegment::quad_to(prev_end + chord / 2.0, end),
            SvgCommand::Cubic => PathSegment::cubic_to(
                prev_end + chord / 3.0,
                prev_end + chord * (2.0 / 3.0),
                end,
            ),
            SvgCommand::Close => PathSegment::close(),
        };
        self.replace_segment(index, segment)
    }

    /// Appends a Line segment 250 units past the last point, continuing the
    /// path's current left/right trend (second-to-last x vs last x).
    pub fn append_segment(&self) -> Path {
        let last = self.segments.last().expect("path is never empty");

        let last_coord = if last.command() == SvgCommand::Close {
            self.first_point()
        } else {
            last.end_point().unwrap_or_else(|| self.first_point())
        };

        let second_to_last = if last.command() == SvgCommand::Close {
            self.first_point()
        } else if last.coordinates().len() > 1 {
            last.coordinates()[last.coordinates().len() - 2]
        } else if self.segments.len() >= 2 {
            let prev = &self.segments[self.segments.len() - 2];
            prev.end_point().unwrap_or(last_coord)
        } else {
            Point::ZERO
        };

        let pointing_right = second_to_last.x <= last_coord.x;
        let reach = if pointing_right { APPEND_REACH } else { -APPEND_REACH };

        let mut segments = self.segments.clone();
        segments.push(PathSegment::line_to(Point::new(
            last_coord.x + reach,
            last_coord.y,
        )));
        Path { segments }
    }

    /// Removes the segment at `index`. No minimum segment count is enforced
    /// here; a path trimmed down to fewer than 2 points surfaces as
    /// `DegeneratePath` on the next distribution.
    pub fn remove_segment(&self, index: usize) -> Result<Path, EditError> {
        if index >= self.segments.len() {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            });
        }
        if index == 0 {
            return Err(EditError::CannotEditAnchor);
        }
        let mut segments = self.segments.clone();
        segments.remove(index);
        Ok(Path { segments })
    }

    /// Sub-path slices: each begins at a Move or immediately after a Close
    /// and runs to the next boundary or the end of the path.
    pub fn sub_paths(&self) -> Vec<&[PathSegment]> {
        let mut bounds = vec![0];
        for (i, segment) in self.segments.iter().enumerate().skip(1) {
            let starts_new = segment.command() == SvgCommand::Move
                || self.segments[i - 1].command() == SvgCommand::Close;
            if starts_new && bounds.last() != Some(&i) {
                bounds.push(i);
            }
        }
        bounds.push(self.segments.len());
        bounds
            .windows(2)
            .map(|w| &self.segments[w[0]..w[1]])
            .collect()
    }

    /// Lossy bridge into kurbo for measurement and rendering.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bez = BezPath::new();
        for segment in &self.segments {
            let coords = segment.coordinates();
            match segment.command() {
                SvgCommand::Move => bez.move_to(coords[0]),
                SvgCommand::Line => bez.line_to(coords[0]),
                SvgCommand::Quadratic => bez.quad_to(coords[0], coords[1]),
                SvgCommand::Cubic => bez.curve_to(coords[0], coords[1], coords[2]),
                SvgCommand::Close => bez.close_path(),
            }
        }
        bez
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

// persisted as the compact path string rather than a segment tree
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Path::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn next_coordinate<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    command: SvgCommand,
    pairs_seen: usize,
) -> Result<f64, ParseError> {
    let Some(token) = tokens.next() else {
        return Err(ParseError::ArityMismatch {
            command,
            expected: command.arity(),
            got: pairs_seen,
        });
    };
    if SvgCommand::from_letter(token).is_some() {
        // the next command started early; the pair count is short
        return Err(ParseError::ArityMismatch {
            command,
            expected: command.arity(),
            got: pairs_seen,
        });
    }
    token
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn parse_round_trips() {
        for s in [
            "M 0 0 L 100 100",
            "M 0 0 Q 50 0 100 100",
            "M 0 0 C 10 0 20 10 30 30 L 50 50 Z",
            "M 0 0 L 100 0 Z M 200 0 L 300 0",
        ] {
            let p = path(s);
            assert_eq!(Path::parse(&p.to_string()).unwrap(), p);
            assert_eq!(p.to_string(), s);
        }
    }

    #[test]
    fn parse_tolerates_trailing_whitespace() {
        assert_eq!(path("M 0 0 L 100 100  "), path("M 0 0 L 100 100"));
    }

    #[test]
    fn parse_rejects_unknown_command() {
        assert_eq!(
            Path::parse("M 0 0 A 1 1").unwrap_err(),
            ParseError::InvalidCommand("A".to_string())
        );
    }

    #[test]
    fn parse_rejects_short_pair_count() {
        let err = Path::parse("M 0 0 Q 50 0").unwrap_err();
        assert_eq!(
            err,
            ParseError::ArityMismatch {
                command: SvgCommand::Quadratic,
                expected: 2,
                got: 1,
            }
        );
    }

    #[test]
    fn parse_rejects_bad_number() {
        assert_eq!(
            Path::parse("M 0 zero").unwrap_err(),
            ParseError::InvalidNumber("zero".to_string())
        );
    }

    #[test]
    fn parse_requires_leading_move() {
        assert_eq!(Path::parse("").unwrap_err(), ParseError::EmptyPath);
        assert_eq!(
            Path::parse("L 1 1").unwrap_err(),
            ParseError::MissingLeadingMove
        );
    }

    #[test]
    fn with_offset_translates_every_coordinate() {
        let p = path("M 0 0 Q 50 0 100 100").with_offset(10.0, -5.0);
        assert_eq!(p.to_string(), "M 10 -5 Q 60 -5 110 95");
    }

    #[test]
    fn replace_segment_protects_the_anchor() {
        let p = path("M 0 0 L 100 100");
        let err = p
            .replace_segment(0, PathSegment::line_to(Point::ZERO))
            .unwrap_err();
        assert_eq!(err, EditError::CannotEditAnchor);
        assert!(matches!(
            p.replace_segment(5, PathSegment::close()).unwrap_err(),
            EditError::IndexOutOfBounds { index: 5, len: 2 }
        ));
    }

    #[test]
    fn retype_keeps_end_point_and_splits_the_chord() {
        let p = path("M 0 0 L 90 30");
        let quad = p.retype_segment(1, SvgCommand::Quadratic).unwrap();
        assert_eq!(quad.to_string(), "M 0 0 Q 45 15 90 30");
        let cubic = p.retype_segment(1, SvgCommand::Cubic).unwrap();
        assert_eq!(cubic.to_string(), "M 0 0 C 30 10 60 20 90 30");
        assert_eq!(
            p.retype_segment(0, SvgCommand::Line).unwrap_err(),
            EditError::CannotEditAnchor
        );
    }

    #[test]
    fn append_continues_the_trend() {
        // pointing right
        assert_eq!(
            path("M 0 0 L 100 0").append_segment().to_string(),
            "M 0 0 L 100 0 L 350 0"
        );
        // pointing left
        assert_eq!(
            path("M 100 0 L 0 0").append_segment().to_string(),
            "M 100 0 L 0 0 L -250 0"
        );
        // closed path appends from the sub-path's first point
        assert_eq!(
            path("M 0 0 L 100 0 Z").append_segment().to_string(),
            "M 0 0 L 100 0 Z L 250 0"
        );
    }

    #[test]
    fn remove_segment_allows_degenerate_results() {
        let p = path("M 0 0 L 100 0");
        let removed = p.remove_segment(1).unwrap();
        assert_eq!(removed.segment_count(), 1);
        assert!(removed.remove_segment(3).is_err());
    }

    #[test]
    fn sub_paths_split_on_move_and_close() {
        let p = path("M 0 0 L 10 0 Z M 20 0 L 30 0 M 40 0 L 50 0");
        let subs = p.sub_paths();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].len(), 3);
        assert_eq!(subs[1].len(), 2);
        assert_eq!(subs[2].len(), 2);
    }

    #[test]
    fn end_points_resolve_close() {
        let p = path("M 5 5 L 100 0 Z");
        assert_eq!(p.last_point(), Point::new(5.0, 5.0));
        assert_eq!(p.end_point_of(1), Point::new(100.0, 0.0));
    }
}
