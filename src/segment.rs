use std::fmt;

use crate::core::{Point, Vec2};
use crate::error::{EditError, ParseError};

/// The supported single-letter path commands.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SvgCommand {
    Move,
    Line,
    Quadratic,
    Cubic,
    Close,
}

impl SvgCommand {
    pub fn letter(self) -> char {
        match self {
            SvgCommand::Move => 'M',
            SvgCommand::Line => 'L',
            SvgCommand::Quadratic => 'Q',
            SvgCommand::Cubic => 'C',
            SvgCommand::Close => 'Z',
        }
    }

    pub fn from_letter(token: &str) -> Option<SvgCommand> {
        match token {
            "M" => Some(SvgCommand::Move),
            "L" => Some(SvgCommand::Line),
            "Q" => Some(SvgCommand::Quadratic),
            "C" => Some(SvgCommand::Cubic),
            "Z" => Some(SvgCommand::Close),
            _ => None,
        }
    }

    /// Number of coordinate pairs the command carries.
    pub fn arity(self) -> usize {
        match self {
            SvgCommand::Move | SvgCommand::Line => 1,
            SvgCommand::Quadratic => 2,
            SvgCommand::Cubic => 3,
            SvgCommand::Close => 0,
        }
    }
}

impl fmt::Display for SvgCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One vector-path command with its control/end coordinates.
///
/// Immutable once constructed: every edit produces a new segment, so
/// snapshots held by renderers stay valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathSegment {
    command: SvgCommand,
    coordinates: Vec<Point>,
}

impl PathSegment {
    /// Checked constructor: the coordinate count must exactly match the
    /// command's arity.
    pub fn new(command: SvgCommand, coordinates: Vec<Point>) -> Result<PathSegment, ParseError> {
        if coordinates.len() != command.arity() {
            return Err(ParseError::ArityMismatch {
                command,
                expected: command.arity(),
                got: coordinates.len(),
            });
        }
        Ok(PathSegment {
            command,
            coordinates,
        })
    }

    pub fn move_to(point: Point) -> PathSegment {
        PathSegment {
            command: SvgCommand::Move,
            coordinates: vec![point],
        }
    }

    pub fn line_to(point: Point) -> PathSegment {
        PathSegment {
            command: SvgCommand::Line,
            coordinates: vec![point],
        }
    }

    pub fn quad_to(control: Point, end: Point) -> PathSegment {
        PathSegment {
            command: SvgCommand::Quadratic,
            coordinates: vec![control, end],
        }
    }

    pub fn cubic_to(control1: Point, control2: Point, end: Point) -> PathSegment {
        PathSegment {
            command: SvgCommand::Cubic,
            coordinates: vec![control1, control2, end],
        }
    }

    pub fn close() -> PathSegment {
        PathSegment {
            command: SvgCommand::Close,
            coordinates: Vec::new(),
        }
    }

    /// Builds a segment from a flat `[x0, y0, x1, y1, ...]` array as imported
    /// from an external point list. An incomplete trailing pair is dropped
    /// with a warning; the pair count must still match the command's arity.
    pub fn from_flat(command: SvgCommand, values: &[f64]) -> Result<PathSegment, ParseError> {
        if values.len() % 2 != 0 {
            tracing::warn!(%command, count = values.len(), "incomplete coordinate pair; dropping trailing value");
        }
        let coordinates: Vec<Point> = values
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        PathSegment::new(command, coordinates)
    }

    pub fn command(&self) -> SvgCommand {
        self.command
    }

    pub fn coordinates(&self) -> &[Point] {
        &self.coordinates
    }

    /// The segment's own end coordinate. `None` for Close, whose end point is
    /// the enclosing sub-path's first point and is resolved at the path level.
    pub fn end_point(&self) -> Option<Point> {
        self.coordinates.last().copied()
    }

    /// New segment with every coordinate translated by `offset`.
    pub fn with_offset(&self, offset: Vec2) -> PathSegment {
        PathSegment {
            command: self.command,
            coordinates: self.coordinates.iter().map(|p| *p + offset).collect(),
        }
    }

    /// New segment with the coordinate at `index` replaced.
    pub fn with_coordinate(&self, index: usize, point: Point) -> Result<PathSegment, EditError> {
        if index >= self.coordinates.len() {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: self.coordinates.len(),
            });
        }
        let mut coordinates = self.coordinates.clone();
        coordinates[index] = point;
        Ok(PathSegment {
            command: self.command,
            coordinates,
        })
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for p in &self.coordinates {
            write!(f, " {} {}", p.x, p.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_is_enforced() {
        let err = PathSegment::new(SvgCommand::Quadratic, vec![Point::new(1.0, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            ParseError::ArityMismatch {
                command: SvgCommand::Quadratic,
                expected: 2,
                got: 1,
            }
        );

        let err = PathSegment::new(SvgCommand::Close, vec![Point::ZERO]).unwrap_err();
        assert!(matches!(err, ParseError::ArityMismatch { expected: 0, .. }));
    }

    #[test]
    fn display_matches_path_notation() {
        let seg = PathSegment::quad_to(Point::new(50.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(seg.to_string(), "Q 50 0 100 100");
        assert_eq!(PathSegment::close().to_string(), "Z");
    }

    #[test]
    fn from_flat_drops_incomplete_pair() {
        let seg = PathSegment::from_flat(SvgCommand::Line, &[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(seg.coordinates(), &[Point::new(10.0, 20.0)]);
    }

    #[test]
    fn with_coordinate_is_bounds_checked() {
        let seg = PathSegment::line_to(Point::new(5.0, 5.0));
        let moved = seg.with_coordinate(0, Point::new(9.0, 9.0)).unwrap();
        assert_eq!(moved.end_point(), Some(Point::new(9.0, 9.0)));
        // the source segment is untouched
        assert_eq!(seg.end_point(), Some(Point::new(5.0, 5.0)));
        assert!(seg.with_coordinate(1, Point::ZERO).is_err());
    }
}
