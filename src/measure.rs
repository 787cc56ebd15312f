use kurbo::{CubicBez, Line, ParamCurve, ParamCurveArclen, PathSeg, QuadBez};

use crate::core::Point;
use crate::path::Path;
use crate::segment::{PathSegment, SvgCommand};

/// One simple command with an explicit start point, cut out of a [`Path`].
///
/// A Close is synthesized into a Line back to the first point of its
/// sub-path, so every sub-segment is measurable on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct SubSegment {
    start: Point,
    segment: PathSegment,
    synthesized_close: bool,
}

impl SubSegment {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segment(&self) -> &PathSegment {
        &self.segment
    }

    /// Whether this sub-segment stands in for a Close command.
    pub fn synthesized_close(&self) -> bool {
        self.synthesized_close
    }

    pub fn end_point(&self) -> Point {
        self.segment.end_point().unwrap_or(self.start)
    }

    /// The synthetic single-segment path string fed to external measurement
    /// collaborators, e.g. `"M 0 0 L 100 100"`.
    pub fn to_path_string(&self) -> String {
        format!("M {} {} {}", self.start.x, self.start.y, self.segment)
    }

    fn to_path_seg(&self) -> PathSeg {
        let coords = self.segment.coordinates();
        match self.segment.command() {
            SvgCommand::Line => PathSeg::Line(Line::new(self.start, coords[0])),
            SvgCommand::Quadratic => PathSeg::Quad(QuadBez::new(self.start, coords[0], coords[1])),
            SvgCommand::Cubic => {
                PathSeg::Cubic(CubicBez::new(self.start, coords[0], coords[1], coords[2]))
            }
            // split_into_sub_segments never emits these
            SvgCommand::Move | SvgCommand::Close => {
                PathSeg::Line(Line::new(self.start, self.start))
            }
        }
    }
}

/// Splits a path into measurable sub-segments, reconstructing each start
/// point from the previous segment's end and converting Close into an
/// explicit Line back to the sub-path's first point.
pub fn split_into_sub_segments(path: &Path) -> Vec<SubSegment> {
    let mut subs = Vec::new();
    let mut current = path.first_point();
    let mut sub_path_first = current;

    for segment in path.segments() {
        match segment.command() {
            SvgCommand::Move => {
                current = segment.end_point().unwrap_or(current);
                sub_path_first = current;
            }
            SvgCommand::Close => {
                subs.push(SubSegment {
                    start: current,
                    segment: PathSegment::line_to(sub_path_first),
                    synthesized_close: true,
                });
                current = sub_path_first;
            }
            _ => {
                let end = segment.end_point().unwrap_or(current);
                subs.push(SubSegment {
                    start: current,
                    segment: segment.clone(),
                    synthesized_close: false,
                });
                current = end;
            }
        }
    }
    subs
}

/// Arc-length queries over a single sub-segment. This is the seam to the
/// render-primitive collaborator; the engine only ever calls it, never owns
/// what is behind it.
pub trait PathMeasure {
    /// Total arc length of the sub-segment.
    fn length(&self, sub: &SubSegment) -> f64;

    /// Point at `distance` along the sub-segment's arc, clamped to its ends.
    fn point_at_length(&self, sub: &SubSegment, distance: f64) -> Point;
}

/// Production measurement backed by kurbo's arc-length solver.
#[derive(Clone, Copy, Debug)]
pub struct KurboMeasure {
    pub accuracy: f64,
}

impl Default for KurboMeasure {
    fn default() -> Self {
        KurboMeasure { accuracy: 1e-9 }
    }
}

impl PathMeasure for KurboMeasure {
    fn length(&self, sub: &SubSegment) -> f64 {
        sub.to_path_seg().arclen(self.accuracy)
    }

    fn point_at_length(&self, sub: &SubSegment, distance: f64) -> Point {
        let seg = sub.to_path_seg();
        let total = seg.arclen(self.accuracy);
        if total <= 0.0 {
            return sub.start();
        }
        if distance <= 0.0 {
            return sub.start();
        }
        let distance = distance.clamp(0.0, total);
        let t = match seg {
            // lines are linear in arc length; skip the solver for exactness
            PathSeg::Line(_) => distance / total,
            _ => seg.inv_arclen(distance, self.accuracy),
        };
        seg.eval(t)
    }
}
