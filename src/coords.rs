//! Conversions between persisted field coordinates and render-space
//! coordinates, plus the snap-to-step rounding policy.
//!
//! Persisted coordinates are where an item's visual anchor (its "dot")
//! sits on the field, independent of any selection grouping. Render space
//! is where the item's composite object must be placed so the dot lands
//! there, including the half-stroke shift that centers dots on grid lines.

use crate::core::{Affine, GRID_STROKE_WIDTH, PIXELS_PER_STEP, Point, Vec2};

/// Half the grid stroke width, applied on both axes in every conversion.
pub const GRID_OFFSET: f64 = GRID_STROKE_WIDTH / 2.0;

// snap rounding cleans up to 3 decimal places to suppress float noise
const EPSILON: f64 = 10e2;

/// Render-space description of a distributable item: its anchor offset is
/// the delta between the composite object's origin and the dot's center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemFrame {
    pub anchor_offset: Vec2,
}

/// A transient multi-select group the item is a passive member of.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupContext {
    /// Group-local to absolute render-space transform.
    pub transform: Affine,
    /// Current rotation of the group, radians.
    pub angle_rad: f64,
}

/// Where the item's composite object must be placed so its dot lands on the
/// persisted coordinate. Inside a group the target is mapped through the
/// group's inverse transform and corrected by the anchor offset rotated to
/// the group's angle.
pub fn field_to_canvas(field: Point, frame: ItemFrame, group: Option<GroupContext>) -> Point {
    let absolute = Point::new(field.x + GRID_OFFSET, field.y + GRID_OFFSET);
    match group {
        Some(g) => {
            let local = g.transform.inverse() * absolute;
            local - rotate(frame.anchor_offset, g.angle_rad)
        }
        None => absolute - frame.anchor_offset,
    }
}

/// Inverse of [`field_to_canvas`]: the persisted coordinate of the dot given
/// the composite object's render-space position.
pub fn canvas_to_field(canvas: Point, frame: ItemFrame, group: Option<GroupContext>) -> Point {
    let absolute = match group {
        Some(g) => g.transform * (canvas + rotate(frame.anchor_offset, g.angle_rad)),
        None => canvas + frame.anchor_offset,
    };
    Point::new(absolute.x - GRID_OFFSET, absolute.y - GRID_OFFSET)
}

fn rotate(v: Vec2, angle_rad: f64) -> Vec2 {
    let (sin, cos) = angle_rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Step grid the snap policy rounds against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldGrid {
    /// Field origin steps are measured from (the center-front point).
    pub origin: Point,
    pub pixels_per_step: f64,
}

impl Default for FieldGrid {
    fn default() -> Self {
        FieldGrid {
            origin: Point::ZERO,
            pixels_per_step: PIXELS_PER_STEP,
        }
    }
}

/// Configuration-driven rounding: `nearest_*_steps` of `None` (or zero)
/// leaves the axis unrounded; `lock_*` suppresses movement on the axis
/// entirely rather than merely rounding it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapSettings {
    pub nearest_x_steps: Option<f64>,
    pub nearest_y_steps: Option<f64>,
    pub lock_x: bool,
    pub lock_y: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapPolicy {
    pub grid: FieldGrid,
    pub settings: SnapSettings,
}

impl SnapPolicy {
    /// Rounds both axes to their configured nearest step multiple.
    pub fn round(&self, point: Point) -> Point {
        Point::new(
            self.round_axis(point.x, self.grid.origin.x, self.settings.nearest_x_steps),
            self.round_axis(point.y, self.grid.origin.y, self.settings.nearest_y_steps),
        )
    }

    /// Applies the full policy to an in-progress drag: rounding (skipped when
    /// the caller signals the precision modifier) and per-axis locks, which
    /// pin the axis to its drag-origin value.
    pub fn apply(&self, candidate: Point, drag_origin: Point, bypass_rounding: bool) -> Point {
        let mut out = if bypass_rounding {
            candidate
        } else {
            self.round(candidate)
        };
        if self.settings.lock_x {
            out.x = drag_origin.x;
        }
        if self.settings.lock_y {
            out.y = drag_origin.y;
        }
        out
    }

    fn round_axis(&self, value: f64, origin: f64, nearest: Option<f64>) -> f64 {
        let Some(nearest) = nearest.filter(|n| *n > 0.0) else {
            return value;
        };
        let steps_from_origin = (value - origin) / self.grid.pixels_per_step;
        if steps_from_origin == 0.0 {
            return value;
        }
        let denominator = 1.0 / nearest;
        let rounded_steps = (steps_from_origin * denominator).round() / denominator;
        round_epsilon(rounded_steps * self.grid.pixels_per_step + origin)
    }
}

fn round_epsilon(value: f64) -> f64 {
    (value * EPSILON).round() / EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn ungrouped_conversion_round_trips() {
        let frame = ItemFrame {
            anchor_offset: Vec2::new(3.0, -7.0),
        };
        let field = Point::new(120.0, 80.0);
        let canvas = field_to_canvas(field, frame, None);
        assert_eq!(
            canvas,
            Point::new(120.0 + GRID_OFFSET - 3.0, 80.0 + GRID_OFFSET + 7.0)
        );
        assert_close(canvas_to_field(canvas, frame, None), field);
    }

    #[test]
    fn identity_group_matches_ungrouped() {
        let frame = ItemFrame {
            anchor_offset: Vec2::new(2.0, 5.0),
        };
        let group = GroupContext {
            transform: Affine::IDENTITY,
            angle_rad: 0.0,
        };
        let field = Point::new(40.0, 60.0);
        assert_close(
            field_to_canvas(field, frame, Some(group)),
            field_to_canvas(field, frame, None),
        );
    }

    #[test]
    fn rotated_group_round_trips() {
        let frame = ItemFrame {
            anchor_offset: Vec2::new(4.0, 1.0),
        };
        let group = GroupContext {
            transform: Affine::translate((30.0, 10.0)) * Affine::rotate(FRAC_PI_2),
            angle_rad: FRAC_PI_2,
        };
        let field = Point::new(75.0, -20.0);
        let canvas = field_to_canvas(field, frame, Some(group));
        assert_close(canvas_to_field(canvas, frame, Some(group)), field);
    }

    #[test]
    fn snap_rounds_to_whole_steps() {
        let policy = SnapPolicy {
            grid: FieldGrid::default(),
            settings: SnapSettings {
                nearest_x_steps: Some(1.0),
                nearest_y_steps: Some(1.0),
                ..SnapSettings::default()
            },
        };
        assert_eq!(
            policy.round(Point::new(53.2, 47.9)),
            Point::new(50.0, 50.0)
        );
        // quarter steps
        let quarter = SnapPolicy {
            settings: SnapSettings {
                nearest_x_steps: Some(0.25),
                nearest_y_steps: Some(0.25),
                ..SnapSettings::default()
            },
            ..policy
        };
        assert_eq!(quarter.round(Point::new(53.2, 0.0)), Point::new(52.5, 0.0));
    }

    #[test]
    fn bypass_skips_rounding_but_locks_still_hold() {
        let policy = SnapPolicy {
            grid: FieldGrid::default(),
            settings: SnapSettings {
                nearest_x_steps: Some(1.0),
                nearest_y_steps: Some(1.0),
                lock_y: true,
                ..SnapSettings::default()
            },
        };
        let origin = Point::new(10.0, 20.0);
        let out = policy.apply(Point::new(53.2, 90.0), origin, true);
        assert_eq!(out, Point::new(53.2, 20.0));
        let snapped = policy.apply(Point::new(53.2, 90.0), origin, false);
        assert_eq!(snapped, Point::new(50.0, 20.0));
    }

    #[test]
    fn unconfigured_axes_pass_through() {
        let policy = SnapPolicy::default();
        let p = Point::new(13.37, -4.2);
        assert_eq!(policy.round(p), p);
    }
}
