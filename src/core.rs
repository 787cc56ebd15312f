pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Identifier of a distributable item (a marcher row in the caller's store).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ItemId(pub i64);

/// Identifier of a persisted shape row.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ShapeId(pub i64);

/// One row of a distribution pass: where an item lands on the path, in the
/// path's native coordinate space. Computed fresh on every pass; the engine
/// never retains these.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DistributedItem {
    pub id: ItemId,
    pub position: Point,
}

/// Stroke width of the rendered field grid. Dot anchors are shifted by half
/// of this on both axes so they sit on the visual center of a grid line.
pub const GRID_STROKE_WIDTH: f64 = 1.0;

/// Pixels per whole field step; snap rounding works in step units.
pub const PIXELS_PER_STEP: f64 = 10.0;
