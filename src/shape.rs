//! Persisted shapes: a named path plus the ordered items distributed on it.
//!
//! [`StoredShape`] owns the canonical path string and item list; every
//! structural edit redistributes the items and writes the result through the
//! caller's [`ShapeStore`].

use crate::core::{DistributedItem, ItemId, Point, ShapeId};
use crate::distribute::Distributor;
use crate::error::DrillResult;
use crate::measure::PathMeasure;
use crate::path::Path;
use crate::segment::{PathSegment, SvgCommand};

/// Persistence seam. Implementations write the shape's path string and the
/// items' new positions in one call so the two never diverge on disk.
pub trait ShapeStore {
    fn save_shape(
        &mut self,
        shape_id: ShapeId,
        path: &str,
        items: &[DistributedItem],
    ) -> DrillResult<()>;
}

/// The default geometry for a brand-new shape: a straight line.
pub fn create_line_path(start: Point, end: Point) -> Path {
    let segments = vec![PathSegment::move_to(start), PathSegment::line_to(end)];
    Path::new(segments).unwrap_or_else(|_| unreachable!("line path is always well formed"))
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StoredShape {
    pub shape_id: ShapeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    path: Path,
    item_ids: Vec<ItemId>,
}

impl StoredShape {
    /// Creates a line-shaped drill shape, distributes the items along it, and
    /// persists the result.
    #[tracing::instrument(skip(distributor, store, items), fields(items = items.len()))]
    pub fn create<M: PathMeasure>(
        shape_id: ShapeId,
        name: impl Into<String> + std::fmt::Debug,
        start: Point,
        end: Point,
        items: Vec<ItemId>,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<(StoredShape, Vec<DistributedItem>)> {
        let shape = StoredShape {
            shape_id,
            name: name.into(),
            notes: None,
            path: create_line_path(start, end),
            item_ids: items,
        };
        let placed = shape.redistribute_and_save(distributor, store)?;
        Ok((shape, placed))
    }

    pub fn from_path(shape_id: ShapeId, name: impl Into<String>, path: Path, items: Vec<ItemId>) -> StoredShape {
        StoredShape {
            shape_id,
            name: name.into(),
            notes: None,
            path,
            item_ids: items,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Recomputes item positions along the current path without persisting.
    pub fn distribute<M: PathMeasure>(
        &self,
        distributor: &Distributor<M>,
    ) -> DrillResult<Vec<DistributedItem>> {
        Ok(distributor.distribute(&self.path, &self.item_ids)?)
    }

    /// Extends the path with a heuristically placed new segment.
    #[tracing::instrument(skip(self, distributor, store), fields(shape = self.shape_id.0))]
    pub fn append_segment<M: PathMeasure>(
        &mut self,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<Vec<DistributedItem>> {
        self.path = self.path.append_segment();
        self.redistribute_and_save(distributor, store)
    }

    #[tracing::instrument(skip(self, distributor, store), fields(shape = self.shape_id.0))]
    pub fn remove_segment<M: PathMeasure>(
        &mut self,
        index: usize,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<Vec<DistributedItem>> {
        self.path = self.path.remove_segment(index)?;
        self.redistribute_and_save(distributor, store)
    }

    /// Changes a segment's command while keeping its end point fixed.
    #[tracing::instrument(skip(self, distributor, store), fields(shape = self.shape_id.0))]
    pub fn retype_segment<M: PathMeasure>(
        &mut self,
        index: usize,
        command: SvgCommand,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<Vec<DistributedItem>> {
        self.path = self.path.retype_segment(index, command)?;
        self.redistribute_and_save(distributor, store)
    }

    /// Replaces the whole path, as after an editing session commits.
    pub fn update_path<M: PathMeasure>(
        &mut self,
        path: Path,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<Vec<DistributedItem>> {
        self.path = path;
        self.redistribute_and_save(distributor, store)
    }

    fn redistribute_and_save<M: PathMeasure>(
        &self,
        distributor: &Distributor<M>,
        store: &mut impl ShapeStore,
    ) -> DrillResult<Vec<DistributedItem>> {
        let placed = distributor.distribute(&self.path, &self.item_ids)?;
        store.save_shape(self.shape_id, &self.path.to_string(), &placed)?;
        Ok(placed)
    }
}
