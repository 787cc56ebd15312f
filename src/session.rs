//! Interactive shape editing: control handles over a live path snapshot,
//! drag handling with snap, and a commit/cancel lifecycle against a
//! [`ShapeStore`].
//!
//! The session never mutates a path in place. Every edit produces a new
//! [`Path`] snapshot in `live_path`; `committed_path` holds the last state
//! written to the store, and [`ShapeEditingSession::cancel`] restores it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::core::{DistributedItem, ItemId, Point, ShapeId, Vec2};
use crate::coords::SnapPolicy;
use crate::distribute::Distributor;
use crate::error::{DrillResult, SessionError};
use crate::measure::PathMeasure;
use crate::path::Path;
use crate::segment::SvgCommand;
use crate::shape::ShapeStore;

/// Opaque id for an object the render surface placed on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveId(pub u64);

/// Drawing seam the session renders through. Implementations own the actual
/// canvas objects; the session only tracks their ids.
pub trait RenderSurface {
    fn add_handle(&mut self, handle_index: usize, at: Point) -> PrimitiveId;
    fn add_connector(&mut self, from: Point, to: Point) -> PrimitiveId;
    fn move_handle(&mut self, id: PrimitiveId, to: Point);
    fn set_connector(&mut self, id: PrimitiveId, from: Point, to: Point);
    fn remove(&mut self, id: PrimitiveId);
    fn bring_to_front(&mut self, id: PrimitiveId);
    /// Toggles the shape outline between its editable and static styling.
    fn set_editable_styling(&mut self, editable: bool);
}

/// A live, movable item the session repositions as the path changes.
/// `commit` distinguishes a final placement from drag-preview motion.
pub trait DistributedItemHandle {
    fn id(&self) -> ItemId;
    fn position(&self) -> Point;
    fn set_position(&mut self, to: Point, commit: bool);
}

/// One control point in the handle arena. `position` and `original` are in
/// the path's stored coordinate space, before the session's move offset.
#[derive(Clone, Copy, Debug)]
pub struct ControlHandle {
    pub segment_index: usize,
    pub coordinate_index: usize,
    pub position: Point,
    pub original: Point,
    /// Arena index of the neighbor a connector line is drawn from.
    pub incoming: Option<usize>,
    pub outgoing: Option<usize>,
    primitive: PrimitiveId,
    connector: Option<PrimitiveId>,
}

/// Whole-shape translation accumulated while the parent object is dragged.
/// Folded into the path coordinates on commit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveOffset {
    pub initial_position: Point,
    pub from_initial: Vec2,
}

/// Grants one enabled session per shape. Cheap to clone; all clones share
/// the lock set.
#[derive(Clone, Default)]
pub struct EditLockRegistry {
    locked: Rc<RefCell<HashSet<ShapeId>>>,
}

impl EditLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self, shape_id: ShapeId) -> bool {
        self.locked.borrow().contains(&shape_id)
    }

    pub fn acquire(&self, shape_id: ShapeId) -> Result<EditLock, SessionError> {
        if !self.locked.borrow_mut().insert(shape_id) {
            return Err(SessionError::AlreadyEnabled(shape_id));
        }
        Ok(EditLock {
            shape_id,
            registry: self.clone(),
        })
    }
}

/// Released on drop, so a session that goes away mid-edit frees its shape.
pub struct EditLock {
    shape_id: ShapeId,
    registry: EditLockRegistry,
}

impl Drop for EditLock {
    fn drop(&mut self) {
        self.registry.locked.borrow_mut().remove(&self.shape_id);
    }
}

pub struct ShapeEditingSession<M: PathMeasure, S: RenderSurface, P: ShapeStore> {
    shape_id: ShapeId,
    live_path: Path,
    committed_path: Path,
    handles: Vec<ControlHandle>,
    move_offset: MoveOffset,
    dirty: bool,
    enabled: bool,
    lock: Option<EditLock>,
    registry: EditLockRegistry,
    distributor: Distributor<M>,
    surface: S,
    store: P,
    items: Vec<Box<dyn DistributedItemHandle>>,
    committed_positions: Vec<DistributedItem>,
}

impl<M: PathMeasure, S: RenderSurface, P: ShapeStore> ShapeEditingSession<M, S, P> {
    /// Builds a session over `path` and performs the initial distribution.
    /// Nothing is persisted until an edit marks the session dirty.
    pub fn new(
        shape_id: ShapeId,
        path: Path,
        items: Vec<Box<dyn DistributedItemHandle>>,
        distributor: Distributor<M>,
        surface: S,
        store: P,
        registry: EditLockRegistry,
    ) -> DrillResult<Self> {
        let mut session = ShapeEditingSession {
            shape_id,
            committed_path: path.clone(),
            live_path: path,
            handles: Vec::new(),
            move_offset: MoveOffset::default(),
            dirty: false,
            enabled: false,
            lock: None,
            registry,
            distributor,
            surface,
            store,
            items,
            committed_positions: Vec::new(),
        };
        session.redistribute(true)?;
        Ok(session)
    }

    pub fn shape_id(&self) -> ShapeId {
        self.shape_id
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    pub fn committed_path(&self) -> &Path {
        &self.committed_path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn handles(&self) -> &[ControlHandle] {
        &self.handles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Shows the control handles and switches the outline to editable
    /// styling. Idempotent; fails if another session holds the shape.
    #[tracing::instrument(skip(self), fields(shape = self.shape_id.0))]
    pub fn enable(&mut self) -> DrillResult<()> {
        if self.enabled {
            return Ok(());
        }
        self.lock = Some(self.registry.acquire(self.shape_id)?);
        self.build_handles();
        self.surface.set_editable_styling(true);
        self.enabled = true;
        tracing::debug!(handles = self.handles.len(), "editing enabled");
        Ok(())
    }

    /// Tears the handles down and releases the shape. Idempotent.
    #[tracing::instrument(skip(self), fields(shape = self.shape_id.0))]
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        for handle in self.handles.drain(..) {
            if let Some(connector) = handle.connector {
                self.surface.remove(connector);
            }
            self.surface.remove(handle.primitive);
        }
        self.surface.set_editable_styling(false);
        self.lock = None;
        self.enabled = false;
    }

    /// Moves one control handle to `target` (a display-space point), applying
    /// the snap policy relative to the handle's drag origin, and rebuilds the
    /// live path and item positions as a preview.
    #[tracing::instrument(skip(self, snap), fields(shape = self.shape_id.0))]
    pub fn handle_drag_move(
        &mut self,
        handle_index: usize,
        target: Point,
        snap: &SnapPolicy,
        bypass_rounding: bool,
    ) -> DrillResult<()> {
        let offset = self.move_offset.from_initial;
        let handle = self
            .handles
            .get(handle_index)
            .copied()
            .ok_or(SessionError::UnknownHandle(handle_index))?;
        let drag_origin = handle.original + offset;
        let rounded = snap.apply(target, drag_origin, bypass_rounding);
        let stored = rounded - offset;
        self.live_path = self
            .live_path
            .with_coordinate(handle.segment_index, handle.coordinate_index, stored)
            .map_err(|_| SessionError::StaleHandle {
                segment_index: handle.segment_index,
                coordinate_index: handle.coordinate_index,
            })?;
        self.handles[handle_index].position = stored;
        self.dirty = true;
        self.surface.move_handle(handle.primitive, rounded);
        self.refresh_connectors();
        self.surface.bring_to_front(handle.primitive);
        self.redistribute(false)?;
        Ok(())
    }

    /// Translates the whole shape by `delta` as a live preview, keeping the
    /// stored path untouched until commit.
    pub fn apply_live_delta(&mut self, delta: Vec2) {
        self.move_offset.from_initial = delta;
        self.dirty = true;
        for i in 0..self.handles.len() {
            let handle = self.handles[i];
            self.surface
                .move_handle(handle.primitive, handle.position + delta);
        }
        self.refresh_connectors();
        for (item, committed) in self.items.iter_mut().zip(&self.committed_positions) {
            item.set_position(committed.position + delta, false);
        }
    }

    /// Folds the move offset into the path, finalizes item positions, and
    /// persists through the store if anything changed. Persisting happens at
    /// most once per dirty cycle.
    #[tracing::instrument(skip(self), fields(shape = self.shape_id.0, dirty = self.dirty))]
    pub fn commit(&mut self) -> DrillResult<()> {
        let offset = self.move_offset.from_initial;
        if offset != Vec2::ZERO {
            self.live_path = self.live_path.with_offset(offset.x, offset.y);
        }
        self.move_offset = MoveOffset::default();
        self.committed_path = self.live_path.clone();
        self.sync_handles_to_path();
        self.redistribute(true)?;
        if self.dirty {
            self.store.save_shape(
                self.shape_id,
                &self.live_path.to_string(),
                &self.committed_positions,
            )?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Throws away uncommitted edits and restores the last committed state.
    #[tracing::instrument(skip(self), fields(shape = self.shape_id.0))]
    pub fn cancel(&mut self) {
        self.live_path = self.committed_path.clone();
        self.move_offset = MoveOffset::default();
        self.dirty = false;
        self.sync_handles_to_path();
        for (item, committed) in self.items.iter_mut().zip(&self.committed_positions) {
            item.set_position(committed.position, true);
        }
    }

    /// Replaces the path entirely (for example after a structural edit made
    /// outside the session), rebuilding handles if editing was enabled.
    pub fn set_path(&mut self, path: Path) -> DrillResult<()> {
        let was_enabled = self.enabled;
        self.disable();
        self.live_path = path.clone();
        self.committed_path = path;
        self.move_offset = MoveOffset::default();
        self.redistribute(true)?;
        if was_enabled {
            self.enable()?;
        }
        Ok(())
    }

    fn redistribute(&mut self, commit: bool) -> DrillResult<()> {
        let ids: Vec<ItemId> = self.items.iter().map(|item| item.id()).collect();
        let mut placed = self.distributor.distribute(&self.live_path, &ids)?;
        let offset = self.move_offset.from_initial;
        for item in &mut placed {
            item.position += offset;
        }
        for (handle, target) in self.items.iter_mut().zip(&placed) {
            handle.set_position(target.position, commit);
        }
        if commit {
            self.committed_positions = placed;
        }
        Ok(())
    }

    /// Flat arena of one handle per path coordinate. Handles on curve
    /// segments link back to the previously pushed handle so their control
    /// arms can be drawn; straight segments draw no arms.
    fn build_handles(&mut self) {
        self.handles.clear();
        let offset = self.move_offset.from_initial;
        let mut links: Vec<(usize, usize)> = Vec::new();
        for (segment_index, segment) in self.live_path.segments().iter().enumerate() {
            for (coordinate_index, &point) in segment.coordinates().iter().enumerate() {
                let index = self.handles.len();
                let incoming = (segment_index > 0
                    && segment.command() != SvgCommand::Line
                    && index > 0)
                    .then(|| index - 1);
                if let Some(from) = incoming {
                    links.push((from, index));
                }
                let primitive = self.surface.add_handle(index, point + offset);
                self.handles.push(ControlHandle {
                    segment_index,
                    coordinate_index,
                    position: point,
                    original: point,
                    incoming,
                    outgoing: None,
                    primitive,
                    connector: None,
                });
            }
        }
        for (from, to) in links {
            self.handles[from].outgoing = Some(to);
            let a = self.handles[from].position + offset;
            let b = self.handles[to].position + offset;
            let connector = self.surface.add_connector(a, b);
            self.handles[from].connector = Some(connector);
        }
        for handle in &self.handles {
            self.surface.bring_to_front(handle.primitive);
        }
    }

    fn refresh_connectors(&mut self) {
        let offset = self.move_offset.from_initial;
        for i in 0..self.handles.len() {
            let handle = self.handles[i];
            let (Some(connector), Some(outgoing)) = (handle.connector, handle.outgoing) else {
                continue;
            };
            let from = handle.position + offset;
            let to = self.handles[outgoing].position + offset;
            self.surface.set_connector(connector, from, to);
        }
    }

    fn sync_handles_to_path(&mut self) {
        for i in 0..self.handles.len() {
            let (segment_index, coordinate_index) =
                (self.handles[i].segment_index, self.handles[i].coordinate_index);
            if let Some(point) = self.live_path.coordinate_at(segment_index, coordinate_index) {
                self.handles[i].position = point;
                self.handles[i].original = point;
                let primitive = self.handles[i].primitive;
                self.surface.move_handle(primitive, point);
            }
        }
        self.refresh_connectors();
    }
}
