#![forbid(unsafe_code)]

pub mod coords;
pub mod core;
pub mod distribute;
pub mod error;
pub mod measure;
pub mod path;
pub mod segment;
pub mod session;
pub mod shape;

pub use core::{DistributedItem, ItemId, Point, ShapeId, Vec2};
pub use distribute::{Distributor, distribute_along_path};
pub use error::{DrillError, DrillResult};
pub use path::Path;
pub use segment::{PathSegment, SvgCommand};
pub use session::{EditLockRegistry, ShapeEditingSession};
pub use shape::{ShapeStore, StoredShape, create_line_path};
