use crate::core::ShapeId;
use crate::segment::SvgCommand;

pub type DrillResult<T> = Result<T, DrillError>;

/// Malformed path string or segment construction. Never auto-corrected; the
/// engine refuses to construct a path from invalid input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid path command '{0}'")]
    InvalidCommand(String),

    #[error("{command} expects {expected} coordinate pair(s), got {got}")]
    ArityMismatch {
        command: SvgCommand,
        expected: usize,
        got: usize,
    },

    #[error("invalid coordinate value '{0}'")]
    InvalidNumber(String),

    #[error("path has no segments")]
    EmptyPath,

    #[error("path must start with a Move segment")]
    MissingLeadingMove,
}

/// Structural edit request violating a path invariant. Rejected before any
/// mutation occurs.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("segment 0 anchors the shape and cannot be edited")]
    CannotEditAnchor,

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionError {
    #[error("path has {points} point(s); at least 2 are required to distribute")]
    DegeneratePath { points: usize },
}

/// Editing-session lifecycle violations. These are programming errors on the
/// caller's side and fail fast rather than writing to the wrong slot.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("shape {0:?} already has an enabled editing session")]
    AlreadyEnabled(ShapeId),

    #[error("no control handle with arena index {0}")]
    UnknownHandle(usize),

    #[error(
        "control handle points at segment {segment_index} coordinate {coordinate_index}, \
         which no longer exists; re-enable editing to rebuild handles"
    )]
    StaleHandle {
        segment_index: usize,
        coordinate_index: usize,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum DrillError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
