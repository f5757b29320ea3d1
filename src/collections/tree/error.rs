//! Errors reported by tree operations and cursor moves.

use core::fmt;

/// The error type for [`AvlTree`](super::AvlTree) operations and cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The requested key is not stored in the tree, or the tree is empty.
    KeyNotFound,
    /// The key is already stored in the tree.
    KeyAlreadyExists,
    /// An argument was out of range or malformed.
    InvalidArgument(&'static str),
    /// A required input buffer was missing.
    NullArgument(&'static str),
    /// A cursor was moved onto an absent child.
    IterationExhausted,
    /// A cursor was moved above the root.
    AtRoot,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => f.write_str("key not found"),
            Self::KeyAlreadyExists => f.write_str("key already exists"),
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::NullArgument(what) => write!(f, "missing argument: {what}"),
            Self::IterationExhausted => f.write_str("cursor moved past a missing child"),
            Self::AtRoot => f.write_str("cursor is already at the root"),
        }
    }
}

impl std::error::Error for TreeError {}
