//! Errors reported by map operations and policy validation.

use crate::collections::tree::TreeError;
use core::fmt;

/// The error type for [`TreeHashMap`](super::TreeHashMap) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The key is not stored in the map.
    KeyNotFound,
    /// The key is already stored in the map.
    KeyAlreadyExists,
    /// A configuration value or argument was out of range.
    InvalidArgument(&'static str),
    /// A bucket tree rejected an operation.
    Tree(TreeError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => f.write_str("key not found"),
            Self::KeyAlreadyExists => f.write_str("key already exists"),
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::Tree(err) => write!(f, "bucket tree error: {err}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for MapError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::KeyNotFound => Self::KeyNotFound,
            TreeError::KeyAlreadyExists => Self::KeyAlreadyExists,
            other => Self::Tree(other),
        }
    }
}
