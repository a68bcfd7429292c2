//! Errors raised by normalizing maps

use super::key::Key;
use std::fmt;

/// Errors that can occur while building, reading or mutating a map
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// A construction source of an unsupported kind, or an argument that cannot be used
    InvalidArgument(String),
    /// An element of a pair sequence that is not a two-element pair
    MalformedEntry { index: usize, len: usize },
    /// No entry exists for the normalized form of this (original) key
    KeyNotFound(Key),
    /// The raw key is a mutable container and cannot be hashed
    UnhashableKey(&'static str),
    /// A non-string key offered to a map that only accepts string keys
    TypeWildcardRejected(Key),
    /// Field-style access missed; wraps the underlying [`MapError::KeyNotFound`]
    AttributeNotFound(Box<MapError>),
    /// Field-style access through a name reserved for map configuration
    ReservedName(String),
    /// A configuration control that does not exist
    UnknownControl(String),
    /// `popitem` on a map without entries
    EmptyMap,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MapError::MalformedEntry { index, len } => write!(
                f,
                "Entry #{} of the pair sequence has length {}; 2 is required",
                index, len
            ),
            MapError::KeyNotFound(key) => {
                write!(f, "Missing key of some case variant of {}", key)
            }
            MapError::UnhashableKey(kind) => write!(f, "Unhashable key of kind '{}'", kind),
            MapError::TypeWildcardRejected(key) => write!(
                f,
                "Key must be a str, not {} (got {})",
                key.kind(),
                key
            ),
            MapError::AttributeNotFound(inner) => write!(f, "Attribute not found: {}", inner),
            MapError::ReservedName(name) => write!(
                f,
                "'{}' is reserved for map configuration and cannot address an entry",
                name
            ),
            MapError::UnknownControl(name) => write!(f, "Unknown control '{}'", name),
            MapError::EmptyMap => write!(f, "The map is empty"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::AttributeNotFound(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::InvalidArgument(err.to_string())
    }
}
