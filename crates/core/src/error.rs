//! Error types for encode and decode
//!
//! One enum serves both directions. Every structural variant carries the
//! [`Path`] at which the problem was found; the codec fails atomically, so an
//! error means no partial value was produced.

use crate::path::Path;
use std::fmt::Display;
use thiserror::Error;

/// Error produced by any encode, decode, or projection operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The wire value's runtime shape does not match the requested type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the target required.
        expected: &'static str,
        /// The wire shape actually present.
        found: &'static str,
        /// Where the mismatch occurred.
        path: Path,
    },

    /// A required field was absent from a fields map.
    #[error("key not found at {path}: `{key}`")]
    KeyNotFound {
        /// The missing field name.
        key: String,
        /// The container the lookup ran against.
        path: Path,
    },

    /// A literal could not be interpreted (bad boolean/date/number text,
    /// malformed blob payload).
    #[error("corrupted data at {path}: {detail}")]
    DataCorrupted {
        /// What was malformed.
        detail: String,
        /// Where the literal was found.
        path: Path,
    },

    /// A keyed (map) value was encountered where the active projection has
    /// no wire representation for maps.
    #[error("unsupported shape at {path}: keyed values have no wire form in this context")]
    UnsupportedShape {
        /// Where the keyed value sat.
        path: Path,
    },

    /// An array cursor was advanced past the end of its container.
    #[error("container exhausted at {path}")]
    Exhausted {
        /// The container that ran dry.
        path: Path,
    },

    /// Free-form message raised through the serde error traits.
    #[error("{0}")]
    Message(String),
}

impl CodecError {
    /// Shorthand for [`CodecError::TypeMismatch`].
    pub fn mismatch(expected: &'static str, found: &'static str, path: Path) -> Self {
        CodecError::TypeMismatch {
            expected,
            found,
            path,
        }
    }

    /// Shorthand for [`CodecError::DataCorrupted`].
    pub fn corrupted(detail: impl Into<String>, path: Path) -> Self {
        CodecError::DataCorrupted {
            detail: detail.into(),
            path,
        }
    }
}

impl serde::ser::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        CodecError::Message(msg.to_string())
    }
}

impl serde::de::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        CodecError::Message(msg.to_string())
    }

    // Raised by derived impls after a fields map ran out of entries; the
    // container path is not visible at that point, so the key alone locates
    // the problem.
    fn missing_field(field: &'static str) -> Self {
        CodecError::KeyNotFound {
            key: field.to_string(),
            path: Path::root(),
        }
    }

    fn invalid_length(_len: usize, _exp: &dyn serde::de::Expected) -> Self {
        CodecError::Exhausted { path: Path::root() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::Error as _;

    #[test]
    fn test_display_carries_path() {
        let err = CodecError::mismatch("Int", "Array", Path::root().child_field("count"));
        assert_eq!(
            err.to_string(),
            "type mismatch at $.count: expected Int, found Array"
        );
    }

    #[test]
    fn test_missing_field_maps_to_key_not_found() {
        let err = CodecError::missing_field("name");
        assert!(matches!(err, CodecError::KeyNotFound { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_invalid_length_maps_to_exhausted() {
        let err = CodecError::invalid_length(1, &"a tuple of size 3");
        assert!(matches!(err, CodecError::Exhausted { .. }));
    }

    #[test]
    fn test_custom_message_round_trips_text() {
        let err = <CodecError as serde::de::Error>::custom("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
