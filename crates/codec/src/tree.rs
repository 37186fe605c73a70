//! Intermediate encode tree
//!
//! One encode call builds exactly one [`Tree`], owns it exclusively, and
//! hands it to a projection. The tree is never shared, cached, or reused.

use crate::probe::Shape;
use redbind_core::RespValue;

/// The encoder's working representation of an in-progress encode.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// A terminal scalar or pre-built wire array.
    Single(RespValue),
    /// Ordered named fields. Duplicate names are permitted and preserved;
    /// consumers collapsing to a map take the last value for a repeated key.
    Keyed(Vec<(String, Tree)>),
    /// Ordered elements.
    Unkeyed(Vec<Tree>),
}

impl Tree {
    /// The shape this node projects as.
    pub fn shape(&self) -> Shape {
        match self {
            Tree::Single(_) => Shape::Single,
            Tree::Keyed(_) => Shape::Keyed,
            Tree::Unkeyed(_) => Shape::Unkeyed,
        }
    }

    /// True for a terminal `Single(Null)` leaf.
    pub fn is_null_leaf(&self) -> bool {
        matches!(self, Tree::Single(RespValue::Null))
    }
}

impl From<RespValue> for Tree {
    fn from(value: RespValue) -> Self {
        Tree::Single(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_classification() {
        assert_eq!(Tree::Single(RespValue::Int(1)).shape(), Shape::Single);
        assert_eq!(Tree::Keyed(vec![]).shape(), Shape::Keyed);
        assert_eq!(Tree::Unkeyed(vec![]).shape(), Shape::Unkeyed);
    }

    #[test]
    fn test_null_leaf() {
        assert!(Tree::Single(RespValue::Null).is_null_leaf());
        assert!(!Tree::Single(RespValue::Int(0)).is_null_leaf());
        assert!(!Tree::Unkeyed(vec![]).is_null_leaf());
    }
}
