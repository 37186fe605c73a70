//! Projection layer
//!
//! Converts a finished [`Tree`] into exactly one of the three wire-facing
//! output forms. The form is selected by the caller's intended command
//! shape, never by re-inspecting the tree.

use crate::config::{CodecConfig, NestedCoding};
use crate::tree::Tree;
use redbind_core::{CodecError, Path, RespValue, Result};

/// The output form a caller wants from one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// One wire value.
    Value,
    /// A flat field-name → wire-value association.
    Fields,
    /// An ordered, flattened command-argument list.
    Args,
}

/// Project a tree to a single wire value.
///
/// Keyed nodes have no single-value form in this protocol family; meeting
/// one at any depth is `UnsupportedShape`.
pub fn project_value(tree: Tree) -> Result<RespValue> {
    single(tree, &Path::root())
}

fn single(tree: Tree, path: &Path) -> Result<RespValue> {
    match tree {
        Tree::Single(value) => Ok(value),
        Tree::Unkeyed(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for (i, element) in elements.into_iter().enumerate() {
                items.push(single(element, &path.child_index(i))?);
            }
            Ok(RespValue::Array(items))
        }
        Tree::Keyed(_) => Err(CodecError::UnsupportedShape { path: path.clone() }),
    }
}

/// Project a tree to the flat field list used by hash-oriented commands.
///
/// The root must be keyed. Duplicate names are preserved in order; a
/// consumer collapsing the list into a map takes the last value for a
/// repeated key.
pub fn project_fields(tree: Tree) -> Result<Vec<(String, RespValue)>> {
    match tree {
        Tree::Keyed(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for (name, value) in fields {
                let path = Path::root().child_field(name.clone());
                out.push((name, single(value, &path)?));
            }
            Ok(out)
        }
        _ => Err(CodecError::UnsupportedShape { path: Path::root() }),
    }
}

/// Project a tree to a flattened command-argument list.
pub fn project_args(tree: Tree, config: &CodecConfig) -> Result<Vec<RespValue>> {
    args_at(tree, &Path::root(), config)
}

fn args_at(tree: Tree, path: &Path, config: &CodecConfig) -> Result<Vec<RespValue>> {
    match tree {
        // A pre-built wire array passes through unwrapped.
        Tree::Single(RespValue::Array(items)) => Ok(items),
        Tree::Single(value) => Ok(vec![value]),
        Tree::Keyed(fields) => {
            // Name/value pairs interleave, doubling the argument count.
            let mut out = Vec::with_capacity(fields.len() * 2);
            for (name, value) in fields {
                let child_path = path.child_field(name.clone());
                out.push(RespValue::Bulk(name.into_bytes()));
                out.push(nested_arg(value, &child_path, config)?);
            }
            Ok(out)
        }
        Tree::Unkeyed(mut elements) => match elements.pop() {
            None => Ok(Vec::new()),
            // A singleton wrapper collapses into its only element.
            Some(only) if elements.is_empty() => args_at(only, path, config),
            Some(last) => {
                elements.push(last);
                let mut out = Vec::with_capacity(elements.len());
                for (i, element) in elements.into_iter().enumerate() {
                    out.push(single(element, &path.child_index(i))?);
                }
                Ok(out)
            }
        },
    }
}

/// Projection of a value found inside a keyed pair. Yields exactly one
/// argument: singleton arrays collapse to their element, keyed values are
/// always blob-encoded (interleaving happens only at the outermost field
/// list), and everything else is its single projection.
fn nested_arg(tree: Tree, path: &Path, config: &CodecConfig) -> Result<RespValue> {
    match tree {
        Tree::Single(RespValue::Array(mut items)) => match items.pop() {
            Some(only) if items.is_empty() => Ok(only),
            Some(last) => {
                items.push(last);
                Ok(RespValue::Array(items))
            }
            None => Ok(RespValue::Array(items)),
        },
        Tree::Single(value) => Ok(value),
        Tree::Keyed(_) => match &config.nested {
            NestedCoding::Blob(codec) => Ok(RespValue::Bulk(codec.encode(&tree, path)?)),
            NestedCoding::Reject => Err(CodecError::UnsupportedShape { path: path.clone() }),
        },
        Tree::Unkeyed(mut elements) => match elements.pop() {
            None => Ok(RespValue::Array(Vec::new())),
            Some(only) if elements.is_empty() => nested_arg(only, path, config),
            Some(last) => {
                elements.push(last);
                let mut items = Vec::with_capacity(elements.len());
                for (i, element) in elements.into_iter().enumerate() {
                    items.push(single(element, &path.child_index(i))?);
                }
                Ok(RespValue::Array(items))
            }
        },
    }
}
