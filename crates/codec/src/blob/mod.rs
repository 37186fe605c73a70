//! Opaque blob sub-codec
//!
//! When a value's natural shape has no structural representation in the
//! current context (a record nested below the root, an array inside an
//! array under the fields projection), the engine hands the whole subtree to
//! a blob codec and carries the resulting bytes as a single `Bulk` leaf.
//!
//! The boundary is pluggable; the default is a self-describing JSON object
//! encoding with deterministic field ordering and a `$bytes` wrapper
//! (base64) for non-UTF-8 binary leaves, so payloads are reproducible and
//! lossless:
//!
//! | Tree node | JSON encoding |
//! |-----------|---------------|
//! | `Single(Null)` | `null` |
//! | `Single(Int)` | number |
//! | `Single(Bulk)` (UTF-8) | `"..."` |
//! | `Single(Bulk)` (binary) | `{"$bytes": "base64"}` |
//! | `Single(Simple)` | `{"$text": "..."}` |
//! | `Single(Error)` | `{"$error": "..."}` |
//! | `Single(Array)` / `Unkeyed` | `[...]` |
//! | `Keyed` | `{...}`, keys sorted |

mod decode;
mod encode;

pub(crate) use decode::decode_json_tree;
pub(crate) use encode::encode_json_tree;

use crate::tree::Tree;
use redbind_core::{CodecError, Path, Result};

/// A pluggable opaque sub-encoding for shapes the wire context cannot
/// carry structurally.
///
/// `encode` and `decode` must be inverses for round-trips through the codec
/// to hold. The `path` names the field at which the blob sits, for error
/// reporting only.
pub trait BlobCodec: Send + Sync {
    /// Encode a finished subtree to opaque bytes.
    fn encode(&self, tree: &Tree, path: &Path) -> Result<Vec<u8>>;

    /// Decode opaque bytes back to a subtree.
    fn decode(&self, bytes: &[u8], path: &Path) -> Result<Tree>;
}

/// The default blob codec: self-describing JSON with deterministic key
/// ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBlobCodec;

impl BlobCodec for JsonBlobCodec {
    fn encode(&self, tree: &Tree, _path: &Path) -> Result<Vec<u8>> {
        Ok(encode_json_tree(tree).into_bytes())
    }

    fn decode(&self, bytes: &[u8], path: &Path) -> Result<Tree> {
        let text = std::str::from_utf8(bytes).map_err(|_| {
            CodecError::corrupted("blob payload is not valid UTF-8", path.clone())
        })?;
        decode_json_tree(text, path)
    }
}
