//! JSON encoding of encode subtrees
//!
//! Produces the default blob payload format. Output is deterministic: keyed
//! nodes are emitted with their fields stable-sorted by name, so repeated
//! encodes of the same value are byte-identical.

use crate::tree::Tree;
use base64::Engine;
use redbind_core::RespValue;

/// Encode a subtree to its JSON blob rendering.
pub(crate) fn encode_json_tree(tree: &Tree) -> String {
    match tree {
        Tree::Single(value) => encode_leaf(value),
        Tree::Keyed(fields) => encode_object(fields),
        Tree::Unkeyed(elements) => {
            let items: Vec<String> = elements.iter().map(encode_json_tree).collect();
            format!("[{}]", items.join(","))
        }
    }
}

fn encode_leaf(value: &RespValue) -> String {
    match value {
        RespValue::Null => "null".to_string(),
        RespValue::Int(i) => i.to_string(),
        RespValue::Bulk(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => encode_string(text),
            Err(_) => encode_bytes(bytes),
        },
        RespValue::Simple(text) => format!(r#"{{"$text":{}}}"#, encode_string(text)),
        RespValue::Error(text) => format!(r#"{{"$error":{}}}"#, encode_string(text)),
        RespValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(encode_leaf).collect();
            format!("[{}]", rendered.join(","))
        }
    }
}

/// Encode an object with deterministic key ordering. The sort is stable, so
/// duplicate names keep their relative order.
fn encode_object(fields: &[(String, Tree)]) -> String {
    let mut entries: Vec<&(String, Tree)> = fields.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let pairs: Vec<String> = entries
        .iter()
        .map(|(name, value)| format!("{}:{}", encode_string(name), encode_json_tree(value)))
        .collect();

    format!("{{{}}}", pairs.join(","))
}

/// Encode a string with JSON escaping.
pub(crate) fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Encode binary bytes as the `$bytes` wrapper (base64).
fn encode_bytes(bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!(r#"{{"$bytes":"{}"}}"#, b64)
}
