//! Field/index paths for error diagnostics
//!
//! Every error produced by the codec names the position in the structured
//! value at which it occurred, rendered in the `$.field[3].inner` form.

use std::fmt;

/// One step into a structured value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field of a keyed container.
    Field(String),
    /// A zero-based position in an unkeyed container.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Ordered segment list locating a value inside the encode/decode root.
///
/// The root renders as `$`; descending into field `user` then element 2
/// renders as `$.user[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path, `$`.
    pub fn root() -> Self {
        Path::default()
    }

    /// True when no segment has been pushed.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments in root-to-leaf order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Descend into a named field.
    pub fn push_field(&mut self, name: impl Into<String>) {
        self.segments.push(PathSegment::Field(name.into()));
    }

    /// Descend into an element position.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Ascend one level. A no-op at the root.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// A new path one field deeper than `self`.
    pub fn child_field(&self, name: impl Into<String>) -> Path {
        let mut child = self.clone();
        child.push_field(name);
        child
    }

    /// A new path one element deeper than `self`.
    pub fn child_index(&self, index: usize) -> Path {
        let mut child = self.clone();
        child.push_index(index);
        child
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_as_dollar() {
        assert_eq!(Path::root().to_string(), "$");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_field_and_index_rendering() {
        let mut path = Path::root();
        path.push_field("user");
        path.push_index(2);
        path.push_field("name");
        assert_eq!(path.to_string(), "$.user[2].name");
    }

    #[test]
    fn test_pop_ascends() {
        let mut path = Path::root();
        path.push_field("a");
        path.push_index(0);
        path.pop();
        assert_eq!(path.to_string(), "$.a");
        path.pop();
        path.pop(); // popping the root is a no-op
        assert!(path.is_root());
    }

    #[test]
    fn test_child_builders_do_not_mutate_parent() {
        let parent = Path::root().child_field("tags");
        let child = parent.child_index(1);
        assert_eq!(parent.to_string(), "$.tags");
        assert_eq!(child.to_string(), "$.tags[1]");
    }
}
