//! Paths into the positional tree.
//!
//! A [`NodePath`] is the ordered list of mapping keys and sequence indices
//! leading from a document root to a node. Paths are the stable handles the
//! index hands out: they survive tree mutation (unlike borrowed references)
//! and render as JSON Pointers for display and for `$ref` fragments.

use super::{NodeId, NodeKind, YamlTree};

/// One step in a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// Ordered ancestor path from a document root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// The document root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a JSON Pointer fragment (`/components/schemas/Foo`).
    ///
    /// An empty pointer addresses the document root. Segments are unescaped
    /// per RFC 6901 (`~1` → `/`, `~0` → `~`); all-digit segments become
    /// sequence indices.
    pub fn parse_pointer(pointer: &str) -> Option<Self> {
        if pointer.is_empty() {
            return Some(Self::root());
        }
        let rest = pointer.strip_prefix('/')?;
        let mut segments = Vec::new();
        for raw in rest.split('/') {
            if raw.is_empty() {
                return None;
            }
            let unescaped = raw.replace("~1", "/").replace("~0", "~");
            if !unescaped.is_empty() && unescaped.bytes().all(|b| b.is_ascii_digit()) {
                segments.push(PathSegment::Index(unescaped.parse().ok()?));
            } else {
                segments.push(PathSegment::Key(unescaped));
            }
        }
        Some(Self(segments))
    }

    /// Segments in order from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with a mapping key.
    pub fn push_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Extend with a sequence index.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Keep only the first `len` segments.
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }

    /// The key text of segment `i`, if it is a key.
    pub fn key_at(&self, i: usize) -> Option<&str> {
        match self.0.get(i) {
            Some(PathSegment::Key(k)) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Walk the tree from its root along this path.
    ///
    /// An [`PathSegment::Index`] against a mapping falls back to its text
    /// form as a key: RFC 6901 member names may be all digits (`responses/200`).
    pub fn resolve(&self, tree: &YamlTree) -> Option<NodeId> {
        let mut current = tree.root();
        for segment in &self.0 {
            current = match (segment, tree.kind(current)) {
                (PathSegment::Key(key), NodeKind::Mapping(_)) => tree.get(current, key)?,
                (PathSegment::Index(i), NodeKind::Sequence(items)) => items.get(*i).copied()?,
                (PathSegment::Index(i), NodeKind::Mapping(_)) => {
                    tree.get(current, &i.to_string())?
                }
                _ => return None,
            };
        }
        Some(current)
    }
}

impl std::fmt::Display for NodePath {
    /// Renders as a JSON Pointer (`/paths/~1users/get`); root renders as `/`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Key(k) => {
                    write!(f, "/{}", k.replace('~', "~0").replace('/', "~1"))?;
                }
                PathSegment::Index(i) => write!(f, "/{}", i)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::load;

    #[test]
    fn parses_simple_pointer() {
        let path = NodePath::parse_pointer("/components/schemas/User").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.key_at(2), Some("User"));
    }

    #[test]
    fn parses_escaped_path_segment() {
        let path = NodePath::parse_pointer("/paths/~1users~1{id}/get").unwrap();
        assert_eq!(path.key_at(1), Some("/users/{id}"));
    }

    #[test]
    fn empty_pointer_is_root() {
        let path = NodePath::parse_pointer("").unwrap();
        assert!(path.is_root());
    }

    #[test]
    fn rejects_pointer_without_leading_slash() {
        assert!(NodePath::parse_pointer("components/schemas").is_none());
    }

    #[test]
    fn rejects_empty_segment() {
        assert!(NodePath::parse_pointer("/components//User").is_none());
    }

    #[test]
    fn numeric_segments_are_indices() {
        let path = NodePath::parse_pointer("/servers/0/url").unwrap();
        assert_eq!(path.segments()[1], PathSegment::Index(0));
    }

    #[test]
    fn display_round_trips_escaping() {
        let path = NodePath::parse_pointer("/paths/~1users/get").unwrap();
        assert_eq!(path.to_string(), "/paths/~1users/get");
    }

    #[test]
    fn resolves_against_tree() {
        let tree = load::parse("a:\n  b:\n    - one\n    - two\n").unwrap();
        let path = NodePath::parse_pointer("/a/b/1").unwrap();
        let node = path.resolve(&tree).unwrap();
        assert_eq!(tree.scalar_str(node), Some("two"));
    }

    #[test]
    fn numeric_segment_resolves_as_mapping_key() {
        let tree = load::parse("responses:\n  \"200\":\n    description: ok\n").unwrap();
        let path = NodePath::parse_pointer("/responses/200/description").unwrap();
        let node = path.resolve(&tree).unwrap();
        assert_eq!(tree.scalar_str(node), Some("ok"));
    }

    #[test]
    fn resolve_misses_on_absent_key() {
        let tree = load::parse("a: 1\n").unwrap();
        assert!(NodePath::parse_pointer("/b").unwrap().resolve(&tree).is_none());
    }

    #[test]
    fn push_key_extends_without_mutating() {
        let base = NodePath::parse_pointer("/components").unwrap();
        let extended = base.push_key("schemas");
        assert_eq!(base.len(), 1);
        assert_eq!(extended.key_at(1), Some("schemas"));
    }
}
