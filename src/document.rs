//! Documents and their identity.
//!
//! A [`Document`] pairs a positional tree with the canonical location it was
//! loaded from and the format version it declares. Multiple documents coexist
//! across reference boundaries; [`DocumentId`] keeps "defined in this
//! document" distinguishable from "defined externally" no matter how a node
//! was reached.

use std::cell::{Ref, RefCell, RefMut};
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::tree::{load, NodeId, YamlTree};

/// Identity of a document within one lint invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub(crate) usize);

impl DocumentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Canonical location of a document: a filesystem path or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentLocation {
    Local(PathBuf),
    Remote(String),
}

impl DocumentLocation {
    /// Classify a location string. `http://` and `https://` are remote,
    /// everything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Remote(location.to_string())
        } else {
            Self::Local(normalize_path(Path::new(location)))
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local(normalize_path(&path.into()))
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(url.into())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Canonical string form, used as the document cache key.
    pub fn canonical(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }

    /// Resolve a reference's location part against this origin.
    ///
    /// Absolute URLs pass through; everything else joins onto the origin's
    /// parent (URL path joining for remote origins, filesystem joining
    /// otherwise), so `./common.yml` and `../shared/types.yml` both land
    /// next to the referring document.
    pub fn join(&self, reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Self::Remote(reference.to_string());
        }
        match self {
            Self::Local(path) => {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                Self::Local(normalize_path(&base.join(reference)))
            }
            Self::Remote(url) => Self::Remote(join_url(url, reference)),
        }
    }
}

impl std::fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn join_url(base: &str, reference: &str) -> String {
    if let Some(rest) = reference.strip_prefix('/') {
        // root-relative: keep scheme://host
        if let Some(scheme_end) = base.find("://") {
            let after_scheme = &base[scheme_end + 3..];
            let host_end = after_scheme.find('/').unwrap_or(after_scheme.len());
            return format!("{}/{}", &base[..scheme_end + 3 + host_end], rest);
        }
        return format!("{}/{}", base.trim_end_matches('/'), rest);
    }
    let trimmed = base.rsplit_once('/').map(|(head, _)| head).unwrap_or(base);
    let mut segments: Vec<&str> = trimmed.split('/').collect();
    for segment in reference.split('/') {
        match segment {
            "." => {}
            ".." => {
                // never pop past scheme://host
                if segments.len() > 3 {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Declared format version of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// Swagger 2.0.
    V2,
    /// OpenAPI 3.0.x.
    V30,
    /// OpenAPI 3.1.x.
    V31,
    Unknown,
}

impl SpecVersion {
    /// Read the declared version from a document root.
    pub fn detect(tree: &YamlTree) -> Self {
        let root = tree.root();
        if let Some(openapi) = tree.get_str(root, "openapi") {
            if openapi.starts_with("3.1") {
                return Self::V31;
            }
            if openapi.starts_with("3.0") {
                return Self::V30;
            }
            return Self::Unknown;
        }
        match tree.get_str(root, "swagger") {
            Some("2.0") => Self::V2,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "2.0",
            Self::V30 => "3.0",
            Self::V31 => "3.1",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed document: positional tree + canonical location + version.
///
/// The tree sits behind a `RefCell` so fixes can splice into it while index
/// entries keep addressing nodes by id and path.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    location: DocumentLocation,
    version: SpecVersion,
    tree: RefCell<YamlTree>,
}

impl Document {
    pub(crate) fn new(id: DocumentId, location: DocumentLocation, tree: YamlTree) -> Self {
        let version = SpecVersion::detect(&tree);
        Self {
            id,
            location,
            version,
            tree: RefCell::new(tree),
        }
    }

    pub(crate) fn from_source(
        id: DocumentId,
        location: DocumentLocation,
        source: &str,
    ) -> Result<Self> {
        let tree = load::parse_at(&location.canonical(), source)?;
        Ok(Self::new(id, location, tree))
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn location(&self) -> &DocumentLocation {
        &self.location
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    pub fn tree(&self) -> Ref<'_, YamlTree> {
        self.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, YamlTree> {
        self.tree.borrow_mut()
    }

    pub fn root(&self) -> NodeId {
        self.tree().root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_openapi_30() {
        let tree = load::parse("openapi: 3.0.3\n").unwrap();
        assert_eq!(SpecVersion::detect(&tree), SpecVersion::V30);
    }

    #[test]
    fn detects_openapi_31() {
        let tree = load::parse("openapi: 3.1.0\n").unwrap();
        assert_eq!(SpecVersion::detect(&tree), SpecVersion::V31);
    }

    #[test]
    fn detects_swagger_2() {
        let tree = load::parse("swagger: \"2.0\"\n").unwrap();
        assert_eq!(SpecVersion::detect(&tree), SpecVersion::V2);
    }

    #[test]
    fn missing_version_is_unknown() {
        let tree = load::parse("info: {}\n").unwrap();
        assert_eq!(SpecVersion::detect(&tree), SpecVersion::Unknown);
    }

    #[test]
    fn location_parse_classifies_urls() {
        assert!(DocumentLocation::parse("https://example.com/api.yml").is_remote());
        assert!(!DocumentLocation::parse("specs/api.yml").is_remote());
    }

    #[test]
    fn local_join_is_relative_to_parent() {
        let origin = DocumentLocation::local("specs/api.yml");
        let joined = origin.join("common/types.yml");
        assert_eq!(joined.canonical(), "specs/common/types.yml");
    }

    #[test]
    fn local_join_normalizes_dotdot() {
        let origin = DocumentLocation::local("specs/v1/api.yml");
        let joined = origin.join("../shared.yml");
        assert_eq!(joined.canonical(), "specs/shared.yml");
    }

    #[test]
    fn remote_join_replaces_last_segment() {
        let origin = DocumentLocation::remote("https://example.com/specs/api.yml");
        let joined = origin.join("types.yml");
        assert_eq!(joined.canonical(), "https://example.com/specs/types.yml");
    }

    #[test]
    fn remote_join_handles_parent_segments() {
        let origin = DocumentLocation::remote("https://example.com/specs/v1/api.yml");
        let joined = origin.join("../shared/types.yml");
        assert_eq!(
            joined.canonical(),
            "https://example.com/specs/shared/types.yml"
        );
    }

    #[test]
    fn absolute_url_reference_passes_through() {
        let origin = DocumentLocation::local("api.yml");
        let joined = origin.join("https://example.com/ext.yml");
        assert_eq!(joined.canonical(), "https://example.com/ext.yml");
    }

    #[test]
    fn document_exposes_version_and_location() {
        let doc = Document::from_source(
            DocumentId(0),
            DocumentLocation::local("api.yml"),
            "openapi: 3.0.0\npaths: {}\n",
        )
        .unwrap();
        assert_eq!(doc.version(), SpecVersion::V30);
        assert_eq!(doc.location().canonical(), "api.yml");
    }
}
