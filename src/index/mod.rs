//! The document index.
//!
//! Rules never walk the tree themselves. One traversal over a document and
//! everything it references produces typed, document-ordered collections of
//! the constructs rules care about, so each rule body is a scan over a ready
//! list rather than a tree search. Cross-document reachability doubles as
//! usage marking for the unused-component rule.

mod builder;
pub mod location;
pub mod model;

use std::collections::HashSet;
use std::rc::Rc;

pub use builder::FORCE_INCLUDE_KEY;
pub use location::Location;

use crate::document::{Document, DocumentId};
use crate::resolver::Resolver;
use crate::tree::{NodeId, NodePath};
use model::{
    Described, LinkInfo, Operation, ParameterInfo, RefInfo, ResolutionFailure, SchemaInfo,
    SecuritySchemeInfo, ServerInfo, TagInfo,
};

/// A decoded value plus where it came from. The node handle stays valid for
/// fixes that mutate the owning tree.
#[derive(Debug, Clone)]
pub struct IndexedNode<T> {
    pub value: T,
    pub location: Location,
    pub node: NodeId,
}

/// A shared-definition entry of the primary document
/// (`/components/{section}/{name}`, or a 2.0 root section).
#[derive(Debug, Clone)]
pub struct ComponentEntry {
    pub section: String,
    pub name: String,
    pub location: Location,
    /// Pinned used via the force-include marker.
    pub force_included: bool,
}

/// Traversal options.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Resolve and descend into references. Off, references are still
    /// indexed but nothing beyond the referencing node is walked.
    pub follow_references: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            follow_references: true,
        }
    }
}

/// Everything a rule can ask about one document, collected in a single walk.
/// Collections preserve document order, which is what makes lint output
/// deterministic.
#[derive(Debug)]
pub struct Index {
    /// The document this index was built for.
    pub document: DocumentId,
    pub operations: Vec<IndexedNode<Operation>>,
    pub schemas: Vec<IndexedNode<SchemaInfo>>,
    pub schema_refs: Vec<IndexedNode<RefInfo>>,
    pub servers: Vec<IndexedNode<ServerInfo>>,
    pub tags: Vec<IndexedNode<TagInfo>>,
    pub security_schemes: Vec<IndexedNode<SecuritySchemeInfo>>,
    pub links: Vec<IndexedNode<LinkInfo>>,
    /// Parameters written in place under an operation or path item.
    pub inline_parameters: Vec<IndexedNode<ParameterInfo>>,
    /// Parameters defined in a shared-definitions section.
    pub component_parameters: Vec<IndexedNode<ParameterInfo>>,
    /// Every description/summary scalar, wherever it appears.
    pub described: Vec<IndexedNode<Described>>,
    /// Shared definitions of the primary document, reachable or not.
    pub components: Vec<ComponentEntry>,
    /// References that failed to resolve, attached to the referencing node.
    pub resolution_failures: Vec<IndexedNode<ResolutionFailure>>,
    /// Component roots reached through some reference during the walk.
    pub used_components: HashSet<(DocumentId, NodePath)>,
    /// Document-level `security` present and non-empty.
    pub global_security: bool,
}

impl Index {
    /// Build the index for `document`, following references through
    /// `resolver`.
    pub fn build(document: &Rc<Document>, resolver: &Resolver, options: &IndexOptions) -> Self {
        builder::Builder::build(document, resolver, options)
    }

    fn empty(document: DocumentId) -> Self {
        Self {
            document,
            operations: Vec::new(),
            schemas: Vec::new(),
            schema_refs: Vec::new(),
            servers: Vec::new(),
            tags: Vec::new(),
            security_schemes: Vec::new(),
            links: Vec::new(),
            inline_parameters: Vec::new(),
            component_parameters: Vec::new(),
            described: Vec::new(),
            components: Vec::new(),
            resolution_failures: Vec::new(),
            used_components: HashSet::new(),
            global_security: false,
        }
    }

    /// Whether a component was reached through a reference or pinned with the
    /// force-include marker.
    pub fn is_component_used(&self, entry: &ComponentEntry) -> bool {
        entry.force_included
            || self
                .used_components
                .contains(&(entry.location.document, entry.location.path.clone()))
    }

    pub fn has_global_security(&self) -> bool {
        self.global_security
    }
}
