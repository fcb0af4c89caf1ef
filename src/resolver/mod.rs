//! Reference resolution.
//!
//! Resolves `$ref` strings against an origin document to a concrete node plus
//! its owning document. Handles pointer-only references (`#/components/...`),
//! relative and absolute file references, and URL references with fragments.
//! External documents are fetched lazily and cached by canonical location, so
//! repeated references reuse one parse. Reference-to-reference chains are
//! followed with a per-invocation in-progress set that fails fast with
//! [`OaslintError::CycleDetected`] instead of recursing unboundedly.
//!
//! Owning-document identity is preserved on every result: "defined in this
//! document" and "defined externally" stay distinguishable, which is what
//! lets usage marking propagate across reference chains while unused-component
//! analysis stays scoped per document.

pub mod fetch;

pub use fetch::{DocumentFetcher, Fetcher, HttpFetcher};

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::document::{Document, DocumentId, DocumentLocation};
use crate::error::{OaslintError, Result};
use crate::tree::{NodeId, NodePath};

/// A resolved reference: the owning document, the node, and its path there.
#[derive(Debug, Clone)]
pub struct ReferenceTarget {
    pub document: Rc<Document>,
    pub node: NodeId,
    pub path: NodePath,
}

impl ReferenceTarget {
    /// Identity used to deduplicate traversal: two different reference
    /// strings landing on the same node compare equal.
    pub fn identity(&self) -> (DocumentId, NodeId) {
        (self.document.id(), self.node)
    }
}

#[derive(Default)]
struct DocumentStore {
    documents: Vec<Rc<Document>>,
    by_location: HashMap<String, Rc<Document>>,
}

/// Resolves references, owning the cache of every document seen so far.
pub struct Resolver {
    store: RefCell<DocumentStore>,
    fetcher: Box<dyn DocumentFetcher>,
    resolved: RefCell<HashMap<(DocumentId, String), ReferenceTarget>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(Fetcher::new()))
    }

    pub fn with_fetcher(fetcher: Box<dyn DocumentFetcher>) -> Self {
        Self {
            store: RefCell::new(DocumentStore::default()),
            fetcher,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// Register already-loaded source under a location. Used for the primary
    /// document; returns the cached document if the location is known.
    pub fn register(&self, location: DocumentLocation, source: &str) -> Result<Rc<Document>> {
        if let Some(doc) = self.store.borrow().by_location.get(&location.canonical()) {
            return Ok(Rc::clone(doc));
        }
        let mut store = self.store.borrow_mut();
        let id = DocumentId(store.documents.len());
        let document = Rc::new(Document::from_source(id, location, source)?);
        store.documents.push(Rc::clone(&document));
        store
            .by_location
            .insert(document.location().canonical(), Rc::clone(&document));
        tracing::debug!(location = %document.location(), id = document.id().index(), "registered document");
        Ok(document)
    }

    /// Load (or reuse) the document at a location.
    pub fn load(&self, location: DocumentLocation) -> Result<Rc<Document>> {
        if let Some(doc) = self.store.borrow().by_location.get(&location.canonical()) {
            return Ok(Rc::clone(doc));
        }
        let source = self.fetcher.fetch(&location)?;
        self.register(location, &source)
    }

    /// Look up a previously registered document by id.
    pub fn document(&self, id: DocumentId) -> Option<Rc<Document>> {
        self.store.borrow().documents.get(id.index()).cloned()
    }

    /// Number of documents loaded so far.
    pub fn document_count(&self) -> usize {
        self.store.borrow().documents.len()
    }

    /// Resolve a reference string from an origin document, following
    /// reference-to-reference chains to a non-reference target.
    ///
    /// Identical (origin, reference) pairs are memoized; resolution is
    /// deterministic.
    pub fn resolve(&self, origin: &Rc<Document>, reference: &str) -> Result<ReferenceTarget> {
        let memo_key = (origin.id(), reference.to_string());
        if let Some(target) = self.resolved.borrow().get(&memo_key) {
            return Ok(target.clone());
        }
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let target = self.resolve_step(Rc::clone(origin), reference, &mut seen, &mut chain)?;
        self.resolved.borrow_mut().insert(memo_key, target.clone());
        Ok(target)
    }

    fn resolve_step(
        &self,
        origin: Rc<Document>,
        reference: &str,
        seen: &mut HashSet<(String, String)>,
        chain: &mut Vec<String>,
    ) -> Result<ReferenceTarget> {
        if reference.is_empty() {
            return Err(OaslintError::MalformedReference {
                reference: reference.to_string(),
                message: "empty reference".to_string(),
            });
        }
        let (location_part, fragment) = split_reference(reference);
        let location = if location_part.is_empty() {
            origin.location().clone()
        } else {
            origin.location().join(location_part)
        };

        chain.push(format!("{}#{}", location.canonical(), fragment));
        if !seen.insert((location.canonical(), fragment.to_string())) {
            return Err(OaslintError::CycleDetected {
                chain: chain.join(" -> "),
            });
        }

        let document = if location_part.is_empty() {
            origin
        } else {
            self.load(location)?
        };

        let path = NodePath::parse_pointer(fragment).ok_or_else(|| {
            OaslintError::MalformedReference {
                reference: reference.to_string(),
                message: "invalid JSON pointer fragment".to_string(),
            }
        })?;
        let node = {
            let tree = document.tree();
            tree.node_at(&path)
        }
        .ok_or_else(|| OaslintError::MalformedReference {
            reference: reference.to_string(),
            message: format!("no node at {} in {}", path, document.location()),
        })?;

        // a target that is itself a reference node continues the chain
        let next = {
            let tree = document.tree();
            tree.get_str(node, "$ref").map(str::to_string)
        };
        match next {
            Some(next_ref) => self.resolve_step(document, &next_ref, seen, chain),
            None => Ok(ReferenceTarget {
                document,
                node,
                path,
            }),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn split_reference(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((location, fragment)) => (location, fragment),
        None => (reference, ""),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Serves canned sources by canonical location.
    pub(crate) struct StubFetcher {
        sources: HashMap<String, String>,
    }

    impl StubFetcher {
        pub(crate) fn new(sources: &[(&str, &str)]) -> Self {
            Self {
                sources: sources
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl DocumentFetcher for StubFetcher {
        fn fetch(&self, location: &DocumentLocation) -> Result<String> {
            self.sources
                .get(&location.canonical())
                .cloned()
                .ok_or_else(|| OaslintError::Fetch {
                    location: location.canonical(),
                    message: "not found".to_string(),
                })
        }
    }

    /// Resolver over canned sources.
    pub(crate) fn resolver_with(sources: &[(&str, &str)]) -> Resolver {
        Resolver::with_fetcher(Box::new(StubFetcher::new(sources)))
    }
}
