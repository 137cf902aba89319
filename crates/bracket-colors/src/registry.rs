//! Bracket state for every open document.

use crate::driver::DocumentBrackets;
use crate::kind::BracketKindSet;
use std::collections::BTreeMap;

/// Opaque document identifier handed out by [`BracketDocuments::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Owns one [`DocumentBrackets`] per open document.
///
/// Ids are never reused, so a host holding on to the id of a closed document gets `None`
/// instead of another document's state.
#[derive(Debug, Clone)]
pub struct BracketDocuments {
    next_id: u64,
    documents: BTreeMap<DocumentId, DocumentBrackets>,
    enabled: BracketKindSet,
}

impl Default for BracketDocuments {
    fn default() -> Self {
        Self::new(BracketKindSet::default())
    }
}

impl BracketDocuments {
    /// Create an empty registry; new documents track `enabled` kinds.
    pub fn new(enabled: BracketKindSet) -> Self {
        Self {
            next_id: 1,
            documents: BTreeMap::new(),
            enabled,
        }
    }

    /// Kinds tracked by documents opened from now on.
    pub fn default_kinds(&self) -> BracketKindSet {
        self.enabled
    }

    /// Change the kinds tracked by documents opened from now on.
    pub fn set_default_kinds(&mut self, enabled: BracketKindSet) {
        self.enabled = enabled;
    }

    /// Start tracking a document. Its state is empty until the first tick scans it.
    pub fn open(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.documents.insert(id, DocumentBrackets::new(self.enabled));
        tracing::debug!(id = id.get(), "bracket document opened");
        id
    }

    /// Stop tracking a document and return its state.
    pub fn close(&mut self, id: DocumentId) -> Option<DocumentBrackets> {
        let removed = self.documents.remove(&id);
        if removed.is_some() {
            tracing::debug!(id = id.get(), "bracket document closed");
        }
        removed
    }

    /// State of `id`.
    pub fn get(&self, id: DocumentId) -> Option<&DocumentBrackets> {
        self.documents.get(&id)
    }

    /// Mutable state of `id`.
    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut DocumentBrackets> {
        self.documents.get_mut(&id)
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids of the open documents, in opening order.
    pub fn ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    /// Reset every open document, e.g. after the configuration changed.
    pub fn reset_all(&mut self) {
        for document in self.documents.values_mut() {
            document.reset();
        }
    }
}
