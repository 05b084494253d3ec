use serde::{Serialize, Deserialize};
use crate::core::types::DocId;
use crate::index::skiplist;

/// One element of a posting list: a bare doc id, or a doc id carrying a
/// skip pointer (index of a later entry in the same list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostingEntry {
    Plain(DocId),
    Skipping(DocId, usize),
}

impl PostingEntry {
    pub fn doc_id(&self) -> DocId {
        match *self {
            PostingEntry::Plain(doc_id) | PostingEntry::Skipping(doc_id, _) => doc_id,
        }
    }

    pub fn skip_target(&self) -> Option<usize> {
        match *self {
            PostingEntry::Plain(_) => None,
            PostingEntry::Skipping(_, target) => Some(target),
        }
    }
}

/// Posting list for a term
/// Note: doc ids strictly increasing, skip pointers only point forward
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingList {
    pub entries: Vec<PostingEntry>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList {
            entries: Vec::new(),
        }
    }

    /// Build from a sorted, duplicate-free id sequence, placing skip pointers.
    pub fn from_doc_ids(doc_ids: &[DocId]) -> Self {
        skiplist::compute_skip_pointers(doc_ids)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn doc_freq(&self) -> usize {
        self.entries.len()
    }

    pub fn doc_id_at(&self, index: usize) -> DocId {
        self.entries[index].doc_id()
    }

    pub fn skip_count(&self) -> usize {
        self.entries.iter().filter(|e| e.skip_target().is_some()).count()
    }

    pub fn iter_doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.entries.iter().map(|e| e.doc_id())
    }

    /// Doc ids with the skip metadata stripped
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.iter_doc_ids().collect()
    }
}
