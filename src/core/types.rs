use serde::{Serialize, Deserialize};
use std::fmt;

/// Document identifier. The ordering over ids is the canonical postings order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(pub u64);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized token string (lower-cased, stemmed)
pub type Term = String;

/// A document after normalization: its id and its term sequence in text order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub id: DocId,
    pub terms: Vec<Term>,
}

impl NormalizedDocument {
    pub fn new(id: DocId, terms: Vec<Term>) -> Self {
        NormalizedDocument { id, terms }
    }
}
