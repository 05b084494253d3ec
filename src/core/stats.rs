use serde::{Serialize, Deserialize};

/// Counters collected over one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub blocks_flushed: usize,
    pub merges: usize,
    pub terms: usize,
    pub postings_bytes: u64,
}
