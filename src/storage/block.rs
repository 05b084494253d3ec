use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Serialize, Deserialize};
use crate::core::types::{DocId, Term};
use crate::search::merge::union_sorted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// Hands out monotonically increasing block ids. Shared by reference
/// between the flush loop and the merge planner.
#[derive(Debug, Default)]
pub struct BlockIdAllocator {
    next: AtomicU64,
}

impl BlockIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        BlockIdAllocator {
            next: AtomicU64::new(first),
        }
    }

    pub fn allocate(&self) -> BlockId {
        BlockId(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Partial index: term -> sorted, duplicate-free doc ids, ordered by term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    pub terms: BTreeMap<Term, Vec<DocId>>,
}

impl Block {
    pub fn new() -> Self {
        Block {
            terms: BTreeMap::new(),
        }
    }

    /// Sort an in-memory partial index by term.
    pub fn from_partial(partial: HashMap<Term, Vec<DocId>>) -> Self {
        Block {
            terms: partial.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.terms.get(term).map(|ids| ids.as_slice())
    }

    /// Union two blocks term by term. Terms present on one side only are
    /// carried over unchanged; shared terms get a sorted merge of both lists.
    pub fn merge(left: Block, right: Block) -> Block {
        let (mut base, other) = if left.len() >= right.len() {
            (left, right)
        } else {
            (right, left)
        };

        for (term, ids) in other.terms {
            match base.terms.entry(term) {
                Entry::Vacant(slot) => {
                    slot.insert(ids);
                }
                Entry::Occupied(mut slot) => {
                    let existing = std::mem::take(slot.get_mut());
                    *slot.get_mut() = union_sorted(existing.into_iter(), ids.into_iter());
                }
            }
        }

        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(entries: &[(&str, &[u64])]) -> Block {
        Block {
            terms: entries.iter()
                .map(|(term, ids)| (term.to_string(), ids.iter().map(|&v| DocId(v)).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_from_partial_sorts_terms() {
        let mut partial = HashMap::new();
        partial.insert("zebra".to_string(), vec![DocId(1)]);
        partial.insert("apple".to_string(), vec![DocId(2)]);
        let block = Block::from_partial(partial);
        let terms: Vec<&String> = block.terms.keys().collect();
        assert_eq!(terms, vec!["apple", "zebra"]);
    }

    #[test]
    fn test_merge_unions_and_carries_terms() {
        let left = block(&[("cat", &[1, 4]), ("sat", &[1])]);
        let right = block(&[("cat", &[2, 3, 4]), ("dog", &[2])]);

        let merged = Block::merge(left, right);
        assert_eq!(merged, block(&[
            ("cat", &[1, 2, 3, 4]),
            ("dog", &[2]),
            ("sat", &[1]),
        ]));
    }

    #[test]
    fn test_merge_is_symmetric() {
        let a = block(&[("x", &[1, 9]), ("y", &[5])]);
        let b = block(&[("x", &[3]), ("z", &[2])]);
        assert_eq!(Block::merge(a.clone(), b.clone()), Block::merge(b, a));
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let allocator = BlockIdAllocator::starting_at(5);
        assert_eq!(allocator.allocate(), BlockId(5));
        assert_eq!(allocator.allocate(), BlockId(6));
        assert_eq!(allocator.allocate(), BlockId(7));
    }
}
