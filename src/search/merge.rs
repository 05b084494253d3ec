use std::iter::Peekable;
use crate::core::types::DocId;
use crate::index::posting::PostingList;

/// Linear union of two ascending id streams. Equal heads are emitted once;
/// the remainder of the longer stream is appended as-is.
pub fn union_sorted<I, J>(left: I, right: J) -> Vec<DocId>
where
    I: Iterator<Item = DocId>,
    J: Iterator<Item = DocId>,
{
    let mut left = left.peekable();
    let mut right = right.peekable();
    let mut result = Vec::with_capacity(left.size_hint().0 + right.size_hint().0);

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (Some(a), Some(b)) => {
                if a == b {
                    result.push(a);
                    left.next();
                    right.next();
                } else if a < b {
                    result.push(a);
                    left.next();
                } else {
                    result.push(b);
                    right.next();
                }
            }
            (Some(_), None) => {
                result.extend(left);
                break;
            }
            (None, Some(_)) => {
                result.extend(right);
                break;
            }
            (None, None) => break,
        }
    }

    result
}

/// `universe \ excluded`, one left-to-right pass over both streams.
pub fn difference_sorted<I, J>(universe: I, excluded: J) -> Vec<DocId>
where
    I: Iterator<Item = DocId>,
    J: Iterator<Item = DocId>,
{
    let mut excluded: Peekable<J> = excluded.peekable();
    let mut result = Vec::new();

    for doc_id in universe {
        while excluded.next_if(|&other| other < doc_id).is_some() {}
        if excluded.next_if_eq(&doc_id).is_none() {
            result.push(doc_id);
        }
    }

    result
}

pub fn union(list1: &PostingList, list2: &PostingList) -> Vec<DocId> {
    union_sorted(list1.iter_doc_ids(), list2.iter_doc_ids())
}

pub fn negate(universe: &[DocId], operand: &PostingList) -> Vec<DocId> {
    difference_sorted(universe.iter().copied(), operand.iter_doc_ids())
}
