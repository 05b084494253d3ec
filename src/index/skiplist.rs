use crate::core::types::DocId;
use crate::index::posting::{PostingEntry, PostingList};

/// Place skip pointers on a sorted, duplicate-free id sequence.
///
/// For a list of length n > 1 there are floor(sqrt(n)) pointers, one every
/// floor(n / floor(sqrt(n))) entries starting at index 0. A pointer at i
/// targets min(i + stride, n - 1).
pub fn compute_skip_pointers(doc_ids: &[DocId]) -> PostingList {
    let len = doc_ids.len();
    let mut entries: Vec<PostingEntry> = doc_ids.iter()
        .map(|&doc_id| PostingEntry::Plain(doc_id))
        .collect();

    if len > 1 {
        let skip_count = len.isqrt();
        let stride = len / skip_count;

        for start in (0..skip_count).map(|k| k * stride) {
            let target = (start + stride).min(len - 1);
            if target > start {
                entries[start] = PostingEntry::Skipping(doc_ids[start], target);
            }
        }
    }

    PostingList { entries }
}

/// Intersect two posting lists, following skip pointers whenever the skip
/// target does not overshoot the other cursor's value.
pub fn intersect(list1: &PostingList, list2: &PostingList) -> Vec<DocId> {
    let mut result = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < list1.len() && j < list2.len() {
        let doc1 = list1.doc_id_at(i);
        let doc2 = list2.doc_id_at(j);

        if doc1 == doc2 {
            result.push(doc1);
            i += 1;
            j += 1;
        } else if doc1 < doc2 {
            i = list1.advance_towards(i, doc2);
        } else {
            j = list2.advance_towards(j, doc1);
        }
    }

    result
}

impl PostingList {
    /// Next cursor position when the value at `from` is below `target`:
    /// chase skip pointers while they stay <= target, else step by one.
    fn advance_towards(&self, from: usize, target: DocId) -> usize {
        let mut pos = from;
        let mut jumped = false;

        while let Some(next) = self.entries[pos].skip_target() {
            if self.doc_id_at(next) > target {
                break;
            }
            pos = next;
            jumped = true;
        }

        if jumped { pos } else { from + 1 }
    }
}
