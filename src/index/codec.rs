//! Textual codec for posting lists.
//!
//! A list is written as a compact JSON array on a single line, where each
//! element is either a bare id or an `[id, skip_target]` pair:
//! `[1,[4,3],7,9]`. Decoding validates shape and ordering instead of
//! trusting the bytes.

use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::posting::{PostingEntry, PostingList};

pub fn encode(list: &PostingList) -> Vec<u8> {
    let mut buf = Vec::with_capacity(list.len() * 8 + 2);
    encode_into(list, &mut buf);
    buf
}

pub fn encode_into(list: &PostingList, buf: &mut Vec<u8>) {
    // Serializing plain integers and pairs into a Vec cannot fail
    serde_json::to_writer(&mut *buf, &list.entries)
        .unwrap_or_else(|e| unreachable!("posting list serialization failed: {}", e));
}

pub fn decode(bytes: &[u8]) -> Result<PostingList> {
    let entries: Vec<PostingEntry> = serde_json::from_slice(bytes)
        .map_err(|e| Error::malformed_postings(format!("not a posting list: {}", e)))?;

    validate(&entries)?;
    Ok(PostingList { entries })
}

/// Ids strictly increasing, skip targets forward and in range.
fn validate(entries: &[PostingEntry]) -> Result<()> {
    let mut previous: Option<DocId> = None;

    for (index, entry) in entries.iter().enumerate() {
        let doc_id = entry.doc_id();
        if let Some(prev) = previous {
            if doc_id <= prev {
                return Err(Error::malformed_postings(format!(
                    "doc id {} at index {} does not increase (previous {})",
                    doc_id, index, prev
                )));
            }
        }
        previous = Some(doc_id);

        if let Some(target) = entry.skip_target() {
            if target <= index || target >= entries.len() {
                return Err(Error::malformed_postings(format!(
                    "skip target {} at index {} is out of range (len {})",
                    target, index, entries.len()
                )));
            }
        }
    }

    Ok(())
}

/// Encode a bare id sequence (no skip pointers).
pub fn encode_doc_ids(doc_ids: &[DocId]) -> Vec<u8> {
    let list = PostingList {
        entries: doc_ids.iter().map(|&id| PostingEntry::Plain(id)).collect(),
    };
    encode(&list)
}
