use crate::core::types::DocId;

/// One result line: ascending ids separated by single spaces, empty when
/// nothing matched
pub fn format_result(doc_ids: &[DocId]) -> String {
    doc_ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome of a query batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub queries: usize,
    pub failed: usize,
    pub total_hits: usize,
}
