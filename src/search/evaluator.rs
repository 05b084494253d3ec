use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Term};
use crate::index::posting::PostingList;
use crate::index::skiplist::intersect;
use crate::query::types::{Operator, QueryToken};
use crate::search::merge::{negate, union};

/// Where the evaluator gets its posting lists from
pub trait PostingsSource {
    /// Document frequency without touching the postings; 0 if unknown
    fn doc_freq(&self, term: &str) -> usize;

    /// Posting list of a term; empty if unknown
    fn postings(&self, term: &str) -> Result<PostingList>;

    /// Every indexed doc id, ascending
    fn universe(&self) -> &[DocId];
}

/// Stack entry. Terms stay unread until an operator consumes them; chained
/// ANDs are collected and only intersected once something needs the result.
#[derive(Debug)]
enum Operand {
    Term(Term),
    List(PostingList),
    Conjunction(Vec<Operand>),
}

/// Stack machine over postfix tokens
pub struct QueryEvaluator<'a> {
    source: &'a dyn PostingsSource,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(source: &'a dyn PostingsSource) -> Self {
        QueryEvaluator { source }
    }

    /// Ascending doc ids matching the query. An empty query matches nothing.
    pub fn evaluate(&self, postfix: &[QueryToken]) -> Result<Vec<DocId>> {
        let mut stack: Vec<Operand> = Vec::new();

        for token in postfix {
            match token {
                QueryToken::Operand(term) => stack.push(Operand::Term(term.clone())),
                QueryToken::Op(op) => {
                    if stack.len() < op.arity() {
                        return Err(Error::new(
                            ErrorKind::InvalidQuery,
                            format!("{} is missing an operand", op),
                        ));
                    }
                    let result = self.apply(*op, &mut stack)?;
                    stack.push(result);
                }
            }
        }

        match stack.len() {
            0 => Ok(Vec::new()),
            1 => {
                let last = stack.pop().unwrap_or_else(|| unreachable!());
                Ok(self.resolve(last)?.doc_ids())
            }
            n => Err(Error::new(
                ErrorKind::InvalidQuery,
                format!("{} operands are not joined by an operator", n),
            )),
        }
    }

    fn apply(&self, op: Operator, stack: &mut Vec<Operand>) -> Result<Operand> {
        // Arity was checked by the caller
        let mut pop = || stack.pop().unwrap_or_else(|| unreachable!());

        match op {
            Operator::Not => {
                let operand = self.resolve(pop())?;
                let negated = negate(self.source.universe(), &operand);
                Ok(Operand::List(PostingList::from_doc_ids(&negated)))
            }
            Operator::And => {
                let right = pop();
                let left = pop();
                let mut operands = flatten(left);
                operands.extend(flatten(right));
                Ok(Operand::Conjunction(operands))
            }
            Operator::Or => {
                let right = self.resolve(pop())?;
                let left = self.resolve(pop())?;
                Ok(Operand::List(PostingList::from_doc_ids(&union(&left, &right))))
            }
        }
    }

    fn resolve(&self, operand: Operand) -> Result<PostingList> {
        match operand {
            Operand::Term(term) => self.source.postings(&term),
            Operand::List(list) => Ok(list),
            Operand::Conjunction(operands) => self.intersect_all(operands),
        }
    }

    /// Intersect smallest-first, so every step starts from the smallest
    /// possible accumulator. Stops reading as soon as the result is empty.
    fn intersect_all(&self, mut operands: Vec<Operand>) -> Result<PostingList> {
        operands.sort_by_key(|operand| self.cost(operand));

        let mut operands = operands.into_iter();
        let mut acc = match operands.next() {
            Some(first) => self.resolve(first)?,
            None => return Ok(PostingList::new()),
        };

        for operand in operands {
            if acc.is_empty() {
                break;
            }
            let next = self.resolve(operand)?;
            acc = PostingList::from_doc_ids(&intersect(&acc, &next));
        }

        Ok(acc)
    }

    fn cost(&self, operand: &Operand) -> usize {
        match operand {
            Operand::Term(term) => self.source.doc_freq(term),
            Operand::List(list) => list.len(),
            Operand::Conjunction(operands) => {
                operands.iter().map(|o| self.cost(o)).min().unwrap_or(0)
            }
        }
    }
}

fn flatten(operand: Operand) -> Vec<Operand> {
    match operand {
        Operand::Conjunction(operands) => operands,
        other => vec![other],
    }
}

/// Evaluate a postfix query against a postings source
pub fn evaluate(postfix: &[QueryToken], source: &dyn PostingsSource) -> Result<Vec<DocId>> {
    QueryEvaluator::new(source).evaluate(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory source that records which terms were read
    struct MemorySource {
        lists: HashMap<String, Vec<DocId>>,
        universe: Vec<DocId>,
        reads: RefCell<Vec<String>>,
    }

    impl MemorySource {
        fn new(entries: &[(&str, &[u64])], universe: &[u64]) -> Self {
            MemorySource {
                lists: entries.iter()
                    .map(|(term, ids)| (term.to_string(), ids.iter().map(|&v| DocId(v)).collect()))
                    .collect(),
                universe: universe.iter().map(|&v| DocId(v)).collect(),
                reads: RefCell::new(Vec::new()),
            }
        }

        fn scenario() -> Self {
            // 1: "the cat sat", 2: "the dog sat", 3: "cats and dogs"
            MemorySource::new(&[
                ("and", &[3]),
                ("cat", &[1, 3]),
                ("dog", &[2, 3]),
                ("sat", &[1, 2]),
                ("the", &[1, 2]),
            ], &[1, 2, 3])
        }
    }

    impl PostingsSource for MemorySource {
        fn doc_freq(&self, term: &str) -> usize {
            self.lists.get(term).map(|ids| ids.len()).unwrap_or(0)
        }

        fn postings(&self, term: &str) -> Result<PostingList> {
            self.reads.borrow_mut().push(term.to_string());
            Ok(self.lists.get(term)
                .map(|ids| PostingList::from_doc_ids(ids))
                .unwrap_or_default())
        }

        fn universe(&self) -> &[DocId] {
            &self.universe
        }
    }

    fn postfix(text: &str) -> Vec<QueryToken> {
        text.split_whitespace()
            .map(|word| match Operator::from_keyword(word) {
                Some(op) => QueryToken::Op(op),
                None => QueryToken::Operand(word.to_string()),
            })
            .collect()
    }

    fn run(source: &MemorySource, text: &str) -> Vec<u64> {
        evaluate(&postfix(text), source).unwrap().into_iter().map(|d| d.0).collect()
    }

    #[test]
    fn test_scenario_queries() {
        let source = MemorySource::scenario();
        assert_eq!(run(&source, "sat dog AND"), vec![2]);
        assert_eq!(run(&source, "sat dog NOT AND"), vec![1]);
        assert_eq!(run(&source, "cat dog OR"), vec![1, 2, 3]);
        assert_eq!(run(&source, "sat cat OR dog NOT AND"), vec![1]);
        assert_eq!(run(&source, "sat"), vec![1, 2]);
    }

    #[test]
    fn test_unknown_terms() {
        let source = MemorySource::scenario();
        assert_eq!(run(&source, "sat bird AND"), Vec::<u64>::new());
        assert_eq!(run(&source, "sat bird OR"), vec![1, 2]);
        assert_eq!(run(&source, "bird NOT"), vec![1, 2, 3]);
        assert_eq!(run(&source, "bird"), Vec::<u64>::new());
    }

    #[test]
    fn test_conjunction_reads_smallest_first_and_short_circuits() {
        let source = MemorySource::new(&[
            ("big", &[1, 2, 3, 4, 5, 6]),
            ("mid", &[2, 4, 6]),
            ("small", &[4]),
        ], &[1, 2, 3, 4, 5, 6]);

        assert_eq!(run(&source, "big mid small AND AND"), vec![4]);
        assert_eq!(*source.reads.borrow(), vec!["small", "mid", "big"]);

        source.reads.borrow_mut().clear();
        assert_eq!(run(&source, "big mid AND missing AND"), Vec::<u64>::new());
        assert_eq!(*source.reads.borrow(), vec!["missing"]);
    }

    #[test]
    fn test_each_operand_read_once() {
        let source = MemorySource::scenario();
        assert_eq!(run(&source, "cat dog sat AND AND the OR"), vec![1, 2]);
        let mut reads = source.reads.borrow().clone();
        reads.sort();
        assert_eq!(reads, vec!["cat", "dog", "sat", "the"]);
    }

    #[test]
    fn test_double_negation() {
        let source = MemorySource::scenario();
        assert_eq!(run(&source, "dog NOT NOT"), vec![2, 3]);
    }

    #[test]
    fn test_malformed_postfix() {
        let source = MemorySource::scenario();
        for text in ["AND", "cat AND", "NOT", "cat dog"] {
            let err = evaluate(&postfix(text), &source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidQuery, "{}", text);
        }
        assert!(evaluate(&[], &source).unwrap().is_empty());
    }
}
