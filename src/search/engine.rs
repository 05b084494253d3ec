use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use rayon::prelude::*;
use crate::analysis::analyzer::Normalizer;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::dictionary::TermDictionary;
use crate::index::posting::PostingList;
use crate::index::postings_file::PostingsReader;
use crate::query::parser::QueryParser;
use crate::search::evaluator::{PostingsSource, QueryEvaluator};
use crate::search::results::{format_result, BatchSummary};

/// A finished index opened for querying: the term dictionary in memory and
/// the postings file memory-mapped. Immutable, so it can be shared freely
/// between threads.
pub struct Index {
    pub dictionary: TermDictionary,
    postings: PostingsReader,
}

impl Index {
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(dict_path: P, postings_path: Q) -> Result<Self> {
        let dictionary = TermDictionary::load(dict_path)?;
        let postings = PostingsReader::open(postings_path)?;
        log::debug!(
            "opened index with {} terms over {} documents",
            dictionary.len(), dictionary.universe.len()
        );
        Ok(Index { dictionary, postings })
    }
}

impl PostingsSource for Index {
    fn doc_freq(&self, term: &str) -> usize {
        self.dictionary.doc_freq(term)
    }

    fn postings(&self, term: &str) -> Result<PostingList> {
        let Some(info) = self.dictionary.get(term) else {
            return Ok(PostingList::new());
        };

        let list = self.postings.read_at(info.posting_offset)?;
        if list.doc_freq() != info.doc_freq {
            return Err(Error::malformed_postings(format!(
                "term {:?}: dictionary says {} postings, file has {}",
                term, info.doc_freq, list.doc_freq()
            )));
        }
        Ok(list)
    }

    fn universe(&self) -> &[DocId] {
        &self.dictionary.universe
    }
}

/// Parses and evaluates boolean queries against an index
pub struct SearchEngine {
    pub index: Arc<Index>,
    pub parser: QueryParser,
}

impl SearchEngine {
    pub fn new(index: Arc<Index>, normalizer: Arc<dyn Normalizer>, config: &Config) -> Self {
        SearchEngine {
            index,
            parser: QueryParser::new(normalizer, config.max_query_length),
        }
    }

    pub fn search(&self, query: &str) -> Result<Vec<DocId>> {
        let postfix = self.parser.parse(query)?;
        QueryEvaluator::new(self.index.as_ref()).evaluate(&postfix)
    }

    /// Independent queries evaluated on the rayon pool; results in input order
    pub fn search_all(&self, queries: &[String]) -> Vec<Result<Vec<DocId>>> {
        queries.par_iter().map(|query| self.search(query)).collect()
    }

    /// One query per input line, one result line per query. A query that
    /// fails on its own is logged and answered with an empty line; any
    /// other error stops the batch.
    pub fn run_batch<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<BatchSummary> {
        let queries = input.lines().collect::<std::io::Result<Vec<String>>>()?;
        log::info!("running {} queries", queries.len());

        let mut summary = BatchSummary::default();
        for (line_no, (query, result)) in queries.iter().zip(self.search_all(&queries)).enumerate() {
            summary.queries += 1;
            let doc_ids = match result {
                Ok(doc_ids) => doc_ids,
                Err(e) if e.is_query_local() => {
                    log::warn!("query {} ({:?}) failed: {}", line_no + 1, query, e);
                    summary.failed += 1;
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            summary.total_hits += doc_ids.len();
            writeln!(output, "{}", format_result(&doc_ids))?;
        }

        output.flush()?;
        log::info!(
            "finished {} queries ({} failed, {} hits)",
            summary.queries, summary.failed, summary.total_hits
        );
        Ok(summary)
    }
}
