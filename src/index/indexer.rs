use std::collections::{BTreeSet, HashMap};
use std::mem;
use std::path::Path;
use crate::analysis::analyzer::Normalizer;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::IndexStats;
use crate::core::types::{DocId, NormalizedDocument, Term};
use crate::index::dictionary::{DictionaryWriter, TermInfo};
use crate::index::postings_file::PostingsWriter;
use crate::index::skiplist::compute_skip_pointers;
use crate::parallel::indexer::ParallelIndexer;
use crate::parallel::merger::{BlockMerger, MergePlan};
use crate::storage::block::{Block, BlockId, BlockIdAllocator};
use crate::storage::block_store::{BlockStore, FsBlockStore};
use crate::storage::corpus::DirectoryCorpus;

/// Result of an indexing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Every doc id seen, ascending
    pub universe: Vec<DocId>,
    pub stats: IndexStats,
}

/// Block-based index builder.
///
/// Documents accumulate in an in-memory partial index that is flushed to the
/// block store every `block_size_docs` documents. Once the input is
/// exhausted the blocks are merged pairwise down to one, which is written
/// out as the term dictionary and the postings file.
pub struct Indexer<'a> {
    config: Config,
    store: &'a dyn BlockStore,
    workers: ParallelIndexer,
    allocator: BlockIdAllocator,
    partial: HashMap<Term, Vec<DocId>>,
    docs_in_block: usize,
    flushed: Vec<BlockId>,
    universe: BTreeSet<DocId>,
    stats: IndexStats,
}

impl<'a> Indexer<'a> {
    pub fn new(config: Config, store: &'a dyn BlockStore) -> Result<Self> {
        config.validate()?;
        let workers = ParallelIndexer::new(config.workers)?;

        Ok(Indexer {
            config,
            store,
            workers,
            allocator: BlockIdAllocator::new(),
            partial: HashMap::new(),
            docs_in_block: 0,
            flushed: Vec::new(),
            universe: BTreeSet::new(),
            stats: IndexStats::default(),
        })
    }

    /// Index already-normalized documents. The first error from the input
    /// aborts the run.
    pub fn build_index<I>(mut self, documents: I, dict_out: &Path, postings_out: &Path) -> Result<BuildOutput>
    where
        I: IntoIterator<Item = Result<NormalizedDocument>>,
    {
        self.begin()?;
        for document in documents {
            self.add_document(document?)?;
        }
        self.finish(dict_out, postings_out)
    }

    /// Read, normalize and index every document of a directory corpus.
    /// Normalization runs on the worker pool one block's worth at a time.
    pub fn index_corpus(
        mut self,
        corpus: &DirectoryCorpus,
        normalizer: &dyn Normalizer,
        dict_out: &Path,
        postings_out: &Path,
    ) -> Result<BuildOutput> {
        log::info!("indexing {} documents from {}", corpus.len(), corpus.dir.display());
        self.begin()?;

        let mut batch = Vec::with_capacity(self.config.block_size_docs);
        for document in corpus.documents() {
            batch.push(document?);
            if batch.len() == self.config.block_size_docs {
                self.add_batch(mem::take(&mut batch), normalizer)?;
            }
        }
        if !batch.is_empty() {
            self.add_batch(batch, normalizer)?;
        }

        self.finish(dict_out, postings_out)
    }

    fn add_batch(&mut self, batch: Vec<(DocId, String)>, normalizer: &dyn Normalizer) -> Result<()> {
        for document in self.workers.normalize_batch(batch, normalizer) {
            self.add_document(document)?;
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        log::info!(
            "start of indexing (block size {} docs, parallel merge {})",
            self.config.block_size_docs, self.config.parallel_merge
        );
        self.store.reset()
    }

    fn add_document(&mut self, document: NormalizedDocument) -> Result<()> {
        let doc_id = document.id;
        for term in document.terms {
            let ids = self.partial.entry(term).or_default();
            if ids.last() != Some(&doc_id) {
                ids.push(doc_id);
            }
        }

        self.universe.insert(doc_id);
        self.docs_in_block += 1;
        self.stats.documents += 1;

        if self.stats.documents % self.config.progress_interval == 0 {
            log::info!("indexed {} documents", self.stats.documents);
        }
        if self.docs_in_block == self.config.block_size_docs {
            self.flush()?;
        }
        Ok(())
    }

    /// Persist the partial index as the next block and start a new one
    fn flush(&mut self) -> Result<()> {
        let mut partial = mem::take(&mut self.partial);
        // Ids arrive in input order, which need not be ascending
        for ids in partial.values_mut() {
            if !ids.is_sorted() {
                ids.sort_unstable();
                ids.dedup();
            }
        }

        let block = Block::from_partial(partial);
        let id = self.allocator.allocate();
        self.store.write_block(id, &block)?;
        log::debug!("flushed {} with {} terms from {} documents", id, block.len(), self.docs_in_block);

        self.flushed.push(id);
        self.docs_in_block = 0;
        self.stats.blocks_flushed += 1;
        Ok(())
    }

    fn finish(mut self, dict_out: &Path, postings_out: &Path) -> Result<BuildOutput> {
        // Always end with at least one block, even for an empty input
        if self.docs_in_block > 0 || self.flushed.is_empty() {
            self.flush()?;
        }

        log::info!("merging {} blocks", self.flushed.len());
        let plan = MergePlan::balanced(&self.flushed, &self.allocator);
        let merger = BlockMerger::new(self.store, self.config.parallel_merge);
        let root = self.workers.install(|| merger.execute(&plan))?
            .ok_or_else(|| Error::new(ErrorKind::Internal, "merge plan has no root".to_string()))?;
        self.stats.merges = plan.steps.len();

        log::info!("writing dictionary to {} and postings to {}", dict_out.display(), postings_out.display());
        self.write_artifacts(root, dict_out, postings_out)?;
        self.store.delete_block(root)?;

        log::info!(
            "end of indexing: {} documents, {} terms, {} blocks, {} merges",
            self.stats.documents, self.stats.terms, self.stats.blocks_flushed, self.stats.merges
        );
        Ok(BuildOutput {
            universe: self.universe.into_iter().collect(),
            stats: self.stats,
        })
    }

    fn write_artifacts(&mut self, root: BlockId, dict_out: &Path, postings_out: &Path) -> Result<()> {
        let block = self.store.read_block(root)?;
        let mut postings = PostingsWriter::create(postings_out)?;
        let mut dictionary = DictionaryWriter::create(dict_out)?;

        // BTreeMap iteration is already in term order
        for (term, doc_ids) in &block.terms {
            let list = compute_skip_pointers(doc_ids);
            let posting_offset = postings.append(term, &list)?;
            dictionary.add(term, TermInfo { doc_freq: list.doc_freq(), posting_offset })?;
        }

        self.stats.postings_bytes = postings.finish()?;
        let universe: Vec<DocId> = self.universe.iter().copied().collect();
        self.stats.terms = dictionary.finish(&universe)?;
        Ok(())
    }
}

/// One-shot build with a temporary block directory (or `config.blocks_dir`).
/// Returns the universal doc id set.
pub fn build_index<I>(
    documents: I,
    block_size_docs: usize,
    dict_out: &Path,
    postings_out: &Path,
) -> Result<Vec<DocId>>
where
    I: IntoIterator<Item = Result<NormalizedDocument>>,
{
    let config = Config::default().with_block_size(block_size_docs);
    let output = build_index_with_config(documents, &config, dict_out, postings_out)?;
    Ok(output.universe)
}

pub fn build_index_with_config<I>(
    documents: I,
    config: &Config,
    dict_out: &Path,
    postings_out: &Path,
) -> Result<BuildOutput>
where
    I: IntoIterator<Item = Result<NormalizedDocument>>,
{
    let store = match &config.blocks_dir {
        Some(dir) => FsBlockStore::open(dir.clone())?,
        None => FsBlockStore::temporary()?,
    };
    Indexer::new(config.clone(), &store)?.build_index(documents, dict_out, postings_out)
}
