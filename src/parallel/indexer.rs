use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use crate::analysis::analyzer::Normalizer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, NormalizedDocument};

/// Worker pool for the embarrassingly parallel parts of indexing:
/// normalizing raw documents and same-height block merges.
pub struct ParallelIndexer {
    pub workers: usize,
    pool: ThreadPool,
}

impl ParallelIndexer {
    pub fn new(workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("boolidx-worker-{}", i))
            .build()
            .map_err(|e| Error::new(ErrorKind::Internal, format!("thread pool: {}", e)))?;

        Ok(ParallelIndexer { workers, pool })
    }

    /// Normalize a batch of raw documents, keeping input order
    pub fn normalize_batch(
        &self,
        documents: Vec<(DocId, String)>,
        normalizer: &dyn Normalizer,
    ) -> Vec<NormalizedDocument> {
        self.pool.install(|| {
            documents
                .into_par_iter()
                .map(|(id, text)| NormalizedDocument::new(id, normalizer.normalize(&text)))
                .collect()
        })
    }

    /// Run `op` inside this pool, so nested rayon work uses these workers
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }
}
