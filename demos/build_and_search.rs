//! End-to-end demo: index a small directory of documents, then answer a
//! batch of boolean queries.
//!
//! Run with `RUST_LOG=debug cargo run --example build_and_search` to see
//! block flushes and merges.

use std::fs;
use std::io::BufReader;
use std::sync::Arc;
use boolidx::analysis::analyzer::Analyzer;
use boolidx::core::config::Config;
use boolidx::index::indexer::Indexer;
use boolidx::search::engine::{Index, SearchEngine};
use boolidx::storage::block_store::FsBlockStore;
use boolidx::storage::corpus::DirectoryCorpus;

const DOCUMENTS: &[(u64, &str)] = &[
    (1, "The cat sat on the mat."),
    (2, "The dog sat on the log."),
    (3, "Cats and dogs are natural enemies."),
    (4, "A quick brown fox jumps over the lazy dog."),
    (5, "Rust makes systems programming safe."),
    (6, "The fox and the cat became friends."),
];

const QUERIES: &str = "sat AND dog
sat AND NOT dog
cat OR dog
(sat OR cat) AND NOT dog
fox AND (cat OR dog)
NOT the
(unbalanced AND query
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let work_dir = tempfile::tempdir()?;
    let corpus_dir = work_dir.path().join("corpus");
    fs::create_dir_all(&corpus_dir)?;
    for (id, text) in DOCUMENTS {
        fs::write(corpus_dir.join(id.to_string()), text)?;
    }

    let dict_path = work_dir.path().join("dictionary.txt");
    let postings_path = work_dir.path().join("postings.txt");
    let config = Config::default().with_block_size(2);
    let analyzer = Arc::new(Analyzer::standard_english());

    println!("Indexing {} documents...", DOCUMENTS.len());
    let store = FsBlockStore::temporary()?;
    let corpus = DirectoryCorpus::open(&corpus_dir)?;
    let output = Indexer::new(config.clone(), &store)?
        .index_corpus(&corpus, analyzer.as_ref(), &dict_path, &postings_path)?;
    println!("  {:?}\n", output.stats);

    println!("Dictionary:\n{}", fs::read_to_string(&dict_path)?);
    println!("Postings:\n{}", fs::read_to_string(&postings_path)?);

    let index = Index::open(&dict_path, &postings_path)?;
    let engine = SearchEngine::new(Arc::new(index), analyzer, &config);

    let mut results = Vec::new();
    let summary = engine.run_batch(BufReader::new(QUERIES.as_bytes()), &mut results)?;
    let results = String::from_utf8(results)?;

    println!("Results:");
    for (query, line) in QUERIES.lines().zip(results.lines()) {
        println!("  {:<28} -> [{}]", query, line);
    }
    println!("\n{:?}", summary);

    Ok(())
}
