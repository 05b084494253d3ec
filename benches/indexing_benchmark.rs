use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use boolidx::core::config::Config;
use boolidx::core::types::{DocId, NormalizedDocument};
use boolidx::index::indexer::Indexer;
use boolidx::storage::block_store::{FsBlockStore, MemoryBlockStore};
use rand::Rng;

/// Helper to create normalized test documents
fn create_test_documents(count: u64, terms_per_doc: usize) -> Vec<NormalizedDocument> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|id| {
            let terms = (0..terms_per_doc)
                .map(|_| format!("term{}", rng.gen_range(0..5_000)))
                .collect();
            NormalizedDocument::new(DocId(id), terms)
        })
        .collect()
}

fn bench_build_index(c: &mut Criterion) {
    let documents = create_test_documents(10_000, 50);
    let out_dir = tempfile::tempdir().unwrap();
    let dict = out_dir.path().join("dictionary.txt");
    let postings = out_dir.path().join("postings.txt");

    let mut group = c.benchmark_group("build_index");
    group.sample_size(10);

    for block_size in [500, 2000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("memory_store", block_size),
            &block_size,
            |b, &block_size| {
                b.iter(|| {
                    let store = MemoryBlockStore::new();
                    let input = documents.iter().cloned().map(Ok);
                    let output = Indexer::new(Config::default().with_block_size(block_size), &store).unwrap()
                        .build_index(input, &dict, &postings)
                        .unwrap();
                    black_box(output);
                });
            },
        );
    }

    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("fs_store_parallel_merge", parallel),
            &parallel,
            |b, &parallel| {
                b.iter(|| {
                    let store = FsBlockStore::temporary().unwrap();
                    let input = documents.iter().cloned().map(Ok);
                    let config = Config::default().with_block_size(500).with_parallel_merge(parallel);
                    let output = Indexer::new(config, &store).unwrap()
                        .build_index(input, &dict, &postings)
                        .unwrap();
                    black_box(output);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build_index);
criterion_main!(benches);
