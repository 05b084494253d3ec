use std::collections::{BTreeMap, BTreeSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use boolidx::core::types::DocId;
use boolidx::index::codec::{decode, encode};
use boolidx::index::skiplist::compute_skip_pointers;
use boolidx::parallel::merger::{BlockMerger, MergePlan};
use boolidx::storage::block::{Block, BlockId, BlockIdAllocator};
use boolidx::storage::block_store::{BlockStore, MemoryBlockStore};

/// Blocks over disjoint doc id ranges, like the indexer produces
fn random_blocks(rng: &mut StdRng, count: usize) -> Vec<Block> {
    (0..count)
        .map(|b| {
            let mut terms: BTreeMap<String, BTreeSet<DocId>> = BTreeMap::new();
            for doc in 0..rng.gen_range(1..20u64) {
                let doc_id = DocId(b as u64 * 100 + doc);
                for _ in 0..rng.gen_range(1..5) {
                    let term = format!("t{}", rng.gen_range(0..15));
                    terms.entry(term).or_default().insert(doc_id);
                }
            }
            Block {
                terms: terms.into_iter().map(|(t, ids)| (t, ids.into_iter().collect())).collect(),
            }
        })
        .collect()
}

fn merge_all(blocks: &[Block], parallel: bool) -> Block {
    let store = MemoryBlockStore::new();
    let allocator = BlockIdAllocator::new();
    let mut leaves = Vec::new();
    for block in blocks {
        let id = allocator.allocate();
        store.write_block(id, block).unwrap();
        leaves.push(id);
    }

    let plan = MergePlan::balanced(&leaves, &allocator);
    let root: BlockId = BlockMerger::new(&store, parallel).execute(&plan).unwrap().unwrap();
    assert_eq!(store.block_ids().unwrap(), vec![root]);
    store.read_block(root).unwrap()
}

fn expected_union(blocks: &[Block]) -> Block {
    let mut terms: BTreeMap<String, BTreeSet<DocId>> = BTreeMap::new();
    for block in blocks {
        for (term, ids) in &block.terms {
            terms.entry(term.clone()).or_default().extend(ids.iter().copied());
        }
    }
    Block {
        terms: terms.into_iter().map(|(t, ids)| (t, ids.into_iter().collect())).collect(),
    }
}

#[test]
fn test_merge_result_independent_of_block_order() {
    let mut rng = StdRng::seed_from_u64(42);
    for count in [1, 2, 3, 5, 8, 13] {
        let mut blocks = random_blocks(&mut rng, count);
        let expected = expected_union(&blocks);

        for round in 0..4 {
            blocks.shuffle(&mut rng);
            assert_eq!(merge_all(&blocks, round % 2 == 1), expected, "{} blocks", count);
        }
    }
}

#[test]
fn test_codec_round_trip_over_random_lists() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let ids: BTreeSet<u64> = (0..rng.gen_range(0..300)).map(|_| rng.gen_range(0..5_000)).collect();
        let ids: Vec<DocId> = ids.into_iter().map(DocId).collect();

        let list = compute_skip_pointers(&ids);
        let decoded = decode(&encode(&list)).unwrap();
        assert_eq!(decoded, list);
        assert_eq!(decoded.doc_ids(), ids);
        if ids.len() > 1 {
            assert_eq!(decoded.skip_count(), ids.len().isqrt());
        }
    }
}
