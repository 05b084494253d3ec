use rayon::prelude::*;
use crate::core::error::Result;
use crate::storage::block::{Block, BlockId, BlockIdAllocator};
use crate::storage::block_store::BlockStore;

/// One node of the merge tree: `left` and `right` are merged into `output`.
/// `height` is 1 for merges of two flushed blocks; steps of equal height
/// never depend on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStep {
    pub left: BlockId,
    pub right: BlockId,
    pub output: BlockId,
    pub height: usize,
}

/// Balanced binary merge tree over a run of flushed blocks, with output ids
/// assigned up front in post-order (left subtree, right subtree, node).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub steps: Vec<MergeStep>,
    root: Option<BlockId>,
}

enum Frame {
    Visit { lo: usize, hi: usize },
    Combine,
}

impl MergePlan {
    /// Split `[lo, hi]` at `mid = (lo + hi) / 2` until single blocks remain.
    /// Built with an explicit stack, so any block count is fine.
    pub fn balanced(leaves: &[BlockId], allocator: &BlockIdAllocator) -> Self {
        if leaves.is_empty() {
            return MergePlan::default();
        }

        let mut steps = Vec::with_capacity(leaves.len() - 1);
        let mut frames = vec![Frame::Visit { lo: 0, hi: leaves.len() - 1 }];
        let mut results: Vec<(BlockId, usize)> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Visit { lo, hi } if lo == hi => results.push((leaves[lo], 0)),
                Frame::Visit { lo, hi } => {
                    let mid = (lo + hi) / 2;
                    frames.push(Frame::Combine);
                    frames.push(Frame::Visit { lo: mid + 1, hi });
                    frames.push(Frame::Visit { lo, hi: mid });
                }
                Frame::Combine => {
                    // Both subtrees were pushed before this frame ran
                    let (right, right_height) = results.pop().unwrap_or_else(|| unreachable!());
                    let (left, left_height) = results.pop().unwrap_or_else(|| unreachable!());
                    let step = MergeStep {
                        left,
                        right,
                        output: allocator.allocate(),
                        height: left_height.max(right_height) + 1,
                    };
                    results.push((step.output, step.height));
                    steps.push(step);
                }
            }
        }

        MergePlan {
            steps,
            root: results.pop().map(|(id, _)| id),
        }
    }

    /// The block left standing once every step has run
    pub fn root(&self) -> Option<BlockId> {
        self.root
    }

    pub fn height(&self) -> usize {
        self.steps.iter().map(|s| s.height).max().unwrap_or(0)
    }
}

/// Executes merge plans against a block store
pub struct BlockMerger<'a> {
    pub store: &'a dyn BlockStore,
    pub parallel: bool,
}

impl<'a> BlockMerger<'a> {
    pub fn new(store: &'a dyn BlockStore, parallel: bool) -> Self {
        BlockMerger { store, parallel }
    }

    /// Run every step; returns the root block id (None for an empty plan).
    /// In parallel mode all steps of one height run together on the
    /// current rayon pool, heights in ascending order.
    pub fn execute(&self, plan: &MergePlan) -> Result<Option<BlockId>> {
        if self.parallel {
            for height in 1..=plan.height() {
                plan.steps
                    .par_iter()
                    .filter(|step| step.height == height)
                    .try_for_each(|step| self.merge(step))?;
            }
        } else {
            for step in &plan.steps {
                self.merge(step)?;
            }
        }
        Ok(plan.root())
    }

    /// Read both inputs, write their union under the output id, then delete
    /// the inputs.
    pub fn merge(&self, step: &MergeStep) -> Result<()> {
        let left = self.store.read_block(step.left)?;
        let right = self.store.read_block(step.right)?;
        let (left_terms, right_terms) = (left.len(), right.len());

        let merged = Block::merge(left, right);
        self.store.write_block(step.output, &merged)?;
        self.store.delete_block(step.left)?;
        self.store.delete_block(step.right)?;

        log::debug!(
            "merged {} ({} terms) + {} ({} terms) -> {} ({} terms)",
            step.left, left_terms, step.right, right_terms, step.output, merged.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::types::DocId;
    use crate::storage::block_store::MemoryBlockStore;

    fn leaves(n: u64) -> Vec<BlockId> {
        (0..n).map(BlockId).collect()
    }

    fn step(left: u64, right: u64, output: u64, height: usize) -> MergeStep {
        MergeStep { left: BlockId(left), right: BlockId(right), output: BlockId(output), height }
    }

    #[test]
    fn test_single_block_is_its_own_root() {
        let plan = MergePlan::balanced(&leaves(1), &BlockIdAllocator::starting_at(1));
        assert!(plan.steps.is_empty());
        assert_eq!(plan.root(), Some(BlockId(0)));
        assert_eq!(MergePlan::balanced(&[], &BlockIdAllocator::new()).root(), None);
    }

    #[test]
    fn test_post_order_ids_for_five_blocks() {
        // [0,4] -> [0,2] + [3,4]; [0,2] -> [0,1] + [2]
        let plan = MergePlan::balanced(&leaves(5), &BlockIdAllocator::starting_at(5));
        assert_eq!(plan.steps, vec![
            step(0, 1, 5, 1),
            step(5, 2, 6, 2),
            step(3, 4, 7, 1),
            step(6, 7, 8, 3),
        ]);
        assert_eq!(plan.root(), Some(BlockId(8)));
        assert_eq!(plan.height(), 3);
    }

    #[test]
    fn test_large_plan_is_balanced() {
        let n = 10_000u64;
        let plan = MergePlan::balanced(&leaves(n), &BlockIdAllocator::starting_at(n));
        assert_eq!(plan.steps.len() as u64, n - 1);
        assert_eq!(plan.root(), Some(BlockId(2 * n - 2)));
        assert_eq!(plan.height(), 14);
    }

    fn seed_store(store: &MemoryBlockStore, n: u64) {
        for i in 0..n {
            let mut block = Block::new();
            block.terms.insert("shared".to_string(), vec![DocId(i)]);
            block.terms.insert(format!("only{}", i), vec![DocId(i)]);
            store.write_block(BlockId(i), &block).unwrap();
        }
    }

    fn check_execution(parallel: bool) {
        let n = 7;
        let store = MemoryBlockStore::new();
        seed_store(&store, n);

        let plan = MergePlan::balanced(&leaves(n), &BlockIdAllocator::starting_at(n));
        let root = BlockMerger::new(&store, parallel).execute(&plan).unwrap().unwrap();

        assert_eq!(store.block_ids().unwrap(), vec![root]);
        let block = store.read_block(root).unwrap();
        assert_eq!(block.len(), n as usize + 1);
        assert_eq!(block.postings("shared").unwrap(), (0..n).map(DocId).collect::<Vec<_>>());
        assert_eq!(block.postings("only3").unwrap(), &[DocId(3)]);
    }

    #[test]
    fn test_sequential_execution_leaves_one_block() {
        check_execution(false);
    }

    #[test]
    fn test_parallel_execution_leaves_one_block() {
        check_execution(true);
    }

    #[test]
    fn test_missing_input_block_is_fatal() {
        let store = MemoryBlockStore::new();
        seed_store(&store, 1);
        let err = BlockMerger::new(&store, false)
            .merge(&step(0, 1, 2, 1))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BlockNotFound);
    }
}
