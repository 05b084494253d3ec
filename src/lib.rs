pub mod core;
pub mod analysis;
pub mod storage;
pub mod index;
pub mod parallel;
pub mod query;
pub mod search;
pub mod mmap;

/*
                        INDEXING
  raw text ──> Normalizer ──> Indexer ──flush──> BlockStore (blocks/NNNNNNNN.blk)
                                 │                    │
                                 │             MergePlan / BlockMerger
                                 │           (balanced pairwise, one block left)
                                 ▼                    │
                 dictionary.txt  <term> <df> <offset> ◄┘
                                 [universal doc ids]
                 postings.txt    <term> [[1,3],4,7,9]

                        QUERYING
  "(a OR b) AND NOT c" ──> QueryParser (shunting-yard) ──> "a b OR c NOT AND"
                                                              │
                              Index (dictionary + mmap'd postings)
                                                              │
                                         QueryEvaluator (stack machine,
                                         skip-pointer AND, df-ordered chains)
                                                              ▼
                                                        ascending doc ids
*/
