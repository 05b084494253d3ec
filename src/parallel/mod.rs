pub mod indexer;
pub mod merger;
