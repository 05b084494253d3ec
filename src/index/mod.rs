pub mod posting;
pub mod skiplist;
pub mod codec;
pub mod dictionary;
pub mod postings_file;
pub mod indexer;
