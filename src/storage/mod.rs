pub mod layout;
pub mod block;
pub mod block_store;
pub mod corpus;
