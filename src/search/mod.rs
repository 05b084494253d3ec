pub mod merge;
pub mod evaluator;
pub mod engine;
pub mod results;
