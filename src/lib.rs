// Knight's tour search: board model, Warnsdorff-ordered DFS, validation.
pub mod batch;
pub mod board;
pub mod search;
pub mod validate;
