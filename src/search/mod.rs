pub mod control;
pub mod engine;
pub mod ordering;
pub mod stats;
