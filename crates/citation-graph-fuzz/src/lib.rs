//! Fuzzing library for citation-graph.
//!
//! Targets cover the dataset loader, the flattener and the filter engine,
//! plus the action envelope the diagram client sends.
//!
//! # Usage
//!
//! ```bash
//! cd crates/citation-graph-fuzz
//! cargo +nightly fuzz run fuzz_tree_parse -- -max_total_time=60
//! ```

pub use citation_graph::{dataset, engine, models};
