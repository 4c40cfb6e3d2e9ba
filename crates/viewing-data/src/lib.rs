//! Ingestion and aggregation layer for viewing statistics.
//!
//! Responsible for locating and reading the raw viewing activity and
//! clickstream exports, normalising the comma-joined export schema, filtering
//! unusable rows, deriving calendar fields, computing the aggregate tables and
//! writing them as CSV artifacts.

pub mod aggregator;
pub mod cleaner;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use viewing_core as core;
