//! Report content packs released after a cutoff from an index archive.
//!
//! The binary wires these modules to the CLI; the library surface exists so
//! the scan can run against injected resolvers and reporters.
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod index_pack;
pub mod report;
pub mod scan;
pub mod timestamp;
pub mod workflow;

pub use error::ScanError;
pub use index_pack::IndexPack;
pub use report::{PackSummary, ScanReport};
