//! Seed import
//!
//! - YAML seed format v0
//! - Parser with structural validation
//! - Canonical digest
//! - Importer running the whole seed through the repositories in one
//!   transaction

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format::SeedV0;
pub use importer::{import_seed, import_seed_file, SeedReport};
pub use parser::{parse_seed_file, parse_seed_str};
