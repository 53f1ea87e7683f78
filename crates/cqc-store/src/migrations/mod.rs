//! Migration framework
//!
//! - Embedded SQL migrations, applied in order
//! - One transaction per migration, recorded with a SHA-256 checksum
//! - Idempotent; edited migrations are detected by checksum

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
