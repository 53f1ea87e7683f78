//! Schema migration command
//!
//! Usage: cqc migrate

use cqc_core::Result;
use cqc_store::migrations::{applied_migrations, apply_migrations};
use cqc_store::CqcStore;

use super::StoreOptions;

pub fn execute(store: &StoreOptions) -> Result<()> {
    let mut config = store.store_config()?;
    config.apply_migrations = false;
    let mut store = CqcStore::open(&config)?;

    let before = applied_migrations(store.conn())?.len();
    apply_migrations(store.conn_mut())?;
    let applied = applied_migrations(store.conn())?;

    for id in &applied[before..] {
        println!("Applied {}", id);
    }
    println!(
        "Schema at {} ({} migrations)",
        config.database_path.display(),
        applied.len()
    );

    store.close()
}
