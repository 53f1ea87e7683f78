//! Subcommands and the options they share

use std::path::PathBuf;

use clap::Args;
use cqc_core::query::{DEFAULT_LIMIT, DEFAULT_ORDER_BY};
use cqc_core::{Page, Result, SortOrder};
use cqc_store::{CqcStore, StoreConfig};

pub mod course;
pub mod dict;
pub mod element;
pub mod hierarchy;
pub mod migrate;
pub mod seed;

/// Where the store lives
///
/// Without `--config` the settings come from `CQC_*` environment variables
/// (and `.env`); `--db` overrides the database path either way.
#[derive(Debug, Args)]
pub struct StoreOptions {
    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// TOML store configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl StoreOptions {
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::from_toml_file(path)?,
            None => StoreConfig::from_env()?,
        };
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        Ok(config)
    }

    pub fn open(&self) -> Result<CqcStore> {
        CqcStore::open(&self.store_config()?)
    }
}

/// Paging flags shared by the list commands
#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Column to sort by
    #[arg(long, default_value = DEFAULT_ORDER_BY)]
    pub order_by: String,

    /// ASC or DESC
    #[arg(long, default_value = "ASC")]
    pub order: SortOrder,
}

impl PageArgs {
    pub fn page(&self) -> Page {
        Page::new()
            .limit(self.limit)
            .offset(self.offset)
            .order_by(self.order_by.clone())
            .order(self.order)
    }
}
