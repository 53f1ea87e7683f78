//! Usage: cqc hierarchy list [--limit N]

use clap::{Args, Subcommand};
use cqc_core::query::DEFAULT_LIMIT;
use cqc_core::Result;
use cqc_store::HierarchyRepo;

use super::StoreOptions;

#[derive(Debug, Args)]
pub struct HierarchyArgs {
    #[command(subcommand)]
    pub command: HierarchyCommand,
}

#[derive(Debug, Subcommand)]
pub enum HierarchyCommand {
    /// List parent -> child type edges in insertion order
    List {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
}

pub fn execute(args: HierarchyArgs, store: &StoreOptions) -> Result<()> {
    let store = store.open()?;
    match args.command {
        HierarchyCommand::List { limit } => {
            for edge in HierarchyRepo::select_all(store.conn(), limit)? {
                println!("{}", edge);
            }
        }
    }
    store.close()
}
