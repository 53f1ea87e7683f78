//! Usage: cqc dict list [--limit N --offset N --order-by COL --order ASC|DESC]

use clap::{Args, Subcommand};
use cqc_core::Result;
use cqc_store::DictionaryRepo;

use super::{PageArgs, StoreOptions};

#[derive(Debug, Args)]
pub struct DictArgs {
    #[command(subcommand)]
    pub command: DictCommand,
}

#[derive(Debug, Subcommand)]
pub enum DictCommand {
    /// List element types
    List(PageArgs),
}

pub fn execute(args: DictArgs, store: &StoreOptions) -> Result<()> {
    let store = store.open()?;
    match args.command {
        DictCommand::List(page) => {
            for entry in DictionaryRepo::select_all(store.conn(), &page.page())? {
                let flag = if entry.is_deleted { "  (deleted)" } else { "" };
                println!("{}  {}{}", entry.id, entry.name, flag);
            }
        }
    }
    store.close()
}
