//! Usage: cqc element list [--limit N --offset N --order-by COL --order ASC|DESC]

use clap::{Args, Subcommand};
use cqc_core::Result;
use cqc_store::ElementRepo;

use super::{PageArgs, StoreOptions};

#[derive(Debug, Args)]
pub struct ElementArgs {
    #[command(subcommand)]
    pub command: ElementCommand,
}

#[derive(Debug, Subcommand)]
pub enum ElementCommand {
    /// List elements with their types
    List(PageArgs),
}

pub fn execute(args: ElementArgs, store: &StoreOptions) -> Result<()> {
    let store = store.open()?;
    match args.command {
        ElementCommand::List(page) => {
            for element in ElementRepo::select_all(store.conn(), &page.page())? {
                match element.parent_id {
                    Some(parent) => println!(
                        "{}  {}  {}  (parent {})",
                        element.id, element.element_type.name, element.value, parent
                    ),
                    None => println!(
                        "{}  {}  {}",
                        element.id, element.element_type.name, element.value
                    ),
                }
            }
        }
    }
    store.close()
}
