//! Seed import command
//!
//! Usage: cqc seed import <PATH>

use std::path::PathBuf;

use clap::{Args, Subcommand};
use cqc_core::Result;
use cqc_store::errors::io_error;
use cqc_store::seed::import_seed_file;

use super::StoreOptions;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file, or every .yaml/.yml file in a directory
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

pub fn execute(args: SeedArgs, store: &StoreOptions) -> Result<()> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(import_args, store),
    }
}

fn execute_import(args: ImportArgs, store: &StoreOptions) -> Result<()> {
    let mut store = store.open()?;

    let seed_files = if args.path.is_dir() {
        // sorted for a deterministic import order
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)
            .map_err(|e| io_error("seed_read_dir", e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        println!("Importing {}...", seed_file.display());
        let report = import_seed_file(store.conn_mut(), &seed_file)?;
        println!("Imported {}", report);
    }

    store.close()
}
