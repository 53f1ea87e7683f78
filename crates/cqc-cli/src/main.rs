//! CQC CLI
//!
//! Command-line access to a CQC competency store

use clap::{Parser, Subcommand};
use cqc_core::logging_facility::{init, Profile};
use cqc_core_types::{RequestContext, TraceId};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cqc")]
#[command(about = "CQC - Qualification competency hierarchy store", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreOptions,

    /// Emit structured logs to stderr (development, production)
    #[arg(long, global = true)]
    log: Option<Profile>,

    /// Trace id shared with other runs; echoed in any error
    #[arg(long, global = true)]
    trace_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Element type dictionary
    Dict(commands::dict::DictArgs),
    /// Type hierarchy edges
    Hierarchy(commands::hierarchy::HierarchyArgs),
    /// Competency tree elements
    Element(commands::element::ElementArgs),
    /// Courses and their leaves
    Course(commands::course::CourseArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Some(profile) = cli.log {
        init(profile);
    }
    let mut ctx = RequestContext::new();
    if let Some(trace_id) = cli.trace_id {
        ctx = ctx.with_trace_id(TraceId::from_string(trace_id));
    }

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&cli.store),
        Commands::Seed(args) => commands::seed::execute(args, &cli.store),
        Commands::Dict(args) => commands::dict::execute(args, &cli.store),
        Commands::Hierarchy(args) => commands::hierarchy::execute(args, &cli.store),
        Commands::Element(args) => commands::element::execute(args, &cli.store),
        Commands::Course(args) => commands::course::execute(args, &cli.store),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e.with_context(&ctx));
        std::process::exit(1);
    }
}
