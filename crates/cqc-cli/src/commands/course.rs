//! Course commands
//!
//! Usage:
//!   cqc course list [--limit N --offset N --order-by COL --order ASC|DESC]
//!   cqc course show <ID>

use clap::{Args, Subcommand};
use cqc_core::{Course, CqcError, DictionaryEntry, LeafDirection, Result};
use cqc_store::{CourseRepo, HierarchyRepo};
use uuid::Uuid;

use super::{PageArgs, StoreOptions};

#[derive(Debug, Args)]
pub struct CourseArgs {
    #[command(subcommand)]
    pub command: CourseCommand,
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// List courses with their input and output leaves
    List(PageArgs),
    /// Show one course
    Show {
        id: Uuid,
    },
}

pub fn execute(args: CourseArgs, store: &StoreOptions) -> Result<()> {
    let store = store.open()?;
    match args.command {
        CourseCommand::List(page) => {
            let type_order = HierarchyRepo::type_order(store.conn())?;
            for mut course in CourseRepo::select_all(store.conn(), &page.page())? {
                order_groups(&mut course, &type_order);
                println!("{}  {}", course.id, course);
            }
        }
        CourseCommand::Show { id } => {
            let mut course = CourseRepo::select_by_id(store.conn(), id)?
                .ok_or(CqcError::CourseNotFound { course_id: id })?;
            order_groups(&mut course, &HierarchyRepo::type_order(store.conn())?);
            println!("id: {}", course.id);
            println!("{}", course);
        }
    }
    store.close()
}

// root type first, so Competence groups print before their leaves
fn order_groups(course: &mut Course, type_order: &[DictionaryEntry]) {
    for direction in LeafDirection::ALL {
        course.leaves_mut(direction).order_by_types(type_order);
    }
}
