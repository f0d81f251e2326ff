//! `shelf category`: add, remove and rename categories.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use super::{Context, category_index};
use crate::output::render;

#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Add an empty category.
    Add {
        catalog: String,
        name: String,
    },
    /// Remove a category and everything in it.
    Remove {
        catalog: String,
        name: String,
    },
    /// Rename a category.
    Rename {
        catalog: String,
        old: String,
        new: String,
    },
}

#[derive(Debug, Serialize)]
struct CategoryChange {
    catalog: String,
    action: &'static str,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<String>,
    /// Items dropped along with a removed category.
    #[serde(skip_serializing_if = "Option::is_none")]
    items_removed: Option<usize>,
}

pub fn run_category(args: &CategoryArgs, ctx: &Context) -> Result<()> {
    let change = match &args.command {
        CategoryCommand::Add { catalog, name } => {
            let mut session = ctx.open(catalog)?;
            let index = session.catalog_mut().add_category(name)?;
            session.save()?;
            CategoryChange {
                catalog: session.catalog().name().to_string(),
                action: "added",
                category: session.catalog().categories()[index].name().to_string(),
                previous: None,
                items_removed: None,
            }
        }
        CategoryCommand::Remove { catalog, name } => {
            let mut session = ctx.open(catalog)?;
            let index = category_index(session.catalog(), name)?;
            let removed = session.catalog_mut().remove_category(index)?;
            session.save()?;
            CategoryChange {
                catalog: session.catalog().name().to_string(),
                action: "removed",
                category: removed.name().to_string(),
                previous: None,
                items_removed: Some(removed.backlog().len() + removed.completed().len()),
            }
        }
        CategoryCommand::Rename { catalog, old, new } => {
            let mut session = ctx.open(catalog)?;
            let index = category_index(session.catalog(), old)?;
            let previous = session.catalog().categories()[index].name().to_string();
            let index = session.catalog_mut().rename_category(index, new)?;
            session.save()?;
            CategoryChange {
                catalog: session.catalog().name().to_string(),
                action: "renamed",
                category: session.catalog().categories()[index].name().to_string(),
                previous: Some(previous),
                items_removed: None,
            }
        }
    };

    render(ctx.output, &change, |c, w| match &c.previous {
        Some(previous) => writeln!(
            w,
            "Renamed category {previous} to {} in {}",
            c.category, c.catalog
        ),
        None => match c.items_removed {
            Some(n) => writeln!(
                w,
                "Removed category {} ({n} items) from {}",
                c.category, c.catalog
            ),
            None => writeln!(w, "Added category {} to {}", c.category, c.catalog),
        },
    })
}
