//! `shelf reopen`: move a completed item back to the backlog.

use anyhow::{Result, anyhow};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use super::{Context, ItemView, category_index, position_index};
use crate::output::render;

#[derive(Args, Debug)]
pub struct ReopenArgs {
    pub catalog: String,
    pub category: String,
    /// 1-based position in recent completions.
    pub position: usize,
}

#[derive(Debug, Serialize)]
struct Reopened {
    catalog: String,
    category: String,
    item: ItemView,
}

pub fn run_reopen(args: &ReopenArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open(&args.catalog)?;
    let index = category_index(session.catalog(), &args.category)?;
    let catalog_name = session.catalog().name().to_string();
    let category = session
        .catalog_mut()
        .category_mut(index)
        .ok_or_else(|| anyhow!("category '{}' vanished", args.category))?;

    let at = position_index(args.position, category.completed().len())?;
    // On a full backlog the core puts the item back with a fresh completion
    // time. That change is not saved.
    let position = category.mark_incomplete(at)?;

    let result = Reopened {
        catalog: catalog_name,
        category: category.name().to_string(),
        item: ItemView::new(position + 1, &category.backlog().items()[position]),
    };
    session.save()?;

    render(ctx.output, &result, |r, w| {
        writeln!(
            w,
            "Reopened {} as backlog #{} in {}/{}",
            r.item.name, r.item.position, r.catalog, r.category
        )
    })
}
