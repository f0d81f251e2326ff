//! `shelf done`: move a backlog item to recent completions.

use anyhow::{Result, anyhow};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use super::{Context, ItemView, category_index, position_index};
use crate::output::render;

#[derive(Args, Debug)]
pub struct DoneArgs {
    pub catalog: String,
    pub category: String,
    /// 1-based backlog position as listed by `shelf show`.
    pub position: usize,
}

#[derive(Debug, Serialize)]
struct Completed {
    catalog: String,
    category: String,
    item: ItemView,
    /// Oldest completion pushed out to make room.
    #[serde(skip_serializing_if = "Option::is_none")]
    evicted: Option<String>,
}

pub fn run_done(args: &DoneArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open(&args.catalog)?;
    let index = category_index(session.catalog(), &args.category)?;
    let catalog_name = session.catalog().name().to_string();
    let category = session
        .catalog_mut()
        .category_mut(index)
        .ok_or_else(|| anyhow!("category '{}' vanished", args.category))?;

    let at = position_index(args.position, category.backlog().len())?;
    let placed = category.mark_complete(at)?;

    let completed = &category.completed().items()[placed.index];
    let result = Completed {
        catalog: catalog_name,
        category: category.name().to_string(),
        item: ItemView::new(placed.index + 1, completed),
        evicted: placed.evicted.map(|item| item.name().to_string()),
    };
    session.save()?;

    render(ctx.output, &result, |r, w| {
        writeln!(w, "Completed {} in {}/{}", r.item.name, r.catalog, r.category)?;
        if let Some(evicted) = &r.evicted {
            writeln!(w, "  {evicted} dropped from recent completions")?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: DoneArgs,
    }

    #[test]
    fn parses_positional_args() {
        let w = Wrapper::parse_from(["test", "media", "Books", "2"]);
        assert_eq!(w.args.catalog, "media");
        assert_eq!(w.args.category, "Books");
        assert_eq!(w.args.position, 2);
    }

    #[test]
    fn position_must_be_a_number() {
        assert!(Wrapper::try_parse_from(["test", "media", "Books", "two"]).is_err());
    }
}
