//! `shelf show`: print a catalog's backlogs and recent completions.

use anyhow::{Result, anyhow};
use clap::Args;
use serde::Serialize;
use shelf_core::{BoundedList, Category, SortKey};
use std::io::{self, Write};

use super::{Context, ItemView, category_index, display_date};
use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Catalog to show. Defaults to `default_catalog` from the config.
    pub catalog: Option<String>,

    /// Only show this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Order backlogs by: default, name, author, genre, price, release, date.
    #[arg(long)]
    pub sort: Option<String>,

    /// Order recent completions by the same keys.
    #[arg(long)]
    pub completed_sort: Option<String>,
}

#[derive(Debug, Serialize)]
struct CatalogView {
    catalog: String,
    categories: Vec<CategoryView>,
}

#[derive(Debug, Serialize)]
struct CategoryView {
    name: String,
    backlog: ListView,
    completed: ListView,
}

#[derive(Debug, Serialize)]
struct ListView {
    sort: &'static str,
    capacity: usize,
    items: Vec<ItemView>,
}

impl ListView {
    fn new(list: &BoundedList) -> Self {
        Self {
            sort: list.sort_key().as_str(),
            capacity: list.capacity(),
            items: list
                .items()
                .iter()
                .enumerate()
                .map(|(i, item)| ItemView::new(i + 1, item))
                .collect(),
        }
    }
}

impl CategoryView {
    fn new(category: &Category) -> Self {
        Self {
            name: category.name().to_string(),
            backlog: ListView::new(category.backlog()),
            completed: ListView::new(category.completed()),
        }
    }
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> Result<()> {
    let name = args
        .catalog
        .as_deref()
        .or(ctx.default_catalog.as_deref())
        .ok_or_else(|| anyhow!("no catalog named and no default_catalog configured"))?;

    let backlog_key = args.sort.as_deref().map(str::parse::<SortKey>).transpose()?;
    let completed_key = args
        .completed_sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;

    let mut session = ctx.open(name)?;
    let catalog = session.catalog_mut();
    let selected: Vec<usize> = match &args.category {
        Some(category) => vec![category_index(catalog, category)?],
        None => (0..catalog.len()).collect(),
    };

    let mut categories = Vec::with_capacity(selected.len());
    for index in selected {
        let Some(category) = catalog.category_mut(index) else {
            continue;
        };
        if let Some(key) = backlog_key {
            category.backlog_mut().set_sort_key(key);
        }
        if let Some(key) = completed_key {
            category.completed_mut().set_sort_key(key);
        }
        categories.push(CategoryView::new(category));
    }

    let view = CatalogView {
        catalog: catalog.name().to_string(),
        categories,
    };
    render_mode(ctx.output, &view, write_text, write_pretty)
}

fn write_text(view: &CatalogView, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "category\tlist\tpos\tpriority\tname\tauthor\tgenre\tprice\trelease\tadded\tcompleted"
    )?;
    for category in &view.categories {
        for (list, items) in [
            ("backlog", &category.backlog.items),
            ("completed", &category.completed.items),
        ] {
            for item in items {
                writeln!(
                    w,
                    "{}\t{list}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    category.name,
                    item.position,
                    item.priority,
                    item.name,
                    item.author,
                    item.genre,
                    item.price,
                    item.release_year,
                    item.added_at,
                    item.completed_at.as_deref().unwrap_or("-"),
                )?;
            }
        }
    }
    Ok(())
}

fn write_pretty(view: &CatalogView, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Catalog: {}", view.catalog))?;
    if view.categories.is_empty() {
        writeln!(w, "(no categories)")?;
        return Ok(());
    }
    for category in &view.categories {
        writeln!(w)?;
        writeln!(w, "{}", category.name)?;
        write_pretty_list(w, "Backlog", &category.backlog)?;
        write_pretty_list(w, "Recently completed", &category.completed)?;
    }
    pretty_rule(w)
}

fn write_pretty_list(w: &mut dyn Write, title: &str, list: &ListView) -> io::Result<()> {
    writeln!(
        w,
        "  {title} ({}/{}, by {})",
        list.items.len(),
        list.capacity,
        list.sort
    )?;
    for item in &list.items {
        writeln!(
            w,
            "    {:>2}. [{}] {} by {} ({}, {}) ${}",
            item.position, item.priority, item.name, item.author, item.genre, item.release_year,
            item.price
        )?;
        match &item.completed_at {
            Some(done) => pretty_kv(w, "       done", display_date(done))?,
            None => pretty_kv(w, "       added", display_date(&item.added_at))?,
        }
        if !item.notes.is_empty() {
            for line in item.notes.lines() {
                writeln!(w, "        | {line}")?;
            }
        }
    }
    Ok(())
}
