//! `shelf item`: add, edit and remove items.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use serde::Serialize;
use shelf_core::model::{Item, ItemDraft, ItemEdit, Price};
use shelf_core::validate;
use shelf_core::ShelfError;
use std::io::Write;

use super::{Context, ItemView, category_index, position_index};
use crate::output::render;

#[derive(Args, Debug)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommand,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add an item to a category's backlog.
    Add {
        catalog: String,
        category: String,
        #[command(flatten)]
        fields: NewItemFields,
    },
    /// Change fields of an existing item.
    Edit {
        catalog: String,
        category: String,
        /// 1-based position as listed by `shelf show`.
        position: usize,
        /// Edit an item in recent completions instead of the backlog.
        #[arg(long)]
        completed: bool,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Remove an item.
    Remove {
        catalog: String,
        category: String,
        position: usize,
        #[arg(long)]
        completed: bool,
    },
}

#[derive(Args, Debug)]
pub struct NewItemFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub genre: String,
    /// Decimal price, rounded to cents.
    #[arg(long, allow_hyphen_values = true)]
    pub price: Price,
    #[arg(long)]
    pub release: i32,
    /// 1 (lowest) to 5 (highest).
    #[arg(long, allow_hyphen_values = true)]
    pub priority: i64,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug, Default)]
pub struct EditFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<Price>,
    #[arg(long)]
    pub release: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub priority: Option<i64>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditFields {
    fn into_edits(self) -> Result<Vec<ItemEdit>, ShelfError> {
        let mut edits = Vec::new();
        if let Some(v) = self.name {
            edits.push(ItemEdit::Name(v));
        }
        if let Some(v) = self.author {
            edits.push(ItemEdit::Author(v));
        }
        if let Some(v) = self.genre {
            edits.push(ItemEdit::Genre(v));
        }
        if let Some(v) = self.price {
            edits.push(ItemEdit::Price(v));
        }
        if let Some(v) = self.release {
            edits.push(ItemEdit::ReleaseYear(v));
        }
        if let Some(v) = self.priority {
            edits.push(ItemEdit::Priority(validate::priority(v)?));
        }
        if let Some(v) = self.notes {
            edits.push(ItemEdit::Notes(v));
        }
        Ok(edits)
    }
}

#[derive(Debug, Serialize)]
struct ItemChange {
    catalog: String,
    category: String,
    action: &'static str,
    list: &'static str,
    item: ItemView,
}

const fn list_name(completed: bool) -> &'static str {
    if completed { "completed" } else { "backlog" }
}

pub fn run_item(args: ItemArgs, ctx: &Context) -> Result<()> {
    let change = match args.command {
        ItemCommand::Add {
            catalog,
            category,
            fields,
        } => {
            let mut session = ctx.open(&catalog)?;
            let index = category_index(session.catalog(), &category)?;
            let item = Item::new(ItemDraft {
                name: fields.name,
                author: fields.author,
                genre: fields.genre,
                price: fields.price,
                release_year: fields.release,
                priority: validate::priority(fields.priority).map_err(ShelfError::from)?,
                notes: fields.notes,
            })
            .map_err(ShelfError::from)?;
            let Some(target) = session.catalog_mut().category_mut(index) else {
                bail!("category vanished while editing");
            };
            let at = target.add_item(item)?;
            let view = ItemView::new(at + 1, &target.backlog().items()[at]);
            let change = ItemChange {
                catalog: session.catalog().name().to_string(),
                category: target_name(&session, index),
                action: "added",
                list: "backlog",
                item: view,
            };
            session.save()?;
            change
        }
        ItemCommand::Edit {
            catalog,
            category,
            position,
            completed,
            fields,
        } => {
            let edits = fields.into_edits()?;
            if edits.is_empty() {
                bail!("nothing to edit: pass at least one of --name, --author, --genre, --price, --release, --priority, --notes");
            }
            let mut session = ctx.open(&catalog)?;
            let index = category_index(session.catalog(), &category)?;
            let Some(target) = session.catalog_mut().category_mut(index) else {
                bail!("category vanished while editing");
            };
            let list = if completed {
                target.completed_mut()
            } else {
                target.backlog_mut()
            };
            let at = position_index(position, list.len())?;
            let new_index = list.edit_at(at, edits)?;
            let view = ItemView::new(new_index + 1, &list.items()[new_index]);
            let change = ItemChange {
                catalog: session.catalog().name().to_string(),
                category: target_name(&session, index),
                action: "edited",
                list: list_name(completed),
                item: view,
            };
            session.save()?;
            change
        }
        ItemCommand::Remove {
            catalog,
            category,
            position,
            completed,
        } => {
            let mut session = ctx.open(&catalog)?;
            let index = category_index(session.catalog(), &category)?;
            let Some(target) = session.catalog_mut().category_mut(index) else {
                bail!("category vanished while editing");
            };
            let len = if completed {
                target.completed().len()
            } else {
                target.backlog().len()
            };
            let at = position_index(position, len)?;
            let removed = if completed {
                target.remove_completed_item(at)?
            } else {
                target.remove_backlog_item(at)?
            };
            let change = ItemChange {
                catalog: session.catalog().name().to_string(),
                category: target_name(&session, index),
                action: "removed",
                list: list_name(completed),
                item: ItemView::new(position, &removed),
            };
            session.save()?;
            change
        }
    };

    render(ctx.output, &change, |c, w| {
        writeln!(
            w,
            "{} {} ({} #{}) in {}/{}",
            capitalize(c.action),
            c.item.name,
            c.list,
            c.item.position,
            c.catalog,
            c.category
        )
    })
}

fn target_name(session: &shelf_core::Session, index: usize) -> String {
    session
        .catalog()
        .category(index)
        .map(|c| c.name().to_string())
        .unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
