//! Subcommand handlers. Each one loads a catalog, applies at most one
//! mutation, and saves.

pub mod catalogs;
pub mod category;
pub mod completions;
pub mod done;
pub mod item;
pub mod new;
pub mod reopen;
pub mod show;

use anyhow::Result;
use serde::Serialize;
use shelf_core::model::Item;
use shelf_core::model::timestamp;
use shelf_core::{Catalog, CatalogStore, ErrorCode, Session};

use crate::output::{CliError, OutputMode};

/// What every handler needs: where catalogs live and how to print.
#[derive(Debug)]
pub struct Context {
    pub store: CatalogStore,
    pub output: OutputMode,
    /// Catalog `show` falls back to when none is named.
    pub default_catalog: Option<String>,
}

impl Context {
    /// A session with `name` loaded.
    pub fn open(&self, name: &str) -> Result<Session> {
        let mut session = Session::new(self.store.clone());
        session.load(name)?;
        Ok(session)
    }
}

/// Index of the category called `name`.
pub fn category_index(catalog: &Catalog, name: &str) -> Result<usize> {
    catalog.index_of(name.trim()).ok_or_else(|| {
        CliError::coded(
            format!("catalog '{}' has no category '{}'", catalog.name(), name.trim()),
            ErrorCode::CategoryNotFound,
        )
        .into()
    })
}

/// Turn a 1-based position into an index into a list of `len` items.
pub fn position_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        let message = if len == 0 {
            format!("position {position} is out of range (the list is empty)")
        } else {
            format!("position {position} is out of range (1-{len})")
        };
        return Err(CliError::coded(message, ErrorCode::PositionOutOfRange).into());
    }
    Ok(position - 1)
}

/// One item as shown to users and scripts.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub position: usize,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub price: String,
    pub release_year: i32,
    pub priority: u8,
    pub notes: String,
    pub added_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl ItemView {
    #[must_use]
    pub fn new(position: usize, item: &Item) -> Self {
        Self {
            position,
            name: item.name().to_string(),
            author: item.author().to_string(),
            genre: item.genre().to_string(),
            price: item.price().to_string(),
            release_year: item.release_year(),
            priority: item.priority(),
            notes: item.notes().to_string(),
            added_at: timestamp::format(&item.added_at()),
            completed_at: item.completed_at().map(|at| timestamp::format(&at)),
        }
    }
}

/// Short date for human output.
pub fn display_date(raw: &str) -> String {
    timestamp::parse(raw).map_or_else(
        |_| raw.to_string(),
        |at| at.format("%m/%d/%Y").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position_index(1, 3).unwrap(), 0);
        assert_eq!(position_index(3, 3).unwrap(), 2);
        assert!(position_index(0, 3).is_err());
        assert!(position_index(4, 3).is_err());
        assert!(position_index(1, 0).is_err());
    }

    #[test]
    fn out_of_range_is_coded() {
        let err = position_index(9, 2).unwrap_err();
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E4002"));
        assert!(cli.message.contains("1-2"));
    }

    #[test]
    fn category_lookup_trims_and_is_exact() {
        let mut catalog = Catalog::new("mine").unwrap();
        catalog.add_category("Books").unwrap();
        assert_eq!(category_index(&catalog, " Books ").unwrap(), 0);
        assert!(category_index(&catalog, "books").is_err());
    }

    #[test]
    fn display_date_uses_month_first() {
        assert_eq!(display_date("2021-07-04 10:00:00.000000"), "07/04/2021");
        assert_eq!(display_date("garbage"), "garbage");
    }
}
