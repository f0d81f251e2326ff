//! The catalog ("shelf"): a bounded, name-sorted set of categories.
//!
//! # Invariants
//!
//! - At most [`CATALOG_CAPACITY`] categories.
//! - Category names are unique and the sequence is sorted by name
//!   (case-sensitive, byte-wise).

use std::collections::BTreeMap;

use tracing::debug;

use crate::category::Category;
use crate::error::ShelfError;
use crate::model::Item;
use crate::validate::{self, ValidationError};

pub const CATALOG_CAPACITY: usize = 10;

/// Name of the catalog a fresh session starts with.
pub const UNTITLED: &str = "untitled";

/// Stored contents keyed by category name: `(backlog, completed)`.
pub type ReconstructionMap = BTreeMap<String, (Vec<Item>, Vec<Item>)>;

#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    categories: Vec<Category>,
}

impl Catalog {
    /// An empty catalog.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if `name` is not a usable catalog name.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate::catalog_name(name)?,
            categories: Vec::new(),
        })
    }

    /// The empty catalog named [`UNTITLED`].
    #[must_use]
    pub fn untitled() -> Self {
        Self {
            name: UNTITLED.to_string(),
            categories: Vec::new(),
        }
    }

    /// Rebuild a catalog from stored contents. Categories are sorted by name
    /// and only the first [`CATALOG_CAPACITY`] are kept.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if `name` is not a usable catalog name.
    pub fn from_map(name: &str, contents: ReconstructionMap) -> Result<Self, ValidationError> {
        let name = validate::catalog_name(name)?;
        let mut categories: Vec<Category> = contents
            .into_iter()
            .map(|(category, (backlog, completed))| {
                Category::from_parts(category, backlog, completed)
            })
            .collect();
        categories.sort_by(|a, b| a.name().cmp(b.name()));
        if categories.len() > CATALOG_CAPACITY {
            debug!(
                dropped = categories.len() - CATALOG_CAPACITY,
                "truncating oversized catalog"
            );
            categories.truncate(CATALOG_CAPACITY);
        }
        Ok(Self { name, categories })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the catalog. This also changes the file it saves to.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] for a bad name; the old name is kept.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate::catalog_name(name)?;
        Ok(())
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Mutable access for list operations. Renames go through
    /// [`rename_category`](Self::rename_category).
    pub fn category_mut(&mut self, index: usize) -> Option<&mut Category> {
        self.categories.get_mut(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.name().cmp(name))
            .ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        CATALOG_CAPACITY
    }

    /// Add an empty category at its sorted position and return that index.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] for a bad or duplicate name,
    /// [`ShelfError::CatalogOverflow`] when the catalog is full.
    pub fn add_category(&mut self, name: &str) -> Result<usize, ShelfError> {
        let category = Category::new(name)?;
        if self.categories.len() >= CATALOG_CAPACITY {
            return Err(ShelfError::CatalogOverflow {
                capacity: CATALOG_CAPACITY,
            });
        }
        match self
            .categories
            .binary_search_by(|c| c.name().cmp(category.name()))
        {
            Ok(_) => Err(ValidationError::DuplicateCategory(category.name().to_string()).into()),
            Err(index) => {
                debug!(catalog = %self.name, category = category.name(), index, "adding category");
                self.categories.insert(index, category);
                Ok(index)
            }
        }
    }

    /// Remove the category at `index`.
    ///
    /// # Errors
    ///
    /// [`ShelfError::CatalogUnderflow`] if the catalog is empty.
    ///
    /// # Panics
    ///
    /// If `index` is out of range on a non-empty catalog.
    pub fn remove_category(&mut self, index: usize) -> Result<Category, ShelfError> {
        if self.categories.is_empty() {
            return Err(ShelfError::CatalogUnderflow);
        }
        let removed = self.categories.remove(index);
        debug!(catalog = %self.name, category = removed.name(), "removed category");
        Ok(removed)
    }

    /// Rename the category at `index`, re-sort, and return its new index.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] for a bad name or one already used by a
    /// different category.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn rename_category(&mut self, index: usize, name: &str) -> Result<usize, ShelfError> {
        let name = validate::category_name(name)?;
        if let Some(existing) = self.index_of(&name) {
            if existing != index {
                return Err(ValidationError::DuplicateCategory(name).into());
            }
        }
        self.categories[index].rename(name.clone());
        self.resort();
        Ok(self.index_of(&name).unwrap_or(index))
    }

    /// Restore name order after a rename.
    pub fn resort(&mut self) {
        self.categories.sort_by(|a, b| a.name().cmp(b.name()));
    }
}
