//! The editor: one live catalog plus the store it saves to.

use std::path::PathBuf;

use tracing::info;

use crate::catalog::Catalog;
use crate::error::ShelfError;
use crate::store::CatalogStore;

#[derive(Debug)]
pub struct Session {
    store: CatalogStore,
    catalog: Catalog,
}

impl Session {
    /// A session over `store`, starting with an empty `untitled` catalog.
    #[must_use]
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            catalog: Catalog::untitled(),
        }
    }

    /// Replace the current catalog with an empty one called `name`.
    /// Unsaved changes are discarded.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] for a bad name.
    pub fn make_new(&mut self, name: &str) -> Result<(), ShelfError> {
        self.catalog = Catalog::new(name)?;
        info!(catalog = name, "started new catalog");
        Ok(())
    }

    /// Save under the catalog's current name.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Io`] if the write fails.
    pub fn save(&self) -> Result<PathBuf, ShelfError> {
        self.store.save(&self.catalog)
    }

    /// Rename the catalog to `name`, then save.
    ///
    /// The rename sticks even if the write fails.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] for a bad name, or [`ShelfError::Io`] if
    /// the write fails.
    pub fn save_as(&mut self, name: &str) -> Result<PathBuf, ShelfError> {
        self.catalog.set_name(name)?;
        self.save()
    }

    /// Load `name`, replacing the current catalog.
    ///
    /// # Errors
    ///
    /// [`ShelfError::MalformedFile`]. The current catalog is left as it was.
    pub fn load(&mut self, name: &str) -> Result<(), ShelfError> {
        let catalog = self.store.load(name)?;
        self.catalog = catalog;
        Ok(())
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }
}
