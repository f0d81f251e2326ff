//! One directory, one `<name>.shelf` file per catalog.
//!
//! Saves go through a temp sibling and a rename so a crash mid-write never
//! leaves a half-written catalog behind. Loads are all-or-nothing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::codec;
use crate::error::{LoadFailure, ShelfError};

pub const EXTENSION: &str = "shelf";

#[derive(Debug, Clone)]
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    /// A store rooted at `dir`. Nothing is created until the first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    fn temp_path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.{EXTENSION}.tmp"))
    }

    /// Write `catalog` to `<dir>/<name>.shelf`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Io`] if the directory cannot be created or the file
    /// cannot be written or renamed into place.
    pub fn save(&self, catalog: &Catalog) -> Result<PathBuf, ShelfError> {
        fs::create_dir_all(&self.dir).map_err(|source| ShelfError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(catalog.name());
        let tmp = self.temp_path_for(catalog.name());
        let encoded = codec::encode_catalog(catalog);

        fs::write(&tmp, encoded.as_bytes()).map_err(|source| ShelfError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(ShelfError::Io { path, source });
        }

        info!(
            catalog = catalog.name(),
            categories = catalog.len(),
            path = %path.display(),
            "saved catalog"
        );
        Ok(path)
    }

    /// Read and decode the catalog called `name`.
    ///
    /// # Errors
    ///
    /// [`ShelfError::MalformedFile`] when the file is missing, unreadable, or
    /// fails to decode.
    pub fn load(&self, name: &str) -> Result<Catalog, ShelfError> {
        let path = self.path_for(name);
        let malformed = |source| ShelfError::MalformedFile {
            path: path.clone(),
            source,
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(malformed(LoadFailure::Missing));
            }
            Err(e) => return Err(malformed(LoadFailure::Unreadable(e))),
        };

        let catalog =
            codec::decode_catalog(name, &text).map_err(|e| malformed(LoadFailure::Decode(e)))?;
        info!(
            catalog = name,
            categories = catalog.len(),
            path = %path.display(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Names of every saved catalog, sorted. A missing directory is empty.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Io`] if the directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<String>, ShelfError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ShelfError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .filter(|stem| !stem.starts_with('.'))
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        debug!(dir = %self.dir.display(), count = names.len(), "listed catalogs");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemDraft, Price};

    fn sample_catalog(name: &str) -> Catalog {
        let mut catalog = Catalog::new(name).unwrap();
        catalog.add_category("Books").unwrap();
        let item = Item::new(ItemDraft {
            name: "Piranesi".to_string(),
            author: "Clarke".to_string(),
            genre: "Fantasy".to_string(),
            price: Price::from_cents(1800),
            release_year: 2020,
            priority: 5,
            notes: "house\nof statues".to_string(),
        })
        .unwrap();
        catalog.category_mut(0).unwrap().add_item(item).unwrap();
        catalog
    }

    #[test]
    fn save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("SAV"));
        let path = store.save(&sample_catalog("mine")).unwrap();
        assert_eq!(path, dir.path().join("SAV").join("mine.shelf"));
        assert!(path.is_file());
        assert!(store.exists("mine"));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        store.save(&sample_catalog("mine")).unwrap();
        store.save(&sample_catalog("mine")).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn load_returns_saved_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let saved = sample_catalog("mine");
        store.save(&saved).unwrap();

        let loaded = store.load("mine").unwrap();
        assert_eq!(loaded.name(), "mine");
        let item = &loaded.categories()[0].backlog().items()[0];
        assert_eq!(item, &saved.categories()[0].backlog().items()[0]);
        assert_eq!(item.notes(), "house\nof statues");
        assert_eq!(item.priority(), 5);
    }

    #[test]
    fn load_missing_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let err = store.load("nope").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::MalformedFile {
                source: LoadFailure::Missing,
                ..
            }
        ));
    }

    #[test]
    fn load_short_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("short.shelf"), "3\nBooks\n").unwrap();
        let store = CatalogStore::new(dir.path());
        let err = store.load("short").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::MalformedFile {
                source: LoadFailure::Decode(_),
                ..
            }
        ));
    }

    #[test]
    fn list_is_sorted_and_filters_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        store.save(&sample_catalog("zeta")).unwrap();
        store.save(&sample_catalog("alpha")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join(".half.shelf.tmp"), "x").unwrap();
        assert_eq!(store.list().unwrap(), ["alpha", "zeta"]);
    }

    #[test]
    fn list_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }
}
