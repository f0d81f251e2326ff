//! shelf-core: bounded, sorted media backlogs and the `.shelf` file format.
//!
//! A [`Catalog`] holds up to ten named [`Category`] values. Each category has
//! a backlog of up to fifty items ordered by priority, and a short list of
//! the five most recent completions. Catalogs persist one per file through
//! a [`CatalogStore`]; a [`Session`] owns the catalog being edited.
//!
//! # Conventions
//!
//! - **Errors**: [`ShelfError`] for everything the model and store report,
//!   each with a stable [`ErrorCode`]. `anyhow` only at the config boundary.
//! - **Logging**: `tracing` macros. `debug!` for mutations, `info!` for
//!   saves and loads, `warn!` for anything recovered from.

pub mod catalog;
pub mod category;
pub mod codec;
pub mod config;
pub mod error;
pub mod list;
pub mod model;
pub mod session;
pub mod store;
pub mod validate;

pub use catalog::{CATALOG_CAPACITY, Catalog};
pub use category::Category;
pub use error::{ErrorCode, LoadFailure, ShelfError};
pub use list::{BACKLOG_CAPACITY, BoundedList, COMPLETED_CAPACITY, Placement, SortKey};
pub use model::{Item, ItemDraft, ItemEdit, Price};
pub use session::Session;
pub use store::CatalogStore;
pub use validate::ValidationError;
