use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::codec::DecodeError;
use crate::validate::ValidationError;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ListFull,
    ListEmpty,
    CatalogFull,
    CatalogEmpty,
    UnknownSortKey,
    InvalidInput,
    MalformedFile,
    FileWriteFailed,
    ConfigParseError,
    CategoryNotFound,
    PositionOutOfRange,
    CatalogExists,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ListFull => "E2001",
            Self::ListEmpty => "E2002",
            Self::CatalogFull => "E2003",
            Self::CatalogEmpty => "E2004",
            Self::UnknownSortKey => "E2005",
            Self::InvalidInput => "E2006",
            Self::MalformedFile => "E3001",
            Self::FileWriteFailed => "E5001",
            Self::ConfigParseError => "E1001",
            Self::CategoryNotFound => "E4001",
            Self::PositionOutOfRange => "E4002",
            Self::CatalogExists => "E4003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ListFull => "List is at capacity",
            Self::ListEmpty => "List is empty",
            Self::CatalogFull => "Catalog is at capacity",
            Self::CatalogEmpty => "Catalog is empty",
            Self::UnknownSortKey => "Unknown sort key",
            Self::InvalidInput => "Invalid input",
            Self::MalformedFile => "Malformed shelf file",
            Self::FileWriteFailed => "Shelf file write failed",
            Self::ConfigParseError => "Config file parse error",
            Self::CategoryNotFound => "Category not found",
            Self::PositionOutOfRange => "Position out of range",
            Self::CatalogExists => "Catalog already exists",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ListFull => Some("Complete or remove an item before adding another."),
            Self::ListEmpty | Self::CatalogEmpty => None,
            Self::CatalogFull => Some("Remove a category before adding another."),
            Self::UnknownSortKey => {
                Some("Use one of: default, name, author, genre, price, release, date.")
            }
            Self::InvalidInput => {
                Some("Names and fields may not contain '=+/', '/*/', '?=n' or line breaks.")
            }
            Self::MalformedFile => Some("Check the catalog name, or restore the file from a backup."),
            Self::FileWriteFailed => Some("Check disk space and write permissions."),
            Self::ConfigParseError => Some("Fix syntax in the shelf config.toml and retry."),
            Self::CategoryNotFound => Some("Run `shelf show <catalog>` to list its categories."),
            Self::PositionOutOfRange => Some("Positions start at 1; run `shelf show` to see them."),
            Self::CatalogExists => Some("Pick another name or pass --force to overwrite."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a shelf file could not be turned into a catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
    #[error("file does not exist")]
    Missing,

    #[error("file could not be read: {0}")]
    Unreadable(#[source] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Every recoverable failure the core can report.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// Insert into a list that rejects items once full.
    #[error("list is full ({capacity} items)")]
    ListOverflow { capacity: usize },

    /// Removal from an empty list.
    #[error("cannot remove from an empty list")]
    ListUnderflow,

    /// A category was added to a catalog at capacity.
    #[error("catalog is full ({capacity} categories)")]
    CatalogOverflow { capacity: usize },

    /// Removal from a catalog with no categories.
    #[error("cannot remove from an empty catalog")]
    CatalogUnderflow,

    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The whole load failed; no catalog was produced.
    #[error("cannot load {}: {source}", path.display())]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShelfError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ListOverflow { .. } => ErrorCode::ListFull,
            Self::ListUnderflow => ErrorCode::ListEmpty,
            Self::CatalogOverflow { .. } => ErrorCode::CatalogFull,
            Self::CatalogUnderflow => ErrorCode::CatalogEmpty,
            Self::UnknownSortKey(_) => ErrorCode::UnknownSortKey,
            Self::Validation(_) => ErrorCode::InvalidInput,
            Self::MalformedFile { .. } => ErrorCode::MalformedFile,
            Self::Io { .. } => ErrorCode::FileWriteFailed,
        }
    }

    /// Optional remediation hint for the user.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
