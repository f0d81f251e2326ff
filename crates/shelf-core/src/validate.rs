//! Input validation for names and item fields.
//!
//! The shelf file format reserves a handful of tokens as delimiters. Any
//! user-supplied text that would end up in a file is checked here before a
//! mutation happens, so a failed check never leaves a half-edited catalog.

use std::fmt;

/// Delimiter and escape tokens that may not appear in names or item fields.
pub const RESERVED_TOKENS: [&str; 4] = ["=+/", "/*/", "\n", "?=n"];

/// Notes are escaped on write, so they may contain line breaks.
pub const NOTES_RESERVED_TOKENS: [&str; 3] = ["=+/", "/*/", "?=n"];

/// Leading pieces of the field and item delimiters. An item field ending in
/// one of these fuses with the delimiter written after it.
pub const DELIMITER_PREFIXES: [&str; 4] = ["/", "/*", "=", "=+"];

/// Trailing pieces of the delimiters, which a field may not start with.
pub const DELIMITER_SUFFIXES: [&str; 3] = ["/", "*/", "+/"];

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Which piece of user input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CatalogName,
    CategoryName,
    Name,
    Author,
    Genre,
    Notes,
}

impl Field {
    const fn as_str(self) -> &'static str {
        match self {
            Self::CatalogName => "catalog name",
            Self::CategoryName => "category name",
            Self::Name => "name",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} may not contain '{}'", .token.escape_debug())]
    ReservedToken { field: Field, token: &'static str },

    #[error("{field} may not start or end with '{edge}'")]
    DelimiterEdge { field: Field, edge: &'static str },

    #[error("{0} may not be empty")]
    Empty(Field),

    #[error("{0} may not contain path separators")]
    PathSeparator(Field),

    #[error("{0} may not start with '.'")]
    LeadingDot(Field),

    #[error("priority must be between 1 and 5, got {0}")]
    PriorityOutOfRange(i64),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("a category named '{0}' already exists")]
    DuplicateCategory(String),
}

/// Check a single-line item field and return it trimmed.
///
/// The reserved-token check runs on the raw input, so a trailing line break
/// is rejected rather than silently trimmed away. The delimiter-edge check
/// runs on the trimmed value, which is what gets written.
///
/// # Errors
///
/// [`ValidationError::ReservedToken`] or [`ValidationError::DelimiterEdge`].
pub fn text(field: Field, raw: &str) -> Result<String, ValidationError> {
    let value = single_line(field, raw)?;
    reject_delimiter_edges(field, &value)?;
    Ok(value)
}

/// Check free-form notes and return them trimmed. Line breaks are allowed.
///
/// # Errors
///
/// [`ValidationError::ReservedToken`] or [`ValidationError::DelimiterEdge`].
pub fn notes(raw: &str) -> Result<String, ValidationError> {
    reject_tokens(Field::Notes, raw, &NOTES_RESERVED_TOKENS)?;
    let value = raw.trim().to_string();
    reject_delimiter_edges(Field::Notes, &value)?;
    Ok(value)
}

/// Check a category name. It sits on a line of its own, so only the
/// reserved tokens matter.
///
/// # Errors
///
/// [`ValidationError::ReservedToken`] if the name contains one.
pub fn category_name(raw: &str) -> Result<String, ValidationError> {
    single_line(Field::CategoryName, raw)
}

/// Check a catalog name. It doubles as a file stem, so it must be non-empty,
/// stay inside the store directory and not start with `.`, which marks
/// hidden and temporary files there.
///
/// # Errors
///
/// [`ValidationError::Empty`], [`ValidationError::ReservedToken`],
/// [`ValidationError::PathSeparator`] or [`ValidationError::LeadingDot`].
pub fn catalog_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty(Field::CatalogName));
    }
    reject_tokens(Field::CatalogName, name, &RESERVED_TOKENS)?;
    if name.contains(['/', '\\']) {
        return Err(ValidationError::PathSeparator(Field::CatalogName));
    }
    if name.starts_with('.') {
        return Err(ValidationError::LeadingDot(Field::CatalogName));
    }
    Ok(name.to_string())
}

/// Check that a priority lies in `1..=5`.
///
/// # Errors
///
/// [`ValidationError::PriorityOutOfRange`] otherwise.
pub fn priority(raw: i64) -> Result<u8, ValidationError> {
    u8::try_from(raw)
        .ok()
        .filter(|p| (MIN_PRIORITY..=MAX_PRIORITY).contains(p))
        .ok_or(ValidationError::PriorityOutOfRange(raw))
}

fn single_line(field: Field, raw: &str) -> Result<String, ValidationError> {
    reject_tokens(field, raw, &RESERVED_TOKENS)?;
    Ok(raw.trim().to_string())
}

fn reject_delimiter_edges(field: Field, value: &str) -> Result<(), ValidationError> {
    let edge = DELIMITER_PREFIXES
        .iter()
        .copied()
        .find(|prefix| value.ends_with(*prefix))
        .or_else(|| {
            DELIMITER_SUFFIXES
                .iter()
                .copied()
                .find(|suffix| value.starts_with(*suffix))
        });
    match edge {
        Some(edge) => Err(ValidationError::DelimiterEdge { field, edge }),
        None => Ok(()),
    }
}

fn reject_tokens(field: Field, raw: &str, tokens: &[&'static str]) -> Result<(), ValidationError> {
    match tokens.iter().copied().find(|token| raw.contains(*token)) {
        Some(token) => Err(ValidationError::ReservedToken { field, token }),
        None => Ok(()),
    }
}
