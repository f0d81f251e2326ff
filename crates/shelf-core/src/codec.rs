//! Shelf file encoder/decoder.
//!
//! # Format
//!
//! ```text
//! <N>                      category count
//! <category name>          \
//! <encoded backlog>         } repeated N times
//! <encoded completed>      /
//! ```
//!
//! An encoded list joins its items with [`ITEM_DELIMITER`]. An encoded item
//! joins its fields with [`FIELD_DELIMITER`] in this order:
//!
//! ```text
//! name /*/ author /*/ genre /*/ price /*/ release /*/ priority /*/ notes /*/ added [/*/ completed]
//! ```
//!
//! - Line breaks inside notes are written as [`NEWLINE_TOKEN`].
//! - Timestamps use `YYYY-MM-DD HH:MM:SS.ffffff`.
//! - An encoded list of [`EMPTY_LIST_MAX_LEN`] characters or fewer reads back
//!   as an empty list. No real item is that short.
//!
//! Decoding is all-or-nothing: the first bad line fails the whole catalog.

use std::fmt::Write as _;

use tracing::warn;

use crate::catalog::{Catalog, ReconstructionMap};
use crate::model::{Item, ItemDraft, Price, timestamp};

pub const ITEM_DELIMITER: &str = "=+/";
pub const FIELD_DELIMITER: &str = "/*/";
pub const NEWLINE_TOKEN: &str = "?=n";

/// Encoded lists up to this length decode as empty.
pub const EMPTY_LIST_MAX_LEN: usize = 20;

const FIELDS_OPEN: usize = 8;
const FIELDS_COMPLETED: usize = 9;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A problem with one encoded item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("expected {FIELDS_OPEN} or {FIELDS_COMPLETED} fields, found {0}")]
    FieldCount(usize),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("invalid {field} '{raw}'")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("file is empty")]
    MissingHeader,

    #[error("invalid category count '{0}'")]
    InvalidCount(String),

    #[error("expected {expected} lines, file ends after {found}")]
    Truncated { expected: usize, found: usize },

    #[error("item {item}: {source}")]
    Item {
        item: usize,
        #[source]
        source: FieldError,
    },

    #[error("invalid catalog name: {0}")]
    InvalidName(String),
}

/// Where and why decoding stopped. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct DecodeError {
    pub line: usize,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    const fn new(line: usize, kind: DecodeErrorKind) -> Self {
        Self { line, kind }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[must_use]
pub fn encode_item(item: &Item) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{name}{d}{author}{d}{genre}{d}{price}{d}{release}{d}{priority}{d}{notes}{d}{added}",
        d = FIELD_DELIMITER,
        name = item.name(),
        author = item.author(),
        genre = item.genre(),
        price = item.price(),
        release = item.release_year(),
        priority = item.priority(),
        notes = item.notes().replace('\n', NEWLINE_TOKEN),
        added = timestamp::format(&item.added_at()),
    );
    if let Some(completed) = item.completed_at() {
        out.push_str(FIELD_DELIMITER);
        out.push_str(&timestamp::format(&completed));
    }
    out
}

/// Decode one encoded item.
///
/// # Errors
///
/// [`FieldError`] for a wrong field count or a field that does not parse.
pub fn decode_item(raw: &str) -> Result<Item, FieldError> {
    let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELDS_OPEN && fields.len() != FIELDS_COMPLETED {
        return Err(FieldError::FieldCount(fields.len()));
    }

    let price = fields[3]
        .parse::<Price>()
        .map_err(|_| FieldError::InvalidPrice(fields[3].to_string()))?;
    let release_year = parse_number(fields[4], "release year")?;
    let priority = parse_number(fields[5], "priority")?;
    let added_at = parse_timestamp(fields[7])?;
    let completed_at = fields.get(8).map(|raw| parse_timestamp(raw)).transpose()?;

    let draft = ItemDraft {
        name: fields[0].to_string(),
        author: fields[1].to_string(),
        genre: fields[2].to_string(),
        price,
        release_year,
        priority,
        notes: fields[6].replace(NEWLINE_TOKEN, "\n"),
    };
    Ok(Item::restore(draft, added_at, completed_at))
}

fn parse_number<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, FieldError> {
    raw.trim().parse().map_err(|_| FieldError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })
}

fn parse_timestamp(raw: &str) -> Result<chrono::NaiveDateTime, FieldError> {
    timestamp::parse(raw).map_err(|_| FieldError::InvalidTimestamp(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[must_use]
pub fn encode_list(items: &[Item]) -> String {
    items
        .iter()
        .map(encode_item)
        .collect::<Vec<_>>()
        .join(ITEM_DELIMITER)
}

/// Decode an encoded list.
///
/// # Errors
///
/// The 0-based index of the first item that fails, with its [`FieldError`].
pub fn decode_list(raw: &str) -> Result<Vec<Item>, (usize, FieldError)> {
    if raw.len() <= EMPTY_LIST_MAX_LEN {
        return Ok(Vec::new());
    }
    raw.split(ITEM_DELIMITER)
        .enumerate()
        .map(|(i, item)| decode_item(item).map_err(|e| (i, e)))
        .collect()
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Encode a catalog in its current category order. Every line, including
/// the last, ends with `\n`.
#[must_use]
pub fn encode_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.len());
    for category in catalog.categories() {
        let _ = writeln!(out, "{}", category.name());
        let _ = writeln!(out, "{}", encode_list(category.backlog().items()));
        let _ = writeln!(out, "{}", encode_list(category.completed().items()));
    }
    out
}

/// Decode a whole file into a catalog called `name`.
///
/// If the same category name appears twice, the later one wins. Lines past
/// the declared categories are ignored.
///
/// # Errors
///
/// [`DecodeError`] with the 1-based line of the first problem.
pub fn decode_catalog(name: &str, text: &str) -> Result<Catalog, DecodeError> {
    let lines: Vec<&str> = text.lines().collect();
    let header = lines
        .first()
        .ok_or_else(|| DecodeError::new(1, DecodeErrorKind::MissingHeader))?;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|_| DecodeError::new(1, DecodeErrorKind::InvalidCount((*header).to_string())))?;

    let expected = count
        .checked_mul(3)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| DecodeError::new(1, DecodeErrorKind::InvalidCount((*header).to_string())))?;
    if lines.len() < expected {
        return Err(DecodeError::new(
            lines.len() + 1,
            DecodeErrorKind::Truncated {
                expected,
                found: lines.len(),
            },
        ));
    }
    if lines[expected..].iter().any(|l| !l.trim().is_empty()) {
        warn!(
            catalog = name,
            extra = lines.len() - expected,
            "ignoring lines past declared categories"
        );
    }

    let mut contents = ReconstructionMap::new();
    for (i, group) in lines[1..expected].chunks_exact(3).enumerate() {
        let first_line = 2 + i * 3;
        let backlog = decode_list_at(group[1], first_line + 1)?;
        let completed = decode_list_at(group[2], first_line + 2)?;
        contents.insert(group[0].to_string(), (backlog, completed));
    }

    Catalog::from_map(name, contents)
        .map_err(|e| DecodeError::new(1, DecodeErrorKind::InvalidName(e.to_string())))
}

fn decode_list_at(raw: &str, line: usize) -> Result<Vec<Item>, DecodeError> {
    decode_list(raw).map_err(|(item, source)| {
        DecodeError::new(line, DecodeErrorKind::Item { item: item + 1, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 11, 2)
            .unwrap()
            .and_hms_micro_opt(hour, 30, 15, 250_000)
            .unwrap()
    }

    fn sample(name: &str, notes: &str) -> Item {
        Item::new_at(
            ItemDraft {
                name: name.to_string(),
                author: "Le Guin".to_string(),
                genre: "Fantasy".to_string(),
                price: Price::from_cents(1599),
                release_year: 1968,
                priority: 4,
                notes: notes.to_string(),
            },
            at(9),
        )
        .unwrap()
    }

    #[test]
    fn encode_item_field_order() {
        let item = sample("Earthsea", "");
        assert_eq!(
            encode_item(&item),
            "Earthsea/*/Le Guin/*/Fantasy/*/15.99/*/1968/*/4/*//*/2019-11-02 09:30:15.250000"
        );
    }

    #[test]
    fn encode_item_appends_completion() {
        let mut item = sample("Earthsea", "");
        item.mark_completed(at(21));
        assert!(encode_item(&item).ends_with("/*/2019-11-02 21:30:15.250000"));
    }

    #[test]
    fn notes_newlines_are_escaped() {
        let item = sample("Earthsea", "first\nsecond");
        let encoded = encode_item(&item);
        assert!(encoded.contains("first?=nsecond"));
        assert!(!encoded.contains('\n'));
        assert_eq!(decode_item(&encoded).unwrap().notes(), "first\nsecond");
    }

    #[test]
    fn fields_that_would_fuse_with_a_delimiter_never_reach_the_encoder() {
        let draft = |name: &str, author: &str| ItemDraft {
            name: name.to_string(),
            author: author.to_string(),
            genre: "Rock".to_string(),
            price: Price::from_cents(0),
            release_year: 1990,
            priority: 3,
            notes: String::new(),
        };
        assert!(Item::new_at(draft("Rock=+", "Band"), at(1)).is_err());
        assert!(Item::new_at(draft("x/*", "y"), at(1)).is_err());
        assert!(Item::new_at(draft("x", "*/y"), at(1)).is_err());
    }

    #[test]
    fn delimiter_characters_inside_fields_round_trip() {
        let items = vec![
            sample("a=b+c", "1/2 * 3"),
            sample("*starred*", "+plus"),
            sample("x/*y", "ends in ?"),
        ];
        let decoded = decode_list(&encode_list(&items)).unwrap();
        assert_eq!(decoded.len(), 3);
        for (back, item) in decoded.iter().zip(&items) {
            assert_eq!(back.name(), item.name());
            assert_eq!(back.author(), item.author());
            assert_eq!(back.notes(), item.notes());
        }
    }

    #[test]
    fn decode_item_reads_all_fields() {
        let raw = "Dune/*/Herbert/*/SF/*/12.5/*/1965/*/2/*/spice?=nworms/*/2019-01-01 00:00:00.000001/*/2019-02-01 12:00:00.5";
        let item = decode_item(raw).unwrap();
        assert_eq!(item.name(), "Dune");
        assert_eq!(item.price(), Price::from_cents(1250));
        assert_eq!(item.release_year(), 1965);
        assert_eq!(item.priority(), 2);
        assert_eq!(item.notes(), "spice\nworms");
        assert!(item.completed_at().is_some());
    }

    #[test]
    fn decode_item_field_count_is_strict() {
        assert_eq!(
            decode_item("a/*/b/*/c").unwrap_err(),
            FieldError::FieldCount(3)
        );
        let ten = vec!["x"; 10].join(FIELD_DELIMITER);
        assert_eq!(decode_item(&ten).unwrap_err(), FieldError::FieldCount(10));
    }

    #[test]
    fn decode_item_rejects_bad_numbers() {
        let raw = "a/*/b/*/c/*/free/*/1999/*/1/*//*/2019-01-01 00:00:00.000000";
        assert_eq!(
            decode_item(raw).unwrap_err(),
            FieldError::InvalidPrice("free".to_string())
        );
        let raw = "a/*/b/*/c/*/1.00/*/nineties/*/1/*//*/2019-01-01 00:00:00.000000";
        assert!(matches!(
            decode_item(raw).unwrap_err(),
            FieldError::InvalidNumber { field: "release year", .. }
        ));
        let raw = "a/*/b/*/c/*/1.00/*/1999/*/1/*//*/someday";
        assert!(matches!(
            decode_item(raw).unwrap_err(),
            FieldError::InvalidTimestamp(_)
        ));
    }

    #[test]
    fn empty_list_encodes_to_empty_string() {
        assert_eq!(encode_list(&[]), "");
        assert!(decode_list("").unwrap().is_empty());
    }

    #[test]
    fn short_list_strings_decode_as_empty() {
        assert!(decode_list("garbage that is short").is_err());
        assert!(decode_list("twenty chars exactly").unwrap().is_empty());
        assert!(decode_list("x").unwrap().is_empty());
    }

    #[test]
    fn list_uses_item_delimiter() {
        let items = vec![sample("A", ""), sample("B", "")];
        let encoded = encode_list(&items);
        assert_eq!(encoded.matches(ITEM_DELIMITER).count(), 1);
        let decoded = decode_list(&encoded).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn decode_catalog_reports_truncation() {
        let err = decode_catalog("c", "2\nBooks\n\n\n").unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::Truncated { expected: 7, found: 4 }
        ));
    }

    #[test]
    fn decode_catalog_rejects_bad_header() {
        let err = decode_catalog("c", "two\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(err.kind, DecodeErrorKind::InvalidCount(_)));
        let err = decode_catalog("c", "").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::MissingHeader);
    }

    #[test]
    fn decode_catalog_reports_failing_line() {
        let text = "1\nBooks\nthis line is long enough to be an item\n\n";
        let err = decode_catalog("c", text).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, DecodeErrorKind::Item { item: 1, .. }));
    }

    #[test]
    fn decode_catalog_accepts_zero_categories() {
        let catalog = decode_catalog("empty", "0\n").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.name(), "empty");
    }

    #[test]
    fn decode_catalog_later_duplicate_wins() {
        let item = encode_item(&sample("Earthsea", ""));
        let text = format!("2\nBooks\n\n\nBooks\n{item}\n\n");
        let catalog = decode_catalog("c", &text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.categories()[0].backlog().len(), 1);
    }

    #[test]
    fn encode_catalog_layout() {
        let mut catalog = Catalog::new("mine").unwrap();
        catalog.add_category("Books").unwrap();
        catalog.add_category("Anime").unwrap();
        catalog
            .category_mut(1)
            .unwrap()
            .add_item(sample("Earthsea", ""))
            .unwrap();
        let text = encode_catalog(&catalog);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "Anime");
        assert_eq!(lines[2], "");
        assert_eq!(lines[4], "Books");
        assert!(lines[5].starts_with("Earthsea/*/"));
        assert!(text.ends_with('\n'));
    }
}
