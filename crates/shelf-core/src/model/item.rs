use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::model::timestamp;
use crate::validate::{self, Field, ValidationError};

/// Notes longer than this many characters are cut off.
pub const NOTES_LIMIT: usize = 500;

/// A price in whole cents. Decimal input is rounded to two places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Round a decimal amount to the nearest cent.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidPrice`] for a non-finite or absurdly large
    /// amount.
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents.abs() > 9.0e15 {
            return Err(ValidationError::InvalidPrice(amount.to_string()));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidPrice(s.to_string()))?;
        Self::from_decimal(amount).map_err(|_| ValidationError::InvalidPrice(s.to_string()))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// User-supplied fields for a new item, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub price: Price,
    pub release_year: i32,
    pub priority: u8,
    pub notes: String,
}

impl ItemDraft {
    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate::text(Field::Name, &self.name)?,
            author: validate::text(Field::Author, &self.author)?,
            genre: validate::text(Field::Genre, &self.genre)?,
            priority: validate::priority(i64::from(self.priority))?,
            notes: validate::notes(&self.notes)?,
            ..self
        })
    }
}

/// One piece of media on a shelf.
///
/// Equality only looks at name, author, genre, price and release year:
/// two entries for the same work are equal even when their notes, priority
/// or timestamps differ.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    name: String,
    author: String,
    genre: String,
    price: Price,
    release_year: i32,
    priority: u8,
    notes: String,
    added_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
}

impl Item {
    /// Validate a draft and stamp it as added now.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] found in the draft's fields.
    pub fn new(draft: ItemDraft) -> Result<Self, ValidationError> {
        Self::new_at(draft, timestamp::now())
    }

    /// Validate a draft with an explicit date-added.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn new_at(draft: ItemDraft, added_at: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self::from_fields(draft.validated()?, added_at, None))
    }

    /// Rebuild an item read back from storage. Fields are taken as written;
    /// notes are still held to [`NOTES_LIMIT`].
    #[must_use]
    pub fn restore(
        draft: ItemDraft,
        added_at: NaiveDateTime,
        completed_at: Option<NaiveDateTime>,
    ) -> Self {
        Self::from_fields(draft, added_at, completed_at)
    }

    fn from_fields(
        draft: ItemDraft,
        added_at: NaiveDateTime,
        completed_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            name: draft.name,
            author: draft.author,
            genre: draft.genre,
            price: draft.price,
            release_year: draft.release_year,
            priority: draft.priority,
            notes: truncate_notes(draft.notes),
            added_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn release_year(&self) -> i32 {
        self.release_year
    }

    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub const fn added_at(&self) -> NaiveDateTime {
        self.added_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    /// Lowercased name, the final tie-breaker of every sort key.
    #[must_use]
    pub fn sort_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub(crate) fn mark_completed(&mut self, at: NaiveDateTime) {
        self.completed_at = Some(at);
    }

    pub(crate) fn mark_incomplete(&mut self) {
        self.completed_at = None;
    }

    /// Apply an already validated edit.
    pub(crate) fn apply(&mut self, edit: ItemEdit) {
        match edit {
            ItemEdit::Name(v) => self.name = v,
            ItemEdit::Author(v) => self.author = v,
            ItemEdit::Genre(v) => self.genre = v,
            ItemEdit::Price(v) => self.price = v,
            ItemEdit::ReleaseYear(v) => self.release_year = v,
            ItemEdit::Priority(v) => self.priority = v,
            ItemEdit::Notes(v) => self.notes = truncate_notes(v),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.author == other.author
            && self.genre == other.genre
            && self.price == other.price
            && self.release_year == other.release_year
    }
}

impl Eq for Item {}

/// A change to one editable field of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEdit {
    Name(String),
    Author(String),
    Genre(String),
    Price(Price),
    ReleaseYear(i32),
    Priority(u8),
    Notes(String),
}

impl ItemEdit {
    /// Check the new value and normalize it the same way new items are.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if the new value would be refused on a new item.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(match self {
            Self::Name(v) => Self::Name(validate::text(Field::Name, &v)?),
            Self::Author(v) => Self::Author(validate::text(Field::Author, &v)?),
            Self::Genre(v) => Self::Genre(validate::text(Field::Genre, &v)?),
            Self::Priority(v) => Self::Priority(validate::priority(i64::from(v))?),
            Self::Notes(v) => Self::Notes(validate::notes(&v)?),
            edit @ (Self::Price(_) | Self::ReleaseYear(_)) => edit,
        })
    }
}

fn truncate_notes(mut notes: String) -> String {
    if let Some((cut, _)) = notes.char_indices().nth(NOTES_LIMIT) {
        notes.truncate(cut);
        // The cut may leave the start of a delimiter at the end.
        while validate::DELIMITER_PREFIXES
            .iter()
            .any(|prefix| notes.ends_with(*prefix))
        {
            notes.pop();
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            price: Price::from_cents(999),
            release_year: 1965,
            priority: 3,
            notes: String::new(),
        }
    }

    #[test]
    fn price_rounds_to_two_places() {
        assert_eq!("12.345".parse::<Price>().unwrap(), Price::from_cents(1235));
        assert_eq!("12.344".parse::<Price>().unwrap(), Price::from_cents(1234));
        assert_eq!("7".parse::<Price>().unwrap(), Price::from_cents(700));
        assert_eq!(" 0.5 ".parse::<Price>().unwrap(), Price::from_cents(50));
    }

    #[test]
    fn price_display_always_has_two_decimals() {
        assert_eq!(Price::from_cents(1250).to_string(), "12.50");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(-150).to_string(), "-1.50");
    }

    #[test]
    fn price_rejects_non_numbers() {
        assert!("cheap".parse::<Price>().is_err());
        assert!("inf".parse::<Price>().is_err());
        assert!("NaN".parse::<Price>().is_err());
    }

    #[test]
    fn price_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_cents(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
    }

    #[test]
    fn new_item_trims_and_stamps() {
        let mut d = draft("  Dune ");
        d.notes = "  great\nbook  ".to_string();
        let item = Item::new_at(d, at(1)).unwrap();
        assert_eq!(item.name(), "Dune");
        assert_eq!(item.notes(), "great\nbook");
        assert_eq!(item.added_at(), at(1));
        assert!(item.completed_at().is_none());
    }

    #[test]
    fn new_item_rejects_bad_priority() {
        let mut d = draft("Dune");
        d.priority = 9;
        assert_eq!(
            Item::new_at(d, at(1)),
            Err(ValidationError::PriorityOutOfRange(9))
        );
    }

    #[test]
    fn new_item_rejects_reserved_tokens() {
        let mut d = draft("Dune");
        d.author = "Frank/*/Herbert".to_string();
        assert!(Item::new_at(d, at(1)).is_err());
    }

    #[test]
    fn notes_are_truncated_at_construction() {
        let mut d = draft("Dune");
        d.notes = "x".repeat(NOTES_LIMIT + 40);
        let item = Item::new_at(d, at(1)).unwrap();
        assert_eq!(item.notes().chars().count(), NOTES_LIMIT);
    }

    #[test]
    fn truncation_never_leaves_a_partial_delimiter() {
        let notes = format!("{}=+tail", "x".repeat(NOTES_LIMIT - 2));
        let cut = truncate_notes(notes);
        assert_eq!(cut, "x".repeat(NOTES_LIMIT - 2));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let notes = "é".repeat(NOTES_LIMIT + 1);
        let cut = truncate_notes(notes);
        assert_eq!(cut.chars().count(), NOTES_LIMIT);
    }

    #[test]
    fn equality_ignores_notes_dates_and_priority() {
        let a = Item::new_at(draft("Dune"), at(1)).unwrap();
        let mut d = draft("Dune");
        d.priority = 5;
        d.notes = "reread".to_string();
        let mut b = Item::new_at(d, at(2)).unwrap();
        b.mark_completed(at(3));
        assert_eq!(a, b);

        let mut c = a.clone();
        c.apply(ItemEdit::Price(Price::from_cents(1)));
        assert_ne!(a, c);
    }

    #[test]
    fn completion_stamp_toggles() {
        let mut item = Item::new_at(draft("Dune"), at(1)).unwrap();
        item.mark_completed(at(4));
        assert_eq!(item.completed_at(), Some(at(4)));
        item.mark_incomplete();
        assert_eq!(item.completed_at(), None);
    }

    #[test]
    fn edit_notes_truncates() {
        let mut item = Item::new_at(draft("Dune"), at(1)).unwrap();
        item.apply(ItemEdit::Notes("y".repeat(NOTES_LIMIT * 2)));
        assert_eq!(item.notes().len(), NOTES_LIMIT);
    }

    #[test]
    fn edit_validation_normalizes() {
        assert_eq!(
            ItemEdit::Name("  Emma ".to_string()).validated().unwrap(),
            ItemEdit::Name("Emma".to_string())
        );
        assert!(ItemEdit::Genre("a=+/b".to_string()).validated().is_err());
        assert!(ItemEdit::Priority(0).validated().is_err());
        assert_eq!(
            ItemEdit::ReleaseYear(1815).validated().unwrap(),
            ItemEdit::ReleaseYear(1815)
        );
    }

    #[test]
    fn sort_name_is_lowercase() {
        let item = Item::new_at(draft("DuNe"), at(1)).unwrap();
        assert_eq!(item.sort_name(), "dune");
    }
}
