//! Sorted, bounded item lists.
//!
//! A [`BoundedList`] keeps its items ordered under a switchable [`SortKey`]
//! and never holds more than its capacity. Two configurations exist:
//!
//! - **Backlog**: capacity 50, default order is highest priority first, then
//!   oldest addition, then name. Inserting into a full backlog is rejected.
//! - **Recent completions**: capacity 5, default order is completion time,
//!   then name. Inserting into a full list evicts the oldest completion.
//!
//! # Invariants
//!
//! - `items` is sorted under the current key after every public operation.
//! - `items.len() <= capacity`, including right after construction.
//! - Every key ends with the lowercased name, so the order is total.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::ShelfError;
use crate::model::{Item, ItemEdit};

pub const BACKLOG_CAPACITY: usize = 50;
pub const COMPLETED_CAPACITY: usize = 5;

/// The orderings a list can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// The list's own default order (see [`DefaultOrder`]).
    #[default]
    Default,
    Name,
    Author,
    Genre,
    Price,
    ReleaseYear,
    DateAdded,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::Name,
        Self::Author,
        Self::Genre,
        Self::Price,
        Self::ReleaseYear,
        Self::DateAdded,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Name => "name",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Price => "price",
            Self::ReleaseYear => "release",
            Self::DateAdded => "date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "name" => Ok(Self::Name),
            "author" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            "price" => Ok(Self::Price),
            "release" | "release-year" => Ok(Self::ReleaseYear),
            "date" | "date-added" => Ok(Self::DateAdded),
            _ => Err(ShelfError::UnknownSortKey(s.to_string())),
        }
    }
}

/// What [`SortKey::Default`] means for a given list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOrder {
    /// `(-priority, date added, lowercased name)`
    Priority,
    /// `(date completed, lowercased name)`
    Completion,
}

/// What happens when an item is inserted into a full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Refuse the item with [`ShelfError::ListOverflow`].
    Reject,
    /// Return to the default order and drop the item at index 0.
    EvictOldest,
}

/// Where an inserted item landed, and the completion it pushed out if the
/// list was full.
#[derive(Debug, Clone)]
pub struct Placement {
    pub index: usize,
    pub evicted: Option<Item>,
}

/// An insert refused by a [`OverflowPolicy::Reject`] list. Hands the item back.
#[derive(Debug)]
pub(crate) struct Rejected {
    pub(crate) item: Item,
    pub(crate) capacity: usize,
}

impl From<Rejected> for ShelfError {
    fn from(rejected: Rejected) -> Self {
        Self::ListOverflow {
            capacity: rejected.capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundedList {
    items: Vec<Item>,
    capacity: usize,
    default_order: DefaultOrder,
    policy: OverflowPolicy,
    sort_key: SortKey,
}

impl BoundedList {
    /// Build a list from `items`, sorted by the default order. Anything past
    /// `capacity` after sorting is dropped without error.
    #[must_use]
    pub fn new(
        capacity: usize,
        default_order: DefaultOrder,
        policy: OverflowPolicy,
        items: Vec<Item>,
    ) -> Self {
        let mut list = Self {
            items,
            capacity,
            default_order,
            policy,
            sort_key: SortKey::Default,
        };
        list.resort();
        if list.items.len() > capacity {
            debug!(
                dropped = list.items.len() - capacity,
                capacity, "truncating oversized initial list"
            );
            list.items.truncate(capacity);
        }
        list
    }

    /// A backlog: 50 items, priority order, rejects when full.
    #[must_use]
    pub fn backlog(items: Vec<Item>) -> Self {
        Self::new(
            BACKLOG_CAPACITY,
            DefaultOrder::Priority,
            OverflowPolicy::Reject,
            items,
        )
    }

    /// A recent-completions list: 5 items, completion order, evicts when full.
    #[must_use]
    pub fn completions(items: Vec<Item>) -> Self {
        Self::new(
            COMPLETED_CAPACITY,
            DefaultOrder::Completion,
            OverflowPolicy::EvictOldest,
            items,
        )
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn default_order(&self) -> DefaultOrder {
        self.default_order
    }

    #[must_use]
    pub const fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Compare two items under this list's current key.
    #[must_use]
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        compare_by(self.sort_key, self.default_order, a, b)
    }

    /// Switch to a key given by name, re-sorting everything.
    ///
    /// # Errors
    ///
    /// [`ShelfError::UnknownSortKey`] if `name` is not a known key; the list is
    /// left as it was.
    pub fn change_sort_key(&mut self, name: &str) -> Result<(), ShelfError> {
        let key = name.parse()?;
        self.set_sort_key(key);
        Ok(())
    }

    /// Switch to `key` and re-sort. The key stays current for later inserts.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.resort();
    }

    /// Insert an item at its sorted position.
    ///
    /// Returns the index the item now occupies, plus the evicted item when an
    /// evicting list was full. Names are not unique, so callers that need to
    /// show the item afterwards should use this index rather than search.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListOverflow`] when a rejecting list is full. The item is
    /// dropped; use the category operations to move items without loss.
    pub fn insert(&mut self, item: Item) -> Result<Placement, ShelfError> {
        Ok(self.try_insert(item)?)
    }

    /// Insert, handing the item back if the list refuses it.
    pub(crate) fn try_insert(&mut self, item: Item) -> Result<Placement, Rejected> {
        if !self.is_full() {
            return Ok(Placement {
                index: self.insert_sorted(item),
                evicted: None,
            });
        }
        match self.policy {
            OverflowPolicy::Reject => Err(Rejected {
                item,
                capacity: self.capacity,
            }),
            OverflowPolicy::EvictOldest => {
                // Eviction must see completion order, whatever is displayed.
                if self.sort_key != SortKey::Default {
                    self.set_sort_key(SortKey::Default);
                }
                let evicted = self.items.remove(0);
                debug!(evicted = evicted.name(), "evicting oldest completion");
                Ok(Placement {
                    index: self.insert_sorted(item),
                    evicted: Some(evicted),
                })
            }
        }
    }

    /// Remove and return the item at `index`.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListUnderflow`] if the list is empty.
    ///
    /// # Panics
    ///
    /// If `index` is out of range on a non-empty list. Callers check indices
    /// against [`len`](Self::len) first.
    pub fn remove_at(&mut self, index: usize) -> Result<Item, ShelfError> {
        if self.items.is_empty() {
            return Err(ShelfError::ListUnderflow);
        }
        Ok(self.items.remove(index))
    }

    /// Apply one or more field edits to the item at `index` and move it to
    /// its new sorted position, which is returned.
    ///
    /// All edits are validated before any is applied. Reinsertion ignores the
    /// capacity check since the item was already in the list.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] if any edit is invalid; nothing changes.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn edit_at(
        &mut self,
        index: usize,
        edits: impl IntoIterator<Item = ItemEdit>,
    ) -> Result<usize, ShelfError> {
        let edits = edits
            .into_iter()
            .map(ItemEdit::validated)
            .collect::<Result<Vec<_>, _>>()?;

        let mut item = self.items.remove(index);
        for edit in edits {
            item.apply(edit);
        }
        Ok(self.insert_sorted(item))
    }

    fn insert_sorted(&mut self, item: Item) -> usize {
        let (key, order) = (self.sort_key, self.default_order);
        let index = match self
            .items
            .binary_search_by(|probe| compare_by(key, order, probe, &item))
        {
            Ok(i) | Err(i) => i,
        };
        self.items.insert(index, item);
        index
    }

    fn resort(&mut self) {
        let (key, order) = (self.sort_key, self.default_order);
        self.items.sort_by(|a, b| compare_by(key, order, a, b));
    }
}

fn compare_by(key: SortKey, order: DefaultOrder, a: &Item, b: &Item) -> Ordering {
    let primary = match (key, order) {
        (SortKey::Default, DefaultOrder::Priority) => b
            .priority()
            .cmp(&a.priority())
            .then_with(|| a.added_at().cmp(&b.added_at())),
        (SortKey::Default, DefaultOrder::Completion) => a.completed_at().cmp(&b.completed_at()),
        (SortKey::Name, _) => Ordering::Equal,
        (SortKey::Author, _) => a.author().to_lowercase().cmp(&b.author().to_lowercase()),
        (SortKey::Genre, _) => a.genre().to_lowercase().cmp(&b.genre().to_lowercase()),
        (SortKey::Price, _) => a.price().cmp(&b.price()),
        (SortKey::ReleaseYear, _) => a.release_year().cmp(&b.release_year()),
        (SortKey::DateAdded, _) => a.added_at().cmp(&b.added_at()),
    };
    primary.then_with(|| a.sort_name().cmp(&b.sort_name()))
}
