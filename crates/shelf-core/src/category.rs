//! A named pair of backlog and recent-completions lists.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::ShelfError;
use crate::list::{BoundedList, Placement};
use crate::model::{Item, timestamp};
use crate::validate::{self, ValidationError};

/// One kind of media (books, films, ...) with its backlog and the items most
/// recently finished from it.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    backlog: BoundedList,
    completed: BoundedList,
}

impl Category {
    /// An empty category. The name is validated and trimmed.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if the name contains a reserved token.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::from_parts(
            validate::category_name(name)?,
            Vec::new(),
            Vec::new(),
        ))
    }

    /// Rebuild a category from stored lists. Oversized lists are truncated by
    /// each list's own rules.
    #[must_use]
    pub fn from_parts(name: String, backlog: Vec<Item>, completed: Vec<Item>) -> Self {
        Self {
            name,
            backlog: BoundedList::backlog(backlog),
            completed: BoundedList::completions(completed),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn backlog(&self) -> &BoundedList {
        &self.backlog
    }

    pub fn backlog_mut(&mut self) -> &mut BoundedList {
        &mut self.backlog
    }

    #[must_use]
    pub const fn completed(&self) -> &BoundedList {
        &self.completed
    }

    pub fn completed_mut(&mut self) -> &mut BoundedList {
        &mut self.completed
    }

    /// Rename in place. The owning catalog re-sorts afterwards.
    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Add a new item to the backlog and return its backlog index.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListOverflow`] if the backlog is full.
    pub fn add_item(&mut self, item: Item) -> Result<usize, ShelfError> {
        debug!(category = %self.name, item = item.name(), "adding item to backlog");
        self.backlog.insert(item).map(|placed| placed.index)
    }

    /// Move a backlog item to recent completions, stamped now.
    ///
    /// The returned [`Placement`] holds the item's index in recent completions
    /// and the completion that had to be evicted to make room, if any.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListUnderflow`] if the backlog is empty.
    pub fn mark_complete(&mut self, backlog_index: usize) -> Result<Placement, ShelfError> {
        self.mark_complete_at(backlog_index, timestamp::now())
    }

    /// [`mark_complete`](Self::mark_complete) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// As [`mark_complete`](Self::mark_complete).
    pub fn mark_complete_at(
        &mut self,
        backlog_index: usize,
        now: NaiveDateTime,
    ) -> Result<Placement, ShelfError> {
        let mut item = self.backlog.remove_at(backlog_index)?;
        item.mark_completed(now);
        debug!(category = %self.name, item = item.name(), "marked complete");
        // Completion lists evict instead of refusing.
        self.completed.try_insert(item).map_err(ShelfError::from)
    }

    /// Move a completed item back to the backlog, clearing its completion,
    /// and return its backlog index.
    ///
    /// If the backlog is full the move is undone: the item goes back into
    /// recent completions stamped with the time of the rollback, and the
    /// overflow is returned. The completion time therefore advances even
    /// though the call failed.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListUnderflow`] if there are no completions, or
    /// [`ShelfError::ListOverflow`] if the backlog is full.
    pub fn mark_incomplete(&mut self, completed_index: usize) -> Result<usize, ShelfError> {
        self.mark_incomplete_at(completed_index, timestamp::now())
    }

    /// [`mark_incomplete`](Self::mark_incomplete) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// As [`mark_incomplete`](Self::mark_incomplete).
    pub fn mark_incomplete_at(
        &mut self,
        completed_index: usize,
        now: NaiveDateTime,
    ) -> Result<usize, ShelfError> {
        let mut item = self.completed.remove_at(completed_index)?;
        item.mark_incomplete();
        match self.backlog.try_insert(item) {
            Ok(placed) => {
                debug!(category = %self.name, index = placed.index, "marked incomplete");
                Ok(placed.index)
            }
            Err(rejected) => {
                let capacity = rejected.capacity;
                let mut item = rejected.item;
                warn!(
                    category = %self.name,
                    item = item.name(),
                    "backlog full, returning item to completions"
                );
                item.mark_completed(now);
                // Room was just freed by the removal above, so nothing is evicted.
                let _ = self.completed.try_insert(item);
                Err(ShelfError::ListOverflow { capacity })
            }
        }
    }

    /// Remove an item from the backlog.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListUnderflow`] if the backlog is empty.
    pub fn remove_backlog_item(&mut self, index: usize) -> Result<Item, ShelfError> {
        self.backlog.remove_at(index)
    }

    /// Remove an item from recent completions.
    ///
    /// # Errors
    ///
    /// [`ShelfError::ListUnderflow`] if there are no completions.
    pub fn remove_completed_item(&mut self, index: usize) -> Result<Item, ShelfError> {
        self.completed.remove_at(index)
    }
}
