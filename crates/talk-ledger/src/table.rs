use std::collections::BTreeMap;
use std::fmt;

use talk_types::{ContributorEntry, Message, MessageId, Name};

/// A record stored in a [`Table`], addressed by its primary key.
pub trait Row: Clone {
    type Key: Copy + Ord + fmt::Debug + fmt::Display;

    fn primary_key(&self) -> Self::Key;
}

impl Row for Message {
    type Key = MessageId;

    fn primary_key(&self) -> MessageId {
        self.id
    }
}

impl Row for ContributorEntry {
    type Key = Name;

    fn primary_key(&self) -> Name {
        self.name
    }
}

/// Key-ordered table of rows with unique primary keys.
///
/// Rows are never mutated in place: callers read a row, compute the new
/// value, and write it back whole with [`replace`](Self::replace).
#[derive(Clone, Debug)]
pub struct Table<R: Row> {
    rows: BTreeMap<R::Key, R>,
}

impl<R: Row> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Row> Table<R> {
    pub fn find(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    pub fn contains(&self, key: &R::Key) -> bool {
        self.rows.contains_key(key)
    }

    /// Insert a row under a key that is not yet taken.
    ///
    /// Returns `false` and leaves the table untouched if the key exists.
    pub fn try_insert(&mut self, row: R) -> bool {
        match self.rows.entry(row.primary_key()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(row);
                true
            }
        }
    }

    /// Overwrite an existing row with `row`, returning the previous value.
    ///
    /// Returns `None` and writes nothing if no row has that key.
    pub fn replace(&mut self, row: R) -> Option<R> {
        let slot = self.rows.get_mut(&row.primary_key())?;
        Some(std::mem::replace(slot, row))
    }

    /// Insert or overwrite, returning the previous value if there was one.
    pub fn upsert(&mut self, row: R) -> Option<R> {
        self.rows.insert(row.primary_key(), row)
    }

    /// Largest key in the table.
    pub fn last_key(&self) -> Option<R::Key> {
        self.rows.keys().next_back().copied()
    }

    /// Rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
