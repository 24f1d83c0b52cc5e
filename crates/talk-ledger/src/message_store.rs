use std::collections::{BTreeMap, BTreeSet};

use talk_types::{Message, MessageId, Name, ReactionKind, ReactionTally};
use tracing::debug;

use crate::error::StoreError;
use crate::table::Table;

/// Lowest id handed out by auto-assignment. Caller-supplied ids must stay
/// below it, so the two ranges never collide.
pub const AUTO_ID_FLOOR: u64 = 1_000_000_000;

/// Signed unit step applied to one tally counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyDelta {
    Increment,
    Decrement,
}

/// The message table plus its secondary index on `reply_to`.
#[derive(Clone, Debug, Default)]
pub struct MessageTable {
    rows: Table<Message>,
    by_reply_to: BTreeMap<MessageId, BTreeSet<MessageId>>,
}

impl MessageTable {
    pub fn find(&self, id: MessageId) -> Option<&Message> {
        self.rows.find(&id)
    }

    /// Replies to `reply_to`, ordered by id. `MessageId::ROOT` lists thread roots.
    pub fn replies(&self, reply_to: MessageId) -> Vec<&Message> {
        self.by_reply_to
            .get(&reply_to)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rows.find(id))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One past the largest id in the table, 0 when empty.
    fn available_primary_key(&self) -> Result<MessageId, StoreError> {
        match self.rows.last_key() {
            None => Ok(MessageId::ROOT),
            Some(last) => last.next().ok_or(StoreError::IdsExhausted),
        }
    }

    /// Insert a fully formed row, keeping the reply index in step.
    pub(crate) fn insert_row(&mut self, message: Message) -> Result<(), StoreError> {
        let (id, reply_to) = (message.id, message.reply_to);
        if !self.rows.try_insert(message) {
            return Err(StoreError::AlreadyExists { id });
        }
        self.by_reply_to.entry(reply_to).or_default().insert(id);
        Ok(())
    }
}

/// Transaction-scoped handle on the message table.
pub struct MessageStore<'tx> {
    table: &'tx mut MessageTable,
    auto_id_floor: u64,
}

impl<'tx> MessageStore<'tx> {
    pub(crate) fn new(table: &'tx mut MessageTable, auto_id_floor: u64) -> Self {
        Self {
            table,
            auto_id_floor,
        }
    }

    /// Create a message with a zeroed tally and return its id.
    ///
    /// `id == 0` assigns `max(available_primary_key, floor)`. Checks run in
    /// order: parent exists, id below the floor, id not taken.
    pub fn insert(
        &mut self,
        id: MessageId,
        reply_to: MessageId,
        author: Name,
        content: impl Into<String>,
    ) -> Result<MessageId, StoreError> {
        if !reply_to.is_root() && self.table.find(reply_to).is_none() {
            return Err(StoreError::NotFound { id: reply_to });
        }
        if id.get() >= self.auto_id_floor {
            return Err(StoreError::InvalidArgument {
                id,
                floor: self.auto_id_floor,
            });
        }

        let id = if id.is_root() {
            let available = self.table.available_primary_key()?;
            available.max(MessageId::new(self.auto_id_floor))
        } else {
            id
        };

        self.table
            .insert_row(Message::new(id, reply_to, author, content))?;
        Ok(id)
    }

    pub fn get(&self, id: MessageId) -> Result<&Message, StoreError> {
        self.table.find(id).ok_or(StoreError::NotFound { id })
    }

    pub fn find(&self, id: MessageId) -> Option<&Message> {
        self.table.find(id)
    }

    /// Move one counter of `id`'s tally by one step and return the new tally.
    ///
    /// Decrementing a zero counter is a caller bug; see
    /// [`ReactionTally::decrement`].
    pub fn apply_tally_delta(
        &mut self,
        id: MessageId,
        kind: ReactionKind,
        delta: TallyDelta,
    ) -> Result<ReactionTally, StoreError> {
        let mut row = self.get(id)?.clone();
        match delta {
            TallyDelta::Increment => row.stats.increment(kind),
            TallyDelta::Decrement => row.stats.decrement(kind),
        }
        let stats = row.stats;
        self.table
            .rows
            .replace(row)
            .ok_or(StoreError::NotFound { id })?;
        debug!(message = %id, %kind, ?delta, tally = %stats, "tally updated");
        Ok(stats)
    }

    pub fn replies(&self, reply_to: MessageId) -> Vec<&Message> {
        self.table.replies(reply_to)
    }
}
