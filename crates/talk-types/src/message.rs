use crate::message_id::MessageId;
use crate::name::Name;
use crate::reaction::{ReactionKind, ReactionTally};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A row of the message table.
///
/// `reply_to` is [`MessageId::ROOT`] for a thread root; otherwise it named an
/// existing message when the row was created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub reply_to: MessageId,
    pub author: Name,
    pub content: String,
    pub stats: ReactionTally,
}

impl Message {
    /// A fresh row with a zeroed tally.
    pub fn new(id: MessageId, reply_to: MessageId, author: Name, content: impl Into<String>) -> Self {
        Self {
            id,
            reply_to,
            author,
            content: content.into(),
            stats: ReactionTally::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.reply_to.is_root()
    }
}

/// A row of the contributor table: which reaction this identity currently
/// holds on each message it has reacted to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorEntry {
    pub name: Name,
    reactions: BTreeMap<MessageId, ReactionKind>,
}

impl ContributorEntry {
    /// An entry with no reactions.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            reactions: BTreeMap::new(),
        }
    }

    pub fn current_reaction(&self, message: MessageId) -> Option<ReactionKind> {
        self.reactions.get(&message).copied()
    }

    /// Insert or overwrite the reaction held on `message`. No validation.
    pub fn set_reaction(&mut self, message: MessageId, kind: ReactionKind) {
        self.reactions.insert(message, kind);
    }

    /// All held reactions, ordered by message id.
    pub fn reactions(&self) -> impl Iterator<Item = (MessageId, ReactionKind)> + '_ {
        self.reactions.iter().map(|(id, kind)| (*id, *kind))
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}
