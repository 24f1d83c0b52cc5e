use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of reactions a contributor can hold on a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ReactionKind {
    ThumbsUp = 0,
    ThumbsDown,
    Meh,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 3] = [Self::ThumbsUp, Self::ThumbsDown, Self::Meh];

    /// Snake-case name, also used as the action name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
            Self::Meh => "meh",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DomainError::UnknownReaction(s.to_string()))
    }
}

/// Per-message reaction counters.
///
/// Only moved by [`increment`](Self::increment) and
/// [`decrement`](Self::decrement); each counter must equal the number of
/// contributors currently holding that reaction on the message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionTally {
    thumbs_up: u64,
    thumbs_down: u64,
    meh: u64,
}

impl ReactionTally {
    pub fn count(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up,
            ReactionKind::ThumbsDown => self.thumbs_down,
            ReactionKind::Meh => self.meh,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u64 {
        self.thumbs_up + self.thumbs_down + self.meh
    }

    pub fn increment(&mut self, kind: ReactionKind) {
        *self.slot(kind) += 1;
    }

    /// Decrement the counter for `kind`.
    ///
    /// Callers must never decrement a zero counter. Debug builds assert it;
    /// release builds saturate at zero.
    pub fn decrement(&mut self, kind: ReactionKind) {
        let slot = self.slot(kind);
        debug_assert!(*slot > 0, "decrement of zero {kind} counter");
        *slot = slot.saturating_sub(1);
    }

    fn slot(&mut self, kind: ReactionKind) -> &mut u64 {
        match kind {
            ReactionKind::ThumbsUp => &mut self.thumbs_up,
            ReactionKind::ThumbsDown => &mut self.thumbs_down,
            ReactionKind::Meh => &mut self.meh,
        }
    }
}

impl fmt::Display for ReactionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "up:{} down:{} meh:{}",
            self.thumbs_up, self.thumbs_down, self.meh
        )
    }
}
