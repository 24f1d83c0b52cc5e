use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a message.
///
/// `0` is a sentinel: as a `reply_to` it marks a root message, as a requested
/// id it asks the store to assign one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const ROOT: Self = Self(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether this is the `0` sentinel.
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }

    /// The id immediately after this one, or `None` on overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
