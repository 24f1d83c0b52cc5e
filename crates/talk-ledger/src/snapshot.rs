use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use talk_types::{ContributorEntry, Message};

use crate::error::StoreError;

/// Point-in-time copy of both tables, as exposed to external readers.
///
/// `messages` is ordered by id and `contributors` by name, so two databases
/// holding the same rows produce equal snapshots and equal digests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub messages: Vec<Message>,
    pub contributors: Vec<ContributorEntry>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// SHA-256 over every row.
    ///
    /// Each variable-length field and each collection is length-prefixed
    /// (little-endian u64) to prevent concatenation collisions.
    pub fn digest(&self) -> StateDigest {
        let mut hasher = Sha256::new();

        hasher.update((self.messages.len() as u64).to_le_bytes());
        for m in &self.messages {
            hasher.update(m.id.get().to_le_bytes());
            hasher.update(m.reply_to.get().to_le_bytes());
            hasher.update(m.author.raw().to_le_bytes());
            hasher.update((m.content.len() as u64).to_le_bytes());
            hasher.update(m.content.as_bytes());
            for kind in talk_types::ReactionKind::ALL {
                hasher.update(m.stats.count(kind).to_le_bytes());
            }
        }

        hasher.update((self.contributors.len() as u64).to_le_bytes());
        for c in &self.contributors {
            hasher.update(c.name.raw().to_le_bytes());
            hasher.update((c.len() as u64).to_le_bytes());
            for (message, kind) in c.reactions() {
                hasher.update(message.get().to_le_bytes());
                hasher.update([kind as u8]);
            }
        }

        StateDigest(hasher.finalize().into())
    }
}

/// Digest of a [`Snapshot`]. Display: lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateDigest([u8; 32]);

impl StateDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use talk_types::{MessageId, Name, ReactionKind};

    use super::*;

    fn sample() -> Snapshot {
        let bob: Name = "bob".parse().unwrap();
        let mut message = Message::new(MessageId::new(1), MessageId::ROOT, bob, "hello");
        message.stats.increment(ReactionKind::ThumbsUp);
        let mut entry = ContributorEntry::new(bob);
        entry.set_reaction(MessageId::new(1), ReactionKind::ThumbsUp);
        Snapshot {
            messages: vec![message],
            contributors: vec![entry],
        }
    }

    #[test]
    fn json_layout() {
        insta::assert_json_snapshot!(sample(), @r#"
        {
          "messages": [
            {
              "id": 1,
              "reply_to": 0,
              "author": "bob",
              "content": "hello",
              "stats": {
                "thumbs_up": 1,
                "thumbs_down": 0,
                "meh": 0
              }
            }
          ],
          "contributors": [
            {
              "name": "bob",
              "reactions": {
                "1": "thumbs_up"
              }
            }
          ]
        }
        "#);
    }

    #[test]
    fn json_import_matches_export() {
        let snapshot = sample();
        let parsed = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.digest(), snapshot.digest());
    }

    #[test]
    fn digest_tracks_reaction_changes() {
        let before = sample();
        let mut after = sample();
        after.contributors[0].set_reaction(MessageId::new(1), ReactionKind::Meh);

        assert_ne!(before.digest(), after.digest());
        assert_eq!(before.digest().to_string().len(), 64);
    }

    #[test]
    fn malformed_json_is_codec_error() {
        assert!(matches!(
            Snapshot::from_json("{\"messages\": 3}"),
            Err(StoreError::Codec(_))
        ));
    }
}
