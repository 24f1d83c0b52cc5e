use std::fmt;

use talk_types::{MessageId, Name, ReactionKind};

/// Describes a specific violation of the cross-table invariants.
///
/// Grouped: Tally (tallies agree with contributor entries) and Threading
/// (ids are non-zero and every reply points at another message that exists).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerViolation {
    /// A message's counter for `kind` differs from the number of contributors
    /// holding `kind` on it.
    TallyMismatch {
        message: MessageId,
        kind: ReactionKind,
        recorded: u64,
        expected: u64,
    },
    /// A contributor holds a reaction on a message that is not in the table.
    ReactionOnMissingMessage {
        contributor: Name,
        message: MessageId,
    },
    /// A reply names a parent that is not in the table.
    MissingParent {
        message: MessageId,
        reply_to: MessageId,
    },
    /// A row is stored under the reserved root id 0.
    ReservedId,
    /// A message names itself as its parent.
    SelfReply { message: MessageId },
}

impl fmt::Display for LedgerViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TallyMismatch {
                message,
                kind,
                recorded,
                expected,
            } => write!(
                f,
                "message {message} records {recorded} {kind} but {expected} contributors hold it"
            ),
            Self::ReactionOnMissingMessage {
                contributor,
                message,
            } => write!(
                f,
                "contributor {contributor} holds a reaction on missing message {message}"
            ),
            Self::MissingParent { message, reply_to } => write!(
                f,
                "message {message} replies to missing message {reply_to}"
            ),
            Self::ReservedId => write!(f, "a message is stored under reserved id 0"),
            Self::SelfReply { message } => write!(f, "message {message} replies to itself"),
        }
    }
}

fn summarize(violations: &[LedgerViolation]) -> String {
    match violations {
        [] => "no violations".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("message {id} not found")]
    NotFound { id: MessageId },
    #[error("message id {id} is reserved: caller-supplied ids must be below {floor}")]
    InvalidArgument { id: MessageId, floor: u64 },
    #[error("message {id} already exists")]
    AlreadyExists { id: MessageId },
    #[error("contributor {name} appears more than once")]
    DuplicateContributor { name: Name },
    #[error("message ids exhausted")]
    IdsExhausted,
    #[error("ledger inconsistent: {}", summarize(.0))]
    Inconsistent(Vec<LedgerViolation>),
    #[error("snapshot codec: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inconsistent_reports_first_violation_and_count() {
        let err = StoreError::Inconsistent(vec![
            LedgerViolation::MissingParent {
                message: MessageId::new(3),
                reply_to: MessageId::new(9),
            },
            LedgerViolation::TallyMismatch {
                message: MessageId::new(3),
                kind: ReactionKind::Meh,
                recorded: 2,
                expected: 1,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "ledger inconsistent: message 3 replies to missing message 9 (and 1 more)"
        );
    }

    #[test]
    fn tally_mismatch_display() {
        let v = LedgerViolation::TallyMismatch {
            message: MessageId::new(1),
            kind: ReactionKind::ThumbsUp,
            recorded: 0,
            expected: 1,
        };
        assert_eq!(
            v.to_string(),
            "message 1 records 0 thumbs_up but 1 contributors hold it"
        );
    }
}
