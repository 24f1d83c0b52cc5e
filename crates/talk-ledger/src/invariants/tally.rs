use std::collections::BTreeMap;

use talk_types::{MessageId, ReactionKind, ReactionTally};

use crate::database::State;
use crate::error::LedgerViolation;

/// Rebuild every tally from the contributor table and compare it with the
/// tally stored on each message.
///
/// Reactions on missing messages are reported once each and left out of the
/// rebuilt tallies.
pub(crate) fn check(state: &State, violations: &mut Vec<LedgerViolation>) {
    let mut rebuilt: BTreeMap<MessageId, ReactionTally> = BTreeMap::new();

    for entry in state.contributors.iter() {
        for (message, kind) in entry.reactions() {
            if state.messages.find(message).is_none() {
                violations.push(LedgerViolation::ReactionOnMissingMessage {
                    contributor: entry.name,
                    message,
                });
                continue;
            }
            rebuilt.entry(message).or_default().increment(kind);
        }
    }

    for message in state.messages.iter() {
        let want = rebuilt.get(&message.id).copied().unwrap_or_default();
        for kind in ReactionKind::ALL {
            let (recorded, expected) = (message.stats.count(kind), want.count(kind));
            if recorded != expected {
                violations.push(LedgerViolation::TallyMismatch {
                    message: message.id,
                    kind,
                    recorded,
                    expected,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use talk_types::{ContributorEntry, Message, Name};

    use super::*;

    fn user(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn state_with(messages: Vec<Message>, contributors: Vec<ContributorEntry>) -> State {
        let mut state = State::default();
        for m in messages {
            state.messages.insert_row(m).unwrap();
        }
        for c in contributors {
            state.contributors.upsert(c);
        }
        state
    }

    #[test]
    fn matching_tallies_pass() {
        let mut m = Message::new(MessageId::new(1), MessageId::ROOT, user("alice"), "x");
        m.stats.increment(ReactionKind::ThumbsUp);
        let mut bob = ContributorEntry::new(user("bob"));
        bob.set_reaction(MessageId::new(1), ReactionKind::ThumbsUp);

        let mut violations = Vec::new();
        check(&state_with(vec![m], vec![bob]), &mut violations);
        assert!(violations.is_empty());
    }

    #[test]
    fn drifted_counter_reports_tally_mismatch() {
        let mut m = Message::new(MessageId::new(1), MessageId::ROOT, user("alice"), "x");
        m.stats.increment(ReactionKind::ThumbsUp);
        let mut bob = ContributorEntry::new(user("bob"));
        bob.set_reaction(MessageId::new(1), ReactionKind::Meh);

        let mut violations = Vec::new();
        check(&state_with(vec![m], vec![bob]), &mut violations);
        similar_asserts::assert_eq!(
            violations,
            vec![
                LedgerViolation::TallyMismatch {
                    message: MessageId::new(1),
                    kind: ReactionKind::ThumbsUp,
                    recorded: 1,
                    expected: 0,
                },
                LedgerViolation::TallyMismatch {
                    message: MessageId::new(1),
                    kind: ReactionKind::Meh,
                    recorded: 0,
                    expected: 1,
                },
            ]
        );
    }

    #[test]
    fn reaction_on_missing_message_is_reported() {
        let mut carol = ContributorEntry::new(user("carol"));
        carol.set_reaction(MessageId::new(42), ReactionKind::Meh);

        let mut violations = Vec::new();
        check(&state_with(vec![], vec![carol]), &mut violations);
        assert_eq!(
            violations,
            vec![LedgerViolation::ReactionOnMissingMessage {
                contributor: user("carol"),
                message: MessageId::new(42),
            }]
        );
    }
}
