use crate::database::State;
use crate::error::LedgerViolation;

/// Id 0 is never stored, and every non-root `reply_to` must name another
/// message in the table. Messages are never deleted, so a parent that existed
/// at creation still exists.
pub(crate) fn check(state: &State, violations: &mut Vec<LedgerViolation>) {
    for message in state.messages.iter() {
        if message.id.is_root() {
            violations.push(LedgerViolation::ReservedId);
        } else if message.reply_to == message.id {
            violations.push(LedgerViolation::SelfReply {
                message: message.id,
            });
        } else if !message.is_root() && state.messages.find(message.reply_to).is_none() {
            violations.push(LedgerViolation::MissingParent {
                message: message.id,
                reply_to: message.reply_to,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use talk_types::{Message, MessageId, Name};

    use super::*;

    #[test]
    fn orphan_reply_reports_missing_parent() {
        let mut state = State::default();
        let author = Name::default();
        state
            .messages
            .insert_row(Message::new(MessageId::new(1), MessageId::ROOT, author, "root"))
            .unwrap();
        state
            .messages
            .insert_row(Message::new(MessageId::new(2), MessageId::new(1), author, "ok"))
            .unwrap();
        state
            .messages
            .insert_row(Message::new(MessageId::new(3), MessageId::new(7), author, "orphan"))
            .unwrap();

        let mut violations = Vec::new();
        check(&state, &mut violations);
        assert_eq!(
            violations,
            vec![LedgerViolation::MissingParent {
                message: MessageId::new(3),
                reply_to: MessageId::new(7),
            }]
        );
    }

    #[test]
    fn reserved_id_and_self_reply_are_reported() {
        let mut state = State::default();
        let author = Name::default();
        state
            .messages
            .insert_row(Message::new(MessageId::ROOT, MessageId::ROOT, author, "zero"))
            .unwrap();
        state
            .messages
            .insert_row(Message::new(MessageId::new(3), MessageId::new(3), author, "loop"))
            .unwrap();

        let mut violations = Vec::new();
        check(&state, &mut violations);
        assert_eq!(
            violations,
            vec![
                LedgerViolation::ReservedId,
                LedgerViolation::SelfReply {
                    message: MessageId::new(3)
                },
            ]
        );
    }
}
