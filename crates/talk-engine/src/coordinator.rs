use talk_ledger::{TallyDelta, Transaction};
use talk_types::{MessageId, Name, ReactionKind};
use tracing::{debug, warn};

use crate::auth::{Authorizer, require_auth};
use crate::config::MissingTargetPolicy;
use crate::error::ActionError;

/// What a single `react` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// First reaction by this contributor on this message.
    Recorded(ReactionKind),
    /// Same reaction resubmitted; nothing changed.
    Unchanged(ReactionKind),
    /// Contributor switched reactions; one count moved between kinds.
    Changed {
        from: ReactionKind,
        to: ReactionKind,
    },
    /// The target does not exist and the call was ignored.
    TargetMissing,
}

/// Keeps each message's tally in step with the contributor ledger.
///
/// Per (contributor, message) pair the states are `NoReaction` and
/// `Reacted(kind)`. `NoReaction -> Reacted(k)` adds one to `k`;
/// `Reacted(k) -> Reacted(k')` moves one count from `k` to `k'`;
/// `Reacted(k) -> Reacted(k)` does nothing. There is no way back to
/// `NoReaction`.
///
/// Holds no table state of its own; everything goes through the
/// [`Transaction`] it is handed, which makes the tally update and the ledger
/// write one unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReactionCoordinator {
    missing_target: MissingTargetPolicy,
}

impl ReactionCoordinator {
    pub fn new(missing_target: MissingTargetPolicy) -> Self {
        Self { missing_target }
    }

    pub fn react(
        &self,
        tx: &mut Transaction<'_>,
        auth: &dyn Authorizer,
        actor: Name,
        target: MessageId,
        kind: ReactionKind,
    ) -> Result<ReactionOutcome, ActionError> {
        require_auth(auth, actor)?;

        if tx.messages().find(target).is_none() {
            return match self.missing_target {
                MissingTargetPolicy::Ignore => {
                    warn!(%actor, message = %target, %kind, "reaction to missing message ignored");
                    Ok(ReactionOutcome::TargetMissing)
                }
                MissingTargetPolicy::Reject => Err(ActionError::NotFound { id: target }),
            };
        }

        let mut entry = tx.contributors().get_or_create(actor);
        let outcome = match entry.current_reaction(target) {
            None => {
                tx.messages()
                    .apply_tally_delta(target, kind, TallyDelta::Increment)?;
                ReactionOutcome::Recorded(kind)
            }
            Some(current) if current == kind => {
                debug!(%actor, message = %target, %kind, "reaction unchanged");
                return Ok(ReactionOutcome::Unchanged(kind));
            }
            Some(previous) => {
                // Old count leaves before the new one arrives.
                let mut messages = tx.messages();
                messages.apply_tally_delta(target, previous, TallyDelta::Decrement)?;
                messages.apply_tally_delta(target, kind, TallyDelta::Increment)?;
                ReactionOutcome::Changed {
                    from: previous,
                    to: kind,
                }
            }
        };

        // Ledger follows only once the tally is settled.
        entry.set_reaction(target, kind);
        tx.contributors().save(entry);
        debug!(%actor, message = %target, ?outcome, "reaction applied");
        Ok(outcome)
    }
}
