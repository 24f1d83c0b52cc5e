use talk_ledger::{Database, Snapshot, StoreError, Transaction};
use talk_types::{ContributorEntry, Message, MessageId, Name, ReactionKind};
use tracing::{error, info, instrument};

use crate::auth::{Authorizer, require_auth};
use crate::config::EngineConfig;
use crate::coordinator::{ReactionCoordinator, ReactionOutcome};
use crate::error::ActionError;

/// The discussion ledger's action surface.
///
/// Each mutating action runs in its own [`Database::transact`] unit and takes
/// `&mut self`, so calls are serialized; share a `Talk` across threads behind
/// a `Mutex`.
#[derive(Clone, Debug)]
pub struct Talk {
    db: Database,
    coordinator: ReactionCoordinator,
    verify_invariants: bool,
}

impl Default for Talk {
    fn default() -> Self {
        EngineConfig::default().build()
    }
}

impl Talk {
    pub fn new(config: &EngineConfig) -> Self {
        config.build()
    }

    /// Resume from a snapshot taken by [`Talk::snapshot`].
    pub fn from_snapshot(config: &EngineConfig, snapshot: Snapshot) -> Result<Self, ActionError> {
        let db = Database::restore(snapshot, config.auto_id_floor.get())?;
        Ok(config.build_with(db))
    }

    pub(crate) fn from_parts(
        db: Database,
        coordinator: ReactionCoordinator,
        verify_invariants: bool,
    ) -> Self {
        Self {
            db,
            coordinator,
            verify_invariants,
        }
    }

    /// Post a message, optionally as a reply.
    ///
    /// `id == 0` auto-assigns an id at or above the configured floor; a
    /// caller-supplied id must be below it. A non-zero `reply_to` must name an
    /// existing message.
    #[instrument(skip_all, fields(id = id, reply_to = reply_to, author = %author))]
    pub fn post(
        &mut self,
        auth: &dyn Authorizer,
        id: u64,
        reply_to: u64,
        author: Name,
        content: impl Into<String>,
    ) -> Result<MessageId, ActionError> {
        let content = content.into();
        let id = self.run(|tx| {
            require_auth(auth, author)?;
            let id = tx
                .messages()
                .insert(MessageId::new(id), MessageId::new(reply_to), author, content)?;
            Ok(id)
        })?;
        info!(message = %id, "message posted");
        Ok(id)
    }

    pub fn react_thumbs_up(
        &mut self,
        auth: &dyn Authorizer,
        actor: Name,
        target: u64,
    ) -> Result<ReactionOutcome, ActionError> {
        self.react(auth, actor, MessageId::new(target), ReactionKind::ThumbsUp)
    }

    pub fn react_thumbs_down(
        &mut self,
        auth: &dyn Authorizer,
        actor: Name,
        target: u64,
    ) -> Result<ReactionOutcome, ActionError> {
        self.react(auth, actor, MessageId::new(target), ReactionKind::ThumbsDown)
    }

    pub fn react_meh(
        &mut self,
        auth: &dyn Authorizer,
        actor: Name,
        target: u64,
    ) -> Result<ReactionOutcome, ActionError> {
        self.react(auth, actor, MessageId::new(target), ReactionKind::Meh)
    }

    /// Set `actor`'s reaction on `target` to `kind`.
    #[instrument(skip_all, fields(actor = %actor, target = %target, kind = %kind))]
    pub fn react(
        &mut self,
        auth: &dyn Authorizer,
        actor: Name,
        target: MessageId,
        kind: ReactionKind,
    ) -> Result<ReactionOutcome, ActionError> {
        let coordinator = self.coordinator;
        self.run(|tx| coordinator.react(tx, auth, actor, target, kind))
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.db.message(id)
    }

    pub fn replies(&self, reply_to: MessageId) -> Vec<&Message> {
        self.db.replies(reply_to)
    }

    pub fn contributor(&self, name: Name) -> Option<&ContributorEntry> {
        self.db.contributor(name)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.db.snapshot()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Run one action as a transaction, re-validating the staged state before
    /// commit when invariant checking is enabled.
    fn run<T>(
        &mut self,
        action: impl FnOnce(&mut Transaction<'_>) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let verify = self.verify_invariants;
        self.db.transact(|tx| {
            let value = action(tx)?;
            if verify {
                let violations = tx.validate();
                if !violations.is_empty() {
                    error!(count = violations.len(), first = %violations[0], "ledger invariants violated, aborting");
                    return Err(StoreError::Inconsistent(violations).into());
                }
            }
            Ok(value)
        })
    }
}
