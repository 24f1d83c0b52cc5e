use talk_types::{ContributorEntry, Message, MessageId, Name};
use tracing::debug;

use crate::contributor_ledger::{ContributorLedger, ContributorTable};
use crate::error::{LedgerViolation, StoreError};
use crate::invariants::validate_state;
use crate::message_store::{AUTO_ID_FLOOR, MessageStore, MessageTable};
use crate::snapshot::Snapshot;

/// Both tables. Cloned to stage a transaction.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub(crate) messages: MessageTable,
    pub(crate) contributors: ContributorTable,
}

/// Committed state plus the transaction boundary every mutating call runs in.
#[derive(Clone, Debug)]
pub struct Database {
    state: State,
    auto_id_floor: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self::with_auto_id_floor(AUTO_ID_FLOOR)
    }

    pub fn with_auto_id_floor(auto_id_floor: u64) -> Self {
        Self {
            state: State::default(),
            auto_id_floor,
        }
    }

    pub fn auto_id_floor(&self) -> u64 {
        self.auto_id_floor
    }

    /// Run `f` as one all-or-nothing unit.
    ///
    /// `f` works on a staged copy of the tables. The copy replaces the
    /// committed state only if `f` returns `Ok`; on `Err` every staged
    /// mutation is discarded.
    pub fn transact<T, E>(
        &mut self,
        f: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut staged = self.state.clone();
        let mut tx = Transaction {
            state: &mut staged,
            auto_id_floor: self.auto_id_floor,
        };
        match f(&mut tx) {
            Ok(value) => {
                self.state = staged;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                debug!("transaction rolled back");
                Err(err)
            }
        }
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.state.messages.find(id)
    }

    /// Replies to `reply_to` ordered by id; `MessageId::ROOT` lists thread roots.
    pub fn replies(&self, reply_to: MessageId) -> Vec<&Message> {
        self.state.messages.replies(reply_to)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.state.messages.iter()
    }

    pub fn contributor(&self, name: Name) -> Option<&ContributorEntry> {
        self.state.contributors.find(&name)
    }

    pub fn contributors(&self) -> impl Iterator<Item = &ContributorEntry> {
        self.state.contributors.iter()
    }

    /// Every cross-table invariant violation in the committed state.
    pub fn validate(&self) -> Vec<LedgerViolation> {
        validate_state(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            messages: self.state.messages.iter().cloned().collect(),
            contributors: self.state.contributors.iter().cloned().collect(),
        }
    }

    /// Rebuild a database from a snapshot.
    ///
    /// Rejects duplicate keys and any snapshot whose tallies, reactions or
    /// reply links violate the ledger invariants.
    pub fn restore(snapshot: Snapshot, auto_id_floor: u64) -> Result<Self, StoreError> {
        let mut state = State::default();
        for message in snapshot.messages {
            state.messages.insert_row(message)?;
        }
        for entry in snapshot.contributors {
            let name = entry.name;
            if !state.contributors.try_insert(entry) {
                return Err(StoreError::DuplicateContributor { name });
            }
        }

        let violations = validate_state(&state);
        if !violations.is_empty() {
            return Err(StoreError::Inconsistent(violations));
        }
        Ok(Self {
            state,
            auto_id_floor,
        })
    }
}

/// Staged view of the tables for the duration of one [`Database::transact`].
///
/// Table handles borrow from the transaction and cannot outlive it.
pub struct Transaction<'db> {
    state: &'db mut State,
    auto_id_floor: u64,
}

impl Transaction<'_> {
    pub fn messages(&mut self) -> MessageStore<'_> {
        MessageStore::new(&mut self.state.messages, self.auto_id_floor)
    }

    pub fn contributors(&mut self) -> ContributorLedger<'_> {
        ContributorLedger::new(&mut self.state.contributors)
    }

    /// Invariant violations in the staged state.
    pub fn validate(&self) -> Vec<LedgerViolation> {
        validate_state(&*self.state)
    }
}
