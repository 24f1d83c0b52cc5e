//! Persistence for the talk ledger: the message and contributor tables, the
//! transaction boundary that stages and commits them, snapshots for external
//! readers, and the tally-ledger invariant checker.

mod contributor_ledger;
mod database;
mod error;
mod invariants;
mod message_store;
mod snapshot;
mod table;

pub use contributor_ledger::{ContributorLedger, ContributorTable};
pub use database::{Database, State, Transaction};
pub use error::{LedgerViolation, StoreError};
pub use invariants::validate_state;
pub use message_store::{AUTO_ID_FLOOR, MessageStore, MessageTable, TallyDelta};
pub use snapshot::{Snapshot, StateDigest};
pub use table::{Row, Table};
