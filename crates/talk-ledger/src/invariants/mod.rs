//! Cross-table invariant checking.
//!
//! Nothing in storage ties a message's tally to the contributor entries that
//! produced it; the reaction protocol maintains that link procedurally. This
//! module recomputes it from scratch so callers can confirm it held.
//!
//! Invariants are grouped into two sub-modules:
//! - [`tally`]: every counter equals the number of contributors holding that
//!   reaction, and no contributor holds a reaction on a missing message.
//! - [`threading`]: no row uses the reserved id 0, and every reply names
//!   another message that exists.
//!
//! Each sub-module exposes `check(&State, &mut Vec<LedgerViolation>)` and is
//! read-only over state.

mod tally;
mod threading;

use crate::database::State;
use crate::error::LedgerViolation;

/// Batch-validate the whole state, returning every detected violation.
///
/// O(messages + total reactions). An empty state is valid.
pub fn validate_state(state: &State) -> Vec<LedgerViolation> {
    let mut violations = Vec::new();
    tally::check(state, &mut violations);
    threading::check(state, &mut violations);
    violations
}
