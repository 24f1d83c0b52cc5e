use talk_types::{ContributorEntry, Name};
use tracing::debug;

use crate::table::Table;

pub type ContributorTable = Table<ContributorEntry>;

/// Transaction-scoped handle on the contributor table.
///
/// Entries are handed out by value; changes made through
/// [`ContributorEntry::set_reaction`] become part of the table only once the
/// entry is passed back to [`save`](Self::save).
pub struct ContributorLedger<'tx> {
    table: &'tx mut ContributorTable,
}

impl<'tx> ContributorLedger<'tx> {
    pub(crate) fn new(table: &'tx mut ContributorTable) -> Self {
        Self { table }
    }

    /// The entry for `name`, creating an empty one on first sight.
    pub fn get_or_create(&mut self, name: Name) -> ContributorEntry {
        if let Some(entry) = self.table.find(&name) {
            return entry.clone();
        }
        let entry = ContributorEntry::new(name);
        self.table.try_insert(entry.clone());
        debug!(contributor = %name, "contributor created");
        entry
    }

    pub fn find(&self, name: Name) -> Option<&ContributorEntry> {
        self.table.find(&name)
    }

    /// Write `entry` back, replacing whatever the table holds for its name.
    pub fn save(&mut self, entry: ContributorEntry) {
        self.table.upsert(entry);
    }
}

#[cfg(test)]
mod tests {
    use talk_types::{MessageId, ReactionKind};

    use super::*;

    fn user(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn get_or_create_returns_existing_entry() {
        let mut table = ContributorTable::default();
        let mut ledger = ContributorLedger::new(&mut table);

        let mut entry = ledger.get_or_create(user("bob"));
        assert!(entry.is_empty());
        entry.set_reaction(MessageId::new(1), ReactionKind::Meh);
        ledger.save(entry);

        let again = ledger.get_or_create(user("bob"));
        assert_eq!(again.current_reaction(MessageId::new(1)), Some(ReactionKind::Meh));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unsaved_changes_are_not_visible() {
        let mut table = ContributorTable::default();
        let mut ledger = ContributorLedger::new(&mut table);

        let mut entry = ledger.get_or_create(user("carol"));
        entry.set_reaction(MessageId::new(2), ReactionKind::ThumbsUp);

        let stored = ledger.find(user("carol")).unwrap();
        assert_eq!(stored.current_reaction(MessageId::new(2)), None);
    }
}
