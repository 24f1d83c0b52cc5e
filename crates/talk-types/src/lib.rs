pub mod error;
pub mod message;
pub mod message_id;
pub mod name;
pub mod reaction;

pub use error::DomainError;
pub use message::{ContributorEntry, Message};
pub use message_id::MessageId;
pub use name::{MAX_NAME_LEN, Name};
pub use reaction::{ReactionKind, ReactionTally};
