mod auth;
mod config;
mod coordinator;
mod error;
mod talk;

pub use auth::{Authorizer, Signers, require_auth};
pub use config::{EngineConfig, MissingTargetPolicy};
pub use coordinator::{ReactionCoordinator, ReactionOutcome};
pub use error::ActionError;
pub use talk::Talk;
