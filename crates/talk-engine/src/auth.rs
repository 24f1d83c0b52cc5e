use std::collections::BTreeSet;

use talk_types::Name;
use tracing::warn;

use crate::error::ActionError;

/// The host's answer to "does this call carry `actor`'s authority?".
pub trait Authorizer {
    fn has_auth(&self, actor: Name) -> bool;
}

/// Fail with [`ActionError::Unauthorized`] unless `auth` vouches for `actor`.
pub fn require_auth(auth: &dyn Authorizer, actor: Name) -> Result<(), ActionError> {
    if auth.has_auth(actor) {
        return Ok(());
    }
    warn!(%actor, "missing authority");
    Err(ActionError::Unauthorized { actor })
}

/// The identities whose signatures accompany a call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signers(BTreeSet<Name>);

impl Signers {
    pub fn new(names: impl IntoIterator<Item = Name>) -> Self {
        Self(names.into_iter().collect())
    }

    pub fn single(name: Name) -> Self {
        Self::new([name])
    }
}

impl Authorizer for Signers {
    fn has_auth(&self, actor: Name) -> bool {
        self.0.contains(&actor)
    }
}
