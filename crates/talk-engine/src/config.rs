use std::num::NonZeroU64;

use serde::Deserialize;
use talk_ledger::{AUTO_ID_FLOOR, Database};

use crate::coordinator::ReactionCoordinator;
use crate::talk::Talk;

/// What a reaction aimed at a message that does not exist does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    /// Succeed without touching state.
    #[default]
    Ignore,
    /// Fail with `NotFound`.
    Reject,
}

const DEFAULT_AUTO_ID_FLOOR: NonZeroU64 = match NonZeroU64::new(AUTO_ID_FLOOR) {
    Some(floor) => floor,
    None => panic!("auto id floor must be non-zero"),
};

/// Engine settings. The auto id floor is non-zero: id 0 is the auto-assign
/// sentinel and must itself fall below the floor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub(crate) auto_id_floor: NonZeroU64,
    pub(crate) missing_target: MissingTargetPolicy,
    pub(crate) verify_invariants: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_id_floor: DEFAULT_AUTO_ID_FLOOR,
            missing_target: MissingTargetPolicy::Ignore,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn auto_id_floor(mut self, floor: NonZeroU64) -> Self {
        self.auto_id_floor = floor;
        self
    }

    pub fn missing_target(mut self, policy: MissingTargetPolicy) -> Self {
        self.missing_target = policy;
        self
    }

    /// Re-check the tally-ledger invariants before every commit.
    pub fn verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    pub fn build(&self) -> Talk {
        self.build_with(Database::with_auto_id_floor(self.auto_id_floor.get()))
    }

    pub(crate) fn build_with(&self, db: Database) -> Talk {
        Talk::from_parts(
            db,
            ReactionCoordinator::new(self.missing_target),
            self.verify_invariants,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_overrides_only_given_fields() {
        let config = EngineConfig::from_json(r#"{ "missing_target": "reject" }"#).unwrap();
        assert_eq!(config.missing_target, MissingTargetPolicy::Reject);
        assert_eq!(config.auto_id_floor.get(), AUTO_ID_FLOOR);
        assert_eq!(config.verify_invariants, cfg!(debug_assertions));
    }

    #[test]
    fn zero_auto_id_floor_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "auto_id_floor": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "auto_id_floor": 1 }"#).is_ok());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "missing_target": "explode" }"#).is_err());
    }

    #[test]
    fn builder_setters() {
        let floor = NonZeroU64::new(100).unwrap();
        let config = EngineConfig::default()
            .auto_id_floor(floor)
            .missing_target(MissingTargetPolicy::Reject)
            .verify_invariants(true);
        assert_eq!(
            config,
            EngineConfig {
                auto_id_floor: floor,
                missing_target: MissingTargetPolicy::Reject,
                verify_invariants: true,
            }
        );
    }
}
