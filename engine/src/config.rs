//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cohort_types::{Address, PoolSplit, TokenAmount};
use cohort_utils::LogFormat;

use crate::allocation::SplitPolicy;
use crate::EngineError;

/// Upper bound on `max_participants`.
pub const MAX_PARTICIPANTS_LIMIT: u32 = 1_000;

/// Most decimal places a token may declare.
pub const MAX_DECIMALS: u32 = 18;

/// Configuration for the allocation engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Only `admin` has no default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Registry administrator; may act on every proposal.
    pub admin: Address,

    /// Quorum: participant count (proposer included) that unlocks deployment.
    #[serde(default = "default_min_participants")]
    pub min_participants: u32,

    /// Hard cap on participants per proposal, proposer included.
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,

    /// Total token supply in smallest units.
    #[serde(default = "default_total_supply")]
    pub total_supply: u64,

    /// Decimal places of the deployed token.
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Recipient of the verifier pool.
    #[serde(default)]
    pub verifier: Option<Address>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Supply split across the four pools.
    #[serde(default)]
    pub pools: PoolSplit,

    /// How the participant pool is divided.
    #[serde(default)]
    pub split: SplitPolicy,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_participants() -> u32 {
    10
}

fn default_max_participants() -> u32 {
    50
}

fn default_total_supply() -> u64 {
    // 1,000,000,000 tokens with 8 decimals
    100_000_000_000_000_000
}

fn default_decimals() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Reference configuration administered by `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            min_participants: default_min_participants(),
            max_participants: default_max_participants(),
            total_supply: default_total_supply(),
            decimals: default_decimals(),
            verifier: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            pools: PoolSplit::reference(),
            split: SplitPolicy::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn total_supply(&self) -> TokenAmount {
        TokenAmount::new(u128::from(self.total_supply))
    }

    /// Structural checks run once, before the engine accepts any call.
    ///
    /// Pool and split problems are reported as
    /// [`EngineError::InvalidAllocation`]; everything else as
    /// [`EngineError::Config`].
    pub fn validate(&self) -> Result<(), EngineError> {
        self.admin
            .validate()
            .map_err(|e| EngineError::Config(format!("admin: {e}")))?;
        if let Some(verifier) = &self.verifier {
            verifier
                .validate()
                .map_err(|e| EngineError::Config(format!("verifier: {e}")))?;
        }
        if self.min_participants < 2 {
            return Err(EngineError::Config(format!(
                "min_participants must be at least 2, got {}",
                self.min_participants
            )));
        }
        if self.max_participants < self.min_participants {
            return Err(EngineError::Config(format!(
                "max_participants ({}) is below min_participants ({})",
                self.max_participants, self.min_participants
            )));
        }
        if self.max_participants > MAX_PARTICIPANTS_LIMIT {
            return Err(EngineError::Config(format!(
                "max_participants ({}) exceeds the limit of {MAX_PARTICIPANTS_LIMIT}",
                self.max_participants
            )));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(EngineError::Config(format!(
                "decimals ({}) exceeds {MAX_DECIMALS}",
                self.decimals
            )));
        }

        self.pools
            .validate()
            .map_err(|e| EngineError::InvalidAllocation(e.to_string()))?;
        // the proposer never shares the participant pool
        self.split
            .validate(self.max_participants - 1)
            .map_err(EngineError::InvalidAllocation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::new(Address::new(ADMIN));
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(&format!("admin = \"{ADMIN}\""))
            .expect("admin alone is enough");
        assert_eq!(config.min_participants, 10);
        assert_eq!(config.max_participants, 50);
        assert_eq!(config.total_supply, 100_000_000_000_000_000);
        assert_eq!(config.pools, PoolSplit::reference());
        assert_eq!(config.split, SplitPolicy::Equal);
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn admin_is_required() {
        let err = EngineConfig::from_toml_str("min_participants = 3").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = format!(
            r#"
            admin = "{ADMIN}"
            min_participants = 3
            log_format = "json"

            [pools]
            founder_bp = 4000
            participants_bp = 4000

            [split]
            policy = "verified_weighted"
            verified_weight = 2
            unverified_weight = 1
        "#
        );
        let config = EngineConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.min_participants, 3);
        assert_eq!(config.pools.founder_bp, 4000);
        assert_eq!(config.pools.treasury_bp, 1500);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.split,
            SplitPolicy::VerifiedWeighted {
                verified_weight: 2,
                unverified_weight: 1
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pools_not_summing_to_10000_are_fatal() {
        let mut config = EngineConfig::new(Address::new(ADMIN));
        config.pools.verifier_bp = 600;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidAllocation(_)));
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn quorum_bounds_are_checked() {
        let mut config = EngineConfig::new(Address::new(ADMIN));
        config.min_participants = 1;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        config.min_participants = 20;
        config.max_participants = 10;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        config.min_participants = 2;
        config.max_participants = MAX_PARTICIPANTS_LIMIT + 1;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn malformed_admin_is_rejected() {
        let config = EngineConfig::new(Address::new("not an address"));
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn skewed_split_policy_is_fatal() {
        let mut config = EngineConfig::new(Address::new(ADMIN));
        config.split = SplitPolicy::VerifiedWeighted {
            verified_weight: 500,
            unverified_weight: 1,
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidAllocation(_))
        ));
    }
}
