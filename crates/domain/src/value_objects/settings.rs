//! Tracker settings value objects
//!
//! Settings travel inside the persisted tracker blob, so they carry serde
//! derives and a forward-compatible `Unknown` fallback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Auto Reset Policy
// ============================================================================

/// When spell slots and extra uses are reset without an explicit long rest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AutoResetPolicy {
    /// Only the long rest action resets resources.
    #[default]
    LongRest,
    /// Reset on the first open of a new (UTC) day.
    Daily,
    /// Never reset automatically.
    Manual,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl AutoResetPolicy {
    /// Whether a reset is due at `now`, given the time of the last long rest.
    pub fn reset_due(&self, last_long_rest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match self {
            AutoResetPolicy::Daily => match last_long_rest {
                Some(last) => last.date_naive() < now.date_naive(),
                None => true,
            },
            AutoResetPolicy::LongRest | AutoResetPolicy::Manual | AutoResetPolicy::Unknown => {
                false
            }
        }
    }
}

impl std::fmt::Display for AutoResetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutoResetPolicy::LongRest => write!(f, "long-rest"),
            AutoResetPolicy::Daily => write!(f, "daily"),
            AutoResetPolicy::Manual => write!(f, "manual"),
            AutoResetPolicy::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for AutoResetPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long-rest" | "long_rest" | "longrest" => Ok(AutoResetPolicy::LongRest),
            "daily" => Ok(AutoResetPolicy::Daily),
            "manual" => Ok(AutoResetPolicy::Manual),
            _ => Err(()),
        }
    }
}
