//! Environment-driven configuration.

use std::path::PathBuf;

use spelltracker_domain::AutoResetPolicy;

pub const DEFAULT_DATA_FILE: &str = "spell-tracker.json";
pub const DEFAULT_LOG_FILTER: &str = "spelltracker_engine=info,spelltracker_domain=info";

/// Where tracker state lives and how it behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// JSON file holding the saved state
    pub data_file: PathBuf,
    /// Root that note folders are resolved against
    pub vault_root: PathBuf,
    pub auto_reset: AutoResetPolicy,
    /// Filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            vault_root: PathBuf::from("."),
            auto_reset: AutoResetPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Read `SPELLTRACKER_*` variables, after loading `.env.local` / `.env`
    /// from the repo root.
    pub fn from_env() -> Self {
        load_dotenv_from_repo_root();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let auto_reset = match var("SPELLTRACKER_AUTO_RESET") {
            Some(raw) => raw.parse::<AutoResetPolicy>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    fallback = %defaults.auto_reset,
                    "Unrecognised SPELLTRACKER_AUTO_RESET, using default"
                );
                defaults.auto_reset
            }),
            None => defaults.auto_reset,
        };

        Self {
            data_file: var("SPELLTRACKER_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            vault_root: var("SPELLTRACKER_VAULT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.vault_root),
            auto_reset,
            log_filter: var("SPELLTRACKER_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
