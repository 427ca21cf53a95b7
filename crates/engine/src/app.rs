//! Application composition.

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::infrastructure::{
    clock::SystemClock,
    json_store::JsonFileStore,
    ports::{ClockPort, NoteSource, StateStore},
    vault::FsNoteSource,
};
use crate::logging::init_tracing;
use crate::use_cases::{SpellTracker, TrackerError};

/// Wired-up tracker with its production adapters.
pub struct App {
    pub config: TrackerConfig,
    pub tracker: SpellTracker,
}

impl App {
    /// Read configuration from the environment, set up logging and open the tracker.
    pub async fn from_env() -> Result<Self, TrackerError> {
        let config = TrackerConfig::from_env();
        init_tracing(&config.log_filter);
        Self::bootstrap(config).await
    }

    pub async fn bootstrap(config: TrackerConfig) -> Result<Self, TrackerError> {
        let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&config.data_file));
        let notes: Arc<dyn NoteSource> = Arc::new(FsNoteSource::new(&config.vault_root));
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        tracing::info!(
            data_file = %config.data_file.display(),
            vault_root = %config.vault_root.display(),
            auto_reset = %config.auto_reset,
            "Opening spell tracker"
        );
        let tracker = SpellTracker::open(store, notes, clock, config.auto_reset).await?;

        Ok(Self { config, tracker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelltracker_domain::{AutoResetPolicy, LevelFilter};

    #[tokio::test]
    async fn bootstrap_scans_vault_and_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let vault = dir.path().join("vault");
        tokio::fs::create_dir_all(vault.join("Spells/1")).await.unwrap();
        tokio::fs::create_dir_all(vault.join("Items")).await.unwrap();
        tokio::fs::write(
            vault.join("Spells/1/Magic Missile.md"),
            "---\nlevel: 1\n---\nA school of evocation, force dart.\n\nThree darts.",
        )
        .await
        .unwrap();
        tokio::fs::write(vault.join("Items/Pearl of Power.md"), "#1_spellSlot_2")
            .await
            .unwrap();

        let config = TrackerConfig {
            data_file: dir.path().join("state/tracker.json"),
            vault_root: vault,
            auto_reset: AutoResetPolicy::Manual,
            ..TrackerConfig::default()
        };

        let mut app = App::bootstrap(config.clone()).await.unwrap();
        app.tracker.set_level(3).await;
        app.tracker
            .set_spell_folder(1, Some("Spells/1".into()))
            .await
            .unwrap();
        app.tracker.set_bonus_folder(Some("Items".into())).await;
        assert_eq!(app.tracker.scan_spell_folders().await.imported, 1);
        app.tracker.scan_bonus_folder().await.unwrap();

        let missile = app.tracker.state().roster().unknown()[0].id();
        let known = app.tracker.learn_spell(missile).await.unwrap();
        app.tracker.toggle_preparation(known).await.unwrap();

        let reopened = App::bootstrap(config).await.unwrap();
        let state = reopened.tracker.state();
        assert_eq!(state.profile().level.value(), 3);
        assert_eq!(state.slots().total(2), 3);
        assert_eq!(state.prepared_count(LevelFilter::Leveled), 1);
        let spell = state.roster().find_known_by_name("magic missile").unwrap();
        assert_eq!(spell.school(), Some("Evocation"));
        assert_eq!(spell.path(), Some("Spells/1/Magic Missile.md"));
    }
}
