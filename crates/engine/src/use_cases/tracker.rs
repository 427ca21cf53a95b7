//! Spell tracker use case.
//!
//! Owns the spellcaster state for one session. Every mutation goes to the
//! aggregate first, then the whole state is persisted. Persistence is
//! fire-and-forget: a failed save is logged and the in-memory change stands.

use std::collections::HashSet;
use std::sync::Arc;

use spelltracker_domain::{
    AutoResetPolicy, BonusPreparedSpell, BonusSlot, CastOutcome, CharacterClass, CharacterLevel,
    CharacterName, DomainError, ExtraSpellUse, PreparationChange, ProfileChange, RecoveryOutcome,
    RestOutcome, SlotEntry, Spell, SpellBonuses, SpellId, Spellcaster,
};

use crate::infrastructure::importers::{parse_bonus_note, parse_spell_note};
use crate::infrastructure::ports::{ClockPort, ImportError, NoteSource, StateStore, StoreError};

/// Result of a folder scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Notes that produced a roster entry or bonus
    pub imported: usize,
    /// Notes that were malformed, unreadable or added nothing new
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Import error: {0}")]
    Import(#[from] ImportError),
    #[error("No {0} configured")]
    NotConfigured(&'static str),
}

impl TrackerError {
    /// A rejected action the user should see as a notice, not a failure.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_capacity_exceeded())
    }
}

/// Spell tracking operations.
pub struct SpellTracker {
    state: Spellcaster,
    store: Arc<dyn StateStore>,
    notes: Arc<dyn NoteSource>,
    clock: Arc<dyn ClockPort>,
    auto_reset: AutoResetPolicy,
}

impl SpellTracker {
    /// Load the saved state (or start fresh) and apply the auto-reset policy.
    pub async fn open(
        store: Arc<dyn StateStore>,
        notes: Arc<dyn NoteSource>,
        clock: Arc<dyn ClockPort>,
        auto_reset: AutoResetPolicy,
    ) -> Result<Self, TrackerError> {
        let state = match store.load().await? {
            Some(state) => state,
            None => {
                tracing::info!("No saved tracker state, starting fresh");
                Spellcaster::default()
            }
        };
        let dropped = state.roster().duplicates_dropped();
        if dropped > 0 {
            tracing::warn!(dropped, "Saved roster repeated spell names, kept the first of each");
        }

        let mut tracker = Self {
            state,
            store,
            notes,
            clock,
            auto_reset,
        };

        let now = tracker.clock.now();
        if tracker.state.needs_auto_reset(auto_reset, now) {
            let outcome = tracker.state.long_rest(now);
            tracing::info!(
                policy = %auto_reset,
                slots_restored = outcome.slots_restored,
                extra_uses_restored = outcome.extra_uses_restored,
                "Auto-reset applied"
            );
            tracker.persist().await;
        }

        Ok(tracker)
    }

    pub fn state(&self) -> &Spellcaster {
        &self.state
    }

    pub fn auto_reset(&self) -> AutoResetPolicy {
        self.auto_reset
    }

    pub fn set_auto_reset(&mut self, policy: AutoResetPolicy) {
        self.auto_reset = policy;
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.state).await {
            tracing::warn!(error = %e, "Failed to persist tracker state");
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn set_name(&mut self, name: CharacterName) {
        self.state.set_name(name);
        self.persist().await;
    }

    pub async fn set_subclass(&mut self, subclass: impl Into<String>) {
        self.state.set_subclass(subclass);
        self.persist().await;
    }

    /// Set the character level, clamped to 1-20.
    pub async fn set_level(&mut self, level: i32) -> ProfileChange {
        let change = self.state.set_level(CharacterLevel::clamped(level));
        tracing::info!(
            from = %change.previous_level,
            to = %change.level,
            "Character level changed"
        );
        self.persist().await;
        change
    }

    pub async fn set_class(&mut self, class: CharacterClass) -> ProfileChange {
        let change = self.state.set_class(class);
        tracing::info!(from = %change.previous_class, to = %change.class, "Character class changed");
        self.persist().await;
        change
    }

    pub async fn set_intelligence_modifier(&mut self, modifier: i32) {
        self.state.set_intelligence_modifier(modifier);
        self.persist().await;
    }

    // =========================================================================
    // Slots, casting and rests
    // =========================================================================

    pub async fn use_slot(&mut self, level: u8) -> Result<SlotEntry, TrackerError> {
        let entry = self.state.use_slot(level)?;
        tracing::info!(
            spell_level = level,
            used = entry.used,
            total = entry.total,
            "Spell slot used"
        );
        self.persist().await;
        Ok(entry)
    }

    pub async fn restore_slot(&mut self, level: u8) -> Result<SlotEntry, TrackerError> {
        let entry = self.state.restore_slot(level)?;
        tracing::info!(spell_level = level, used = entry.used, "Spell slot restored");
        self.persist().await;
        Ok(entry)
    }

    /// Cast a known spell. `NoSlotsAvailable` is an outcome, not an error.
    pub async fn cast(&mut self, spell_id: SpellId) -> Result<CastOutcome, TrackerError> {
        let outcome = self.state.cast(spell_id)?;
        if outcome.succeeded() {
            tracing::info!(spell_id = %spell_id, outcome = ?outcome, "Spell cast");
            self.persist().await;
        } else {
            tracing::info!(spell_id = %spell_id, "No spell slots available");
        }
        Ok(outcome)
    }

    pub async fn long_rest(&mut self) -> RestOutcome {
        let outcome = self.state.long_rest(self.clock.now());
        tracing::info!(
            slots_restored = outcome.slots_restored,
            extra_uses_restored = outcome.extra_uses_restored,
            "Long rest taken"
        );
        self.persist().await;
        outcome
    }

    pub async fn arcane_recovery(&mut self) -> Result<RecoveryOutcome, TrackerError> {
        let outcome = self.state.arcane_recovery()?;
        tracing::info!(recovered = outcome.total(), "Arcane Recovery used");
        self.persist().await;
        Ok(outcome)
    }

    // =========================================================================
    // Rosters and preparation
    // =========================================================================

    pub async fn add_known_spell(&mut self, spell: Spell) -> Result<SpellId, TrackerError> {
        let id = self.state.add_known_spell(spell)?;
        self.persist().await;
        Ok(id)
    }

    pub async fn add_unknown_spell(&mut self, spell: Spell) -> Result<SpellId, TrackerError> {
        let id = self.state.add_unknown_spell(spell)?;
        self.persist().await;
        Ok(id)
    }

    pub async fn learn_spell(&mut self, id: SpellId) -> Result<SpellId, TrackerError> {
        let id = self.state.learn_spell(id)?;
        tracing::info!(spell_id = %id, "Spell learned");
        self.persist().await;
        Ok(id)
    }

    pub async fn forget_spell(&mut self, id: SpellId) -> Result<SpellId, TrackerError> {
        let new_id = self.state.forget_spell(id)?;
        tracing::info!(spell_id = %id, new_id = %new_id, "Spell moved to unknown");
        self.persist().await;
        Ok(new_id)
    }

    pub async fn remove_known_spell(&mut self, id: SpellId) -> Result<Spell, TrackerError> {
        let spell = self.state.remove_known_spell(id)?;
        self.persist().await;
        Ok(spell)
    }

    pub async fn remove_unknown_spell(&mut self, id: SpellId) -> Result<Spell, TrackerError> {
        let spell = self.state.remove_unknown_spell(id)?;
        self.persist().await;
        Ok(spell)
    }

    pub async fn toggle_preparation(
        &mut self,
        id: SpellId,
    ) -> Result<PreparationChange, TrackerError> {
        let change = match self.state.toggle_preparation(id) {
            Ok(change) => change,
            Err(e) => {
                if e.is_capacity_exceeded() {
                    tracing::info!(spell_id = %id, reason = %e, "Preparation rejected");
                }
                return Err(e.into());
            }
        };
        tracing::info!(spell_id = %id, change = ?change, "Preparation toggled");
        self.persist().await;
        Ok(change)
    }

    // =========================================================================
    // Bonuses
    // =========================================================================

    pub async fn add_bonus_slot(&mut self, bonus: BonusSlot) {
        tracing::info!(
            spell_level = bonus.spell_level(),
            amount = bonus.amount(),
            source = %bonus.source(),
            "Bonus slot added"
        );
        self.state.add_bonus_slot(bonus);
        self.persist().await;
    }

    pub async fn remove_bonus_slot(&mut self, position: usize) -> Result<BonusSlot, TrackerError> {
        let removed = self.state.remove_bonus_slot(position)?;
        self.persist().await;
        Ok(removed)
    }

    pub async fn add_extra_use(&mut self, entry: ExtraSpellUse) {
        tracing::info!(
            spell = %entry.spell_name(),
            uses = entry.uses(),
            source = %entry.source(),
            "Extra spell use added"
        );
        self.state.add_extra_use(entry);
        self.persist().await;
    }

    pub async fn remove_extra_use(
        &mut self,
        spell_name: &str,
        source: &str,
    ) -> Result<ExtraSpellUse, TrackerError> {
        let removed = self.state.remove_extra_use(spell_name, source)?;
        self.persist().await;
        Ok(removed)
    }

    pub async fn add_bonus_prepared_spell(
        &mut self,
        bonus: BonusPreparedSpell,
    ) -> Result<(), TrackerError> {
        self.state.add_bonus_prepared_spell(bonus)?;
        self.persist().await;
        Ok(())
    }

    pub async fn remove_bonus_prepared_spell(
        &mut self,
        spell_name: &str,
        source: &str,
    ) -> Result<BonusPreparedSpell, TrackerError> {
        let removed = self.state.remove_bonus_prepared_spell(spell_name, source)?;
        self.persist().await;
        Ok(removed)
    }

    pub async fn add_spell_bonuses(&mut self, bonuses: SpellBonuses) {
        self.state.add_spell_bonuses(bonuses);
        self.persist().await;
    }

    pub async fn remove_spell_bonuses(
        &mut self,
        position: usize,
    ) -> Result<SpellBonuses, TrackerError> {
        let removed = self.state.remove_spell_bonuses(position)?;
        self.persist().await;
        Ok(removed)
    }

    // =========================================================================
    // Tasks and folders
    // =========================================================================

    pub async fn add_task(&mut self, text: impl Into<String>) -> Result<(), TrackerError> {
        self.state.add_task(text)?;
        self.persist().await;
        Ok(())
    }

    pub async fn toggle_task(&mut self, index: usize) -> Result<bool, TrackerError> {
        let completed = self.state.toggle_task(index)?;
        self.persist().await;
        Ok(completed)
    }

    pub async fn remove_task(&mut self, index: usize) -> Result<(), TrackerError> {
        self.state.remove_task(index)?;
        self.persist().await;
        Ok(())
    }

    pub async fn set_spell_folder(
        &mut self,
        spell_level: u8,
        folder: Option<String>,
    ) -> Result<(), TrackerError> {
        self.state.set_spell_folder(spell_level, folder)?;
        self.persist().await;
        Ok(())
    }

    pub async fn set_bonus_folder(&mut self, folder: Option<String>) {
        self.state.set_bonus_folder(folder);
        self.persist().await;
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Rebuild the unknown roster from every configured spell folder.
    ///
    /// Folders that cannot be listed are skipped with a warning.
    pub async fn scan_spell_folders(&mut self) -> ImportSummary {
        let folders = self.state.spell_folders().clone();
        let mut spells = Vec::new();
        let mut malformed = 0;

        for (level, folder) in folders.iter().enumerate() {
            let Some(folder) = folder else {
                continue;
            };
            let notes = match self.notes.list_notes(folder).await {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::warn!(folder = %folder, error = %e, "Skipping spell folder");
                    continue;
                }
            };
            for note in &notes {
                match parse_spell_note(note, level as u8) {
                    Ok(spell) => spells.push(spell),
                    Err(reason) => {
                        malformed += 1;
                        tracing::debug!(path = %note.path, reason = %reason, "Skipped spell note");
                    }
                }
            }
        }

        let parsed = spells.len();
        let imported = self.state.replace_unknown_spells(spells);
        let summary = ImportSummary {
            imported,
            skipped: malformed + (parsed - imported),
        };
        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Spell folders scanned"
        );
        self.persist().await;
        summary
    }

    /// Re-read the bonus folder.
    ///
    /// Each note's previous contribution is replaced, and contributions from
    /// notes that are gone are dropped. Manual entries are never touched.
    pub async fn scan_bonus_folder(&mut self) -> Result<ImportSummary, TrackerError> {
        let folder = self
            .state
            .bonus_folder()
            .map(str::to_string)
            .ok_or(TrackerError::NotConfigured("bonus folder"))?;
        let notes = self.notes.list_notes(&folder).await?;

        let mut summary = ImportSummary::default();
        for note in &notes {
            if note.content.is_none() {
                summary.skipped += 1;
                tracing::debug!(path = %note.path, "Unreadable bonus note kept as before");
                continue;
            }
            let outcome = self.state.apply_scan(&note.path, parse_bonus_note(note));
            if outcome.is_empty() {
                summary.skipped += 1;
            } else {
                summary.imported += 1;
            }
        }

        let present: HashSet<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        self.state
            .retain_scanned_files(&|file: &str| present.contains(file));

        tracing::info!(
            folder = %folder,
            imported = summary.imported,
            skipped = summary.skipped,
            "Bonus folder scanned"
        );
        self.persist().await;
        Ok(summary)
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Discard all tracker data.
    pub async fn reset(&mut self) {
        self.state.reset();
        tracing::info!("Tracker data reset");
        self.persist().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockClockPort, MockNoteSource, MockStateStore, NoteFile};
    use chrono::{DateTime, TimeZone, Utc};
    use spelltracker_domain::{EntryOrigin, LevelFilter, SpellLevel, SpellName};
    use std::sync::Mutex;

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
    }

    fn clock(day: u32) -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(noon(day)))
    }

    fn saving_store(initial: Option<Spellcaster>) -> (Arc<MockStateStore>, Arc<Mutex<usize>>) {
        let saves = Arc::new(Mutex::new(0));
        let counter = saves.clone();
        let mut store = MockStateStore::new();
        store
            .expect_load()
            .returning(move || Ok(initial.clone()));
        store.expect_save().returning(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });
        (Arc::new(store), saves)
    }

    fn no_notes() -> Arc<MockNoteSource> {
        Arc::new(MockNoteSource::new())
    }

    fn spell(name: &str, level: u8) -> Spell {
        Spell::new(
            SpellName::new(name).unwrap(),
            SpellLevel::try_from(level).unwrap(),
        )
    }

    fn note(path: &str, content: &str) -> NoteFile {
        let name = path
            .rsplit('/')
            .next()
            .unwrap()
            .trim_end_matches(".md")
            .to_string();
        NoteFile::new(path, name, Some(content.to_string()))
    }

    fn wizard(level: u8, int_mod: i32) -> Spellcaster {
        let mut state = Spellcaster::default();
        state.set_level(CharacterLevel::new(level).unwrap());
        state.set_intelligence_modifier(int_mod);
        state
    }

    #[tokio::test]
    async fn open_without_saved_state_starts_fresh() {
        let (store, saves) = saving_store(None);
        let tracker = SpellTracker::open(store, no_notes(), clock(1), AutoResetPolicy::LongRest)
            .await
            .unwrap();
        assert_eq!(tracker.state(), &Spellcaster::default());
        assert_eq!(*saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn daily_policy_resets_on_a_new_day() {
        let mut saved = wizard(5, 3);
        saved.long_rest(noon(1));
        saved.use_slot(1).unwrap();

        let (store, saves) = saving_store(Some(saved.clone()));
        let tracker = SpellTracker::open(store, no_notes(), clock(1), AutoResetPolicy::Daily)
            .await
            .unwrap();
        assert_eq!(tracker.state().slots().used(1), 1);
        assert_eq!(*saves.lock().unwrap(), 0);

        let (store, saves) = saving_store(Some(saved));
        let tracker = SpellTracker::open(store, no_notes(), clock(2), AutoResetPolicy::Daily)
            .await
            .unwrap();
        assert_eq!(tracker.state().slots().used(1), 0);
        assert_eq!(tracker.state().last_long_rest(), Some(noon(2)));
        assert_eq!(*saves.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn open_keeps_first_of_duplicate_saved_names() {
        let saved: Spellcaster = serde_json::from_str(
            r#"{"roster":{"known":[
                {"id":"7d3c1f0e-1111-4a5b-9c6d-000000000001","name":"Shield","level":1},
                {"id":"7d3c1f0e-1111-4a5b-9c6d-000000000002","name":"shield","level":1}
            ]}}"#,
        )
        .unwrap();
        let (store, _) = saving_store(Some(saved));
        let tracker = SpellTracker::open(store, no_notes(), clock(1), AutoResetPolicy::LongRest)
            .await
            .unwrap();
        assert_eq!(tracker.state().roster().known().len(), 1);
        assert_eq!(tracker.state().roster().duplicates_dropped(), 1);
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let mut store = MockStateStore::new();
        store
            .expect_load()
            .returning(|| Err(StoreError::serialization("bad json")));
        let result = SpellTracker::open(
            Arc::new(store),
            no_notes(),
            clock(1),
            AutoResetPolicy::LongRest,
        )
        .await;
        assert!(matches!(result, Err(TrackerError::Store(_))));
    }

    #[tokio::test]
    async fn save_failure_keeps_the_mutation() {
        let mut store = MockStateStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(StoreError::io("save", "disk full")));
        let mut tracker = SpellTracker::open(
            Arc::new(store),
            no_notes(),
            clock(1),
            AutoResetPolicy::Manual,
        )
        .await
        .unwrap();

        let entry = tracker.use_slot(1).await.unwrap();
        assert_eq!(entry.used, 1);
        assert_eq!(tracker.state().slots().used(1), 1);
    }

    #[tokio::test]
    async fn rejected_actions_do_not_persist() {
        let mut store = MockStateStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some(wizard(1, 0))));
        store.expect_save().times(2).returning(|_| Ok(()));
        let mut tracker = SpellTracker::open(
            Arc::new(store),
            no_notes(),
            clock(1),
            AutoResetPolicy::LongRest,
        )
        .await
        .unwrap();

        let shield = tracker.add_known_spell(spell("Shield", 1)).await.unwrap();
        let sleep = tracker.add_known_spell(spell("Sleep", 1)).await.unwrap();
        tracker.state.toggle_preparation(shield).unwrap();

        let err = tracker.toggle_preparation(sleep).await.unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert!(tracker.use_slot(12).await.is_err());
        assert!(tracker.cast(SpellId::new()).await.is_err());
        assert!(tracker.add_task("  ").await.is_err());
    }

    #[tokio::test]
    async fn cast_without_slots_is_an_outcome() {
        let (store, saves) = saving_store(Some(wizard(1, 0)));
        let mut tracker = SpellTracker::open(store, no_notes(), clock(1), AutoResetPolicy::LongRest)
            .await
            .unwrap();
        let shield = tracker.add_known_spell(spell("Shield", 1)).await.unwrap();

        assert_eq!(
            tracker.cast(shield).await.unwrap(),
            CastOutcome::UsedSlotAtLevel(1)
        );
        tracker.cast(shield).await.unwrap();
        let saves_before = *saves.lock().unwrap();
        assert_eq!(
            tracker.cast(shield).await.unwrap(),
            CastOutcome::NoSlotsAvailable
        );
        assert_eq!(*saves.lock().unwrap(), saves_before);

        let rest = tracker.long_rest().await;
        assert_eq!(rest.slots_restored, 2);
        assert_eq!(tracker.state().last_long_rest(), Some(noon(1)));
    }

    #[tokio::test]
    async fn long_rest_uses_clock_port() {
        let (store, _) = saving_store(None);
        let mut mock_clock = MockClockPort::new();
        mock_clock.expect_now().returning(|| noon(7));
        let mut tracker = SpellTracker::open(
            store,
            no_notes(),
            Arc::new(mock_clock),
            AutoResetPolicy::LongRest,
        )
        .await
        .unwrap();
        tracker.long_rest().await;
        assert_eq!(tracker.state().last_long_rest(), Some(noon(7)));
    }

    #[tokio::test]
    async fn scan_spell_folders_rebuilds_unknown_roster() {
        let (store, _) = saving_store(Some(wizard(5, 3)));
        let mut notes = MockNoteSource::new();
        notes.expect_list_notes().returning(|folder: &str| match folder {
            "Spells/Cantrips" => Ok(vec![note("Spells/Cantrips/Light.md", "school of evocation.")]),
            "Spells/3" => Ok(vec![
                note("Spells/3/Fireball.md", "A 3rd-level school of evocation, fire."),
                note("Spells/3/Shield.md", "Already known"),
                note("Spells/3/Broken.md", "level: eleventy"),
                NoteFile::new("Spells/3/Gone.md", "Gone", None),
            ]),
            other => Err(ImportError::InvalidFolder(other.into())),
        });

        let mut tracker = SpellTracker::open(
            store,
            Arc::new(notes),
            clock(1),
            AutoResetPolicy::LongRest,
        )
        .await
        .unwrap();
        tracker.add_known_spell(spell("Shield", 1)).await.unwrap();
        tracker
            .set_spell_folder(0, Some("Spells/Cantrips".into()))
            .await
            .unwrap();
        tracker
            .set_spell_folder(3, Some("Spells/3".into()))
            .await
            .unwrap();
        tracker
            .set_spell_folder(5, Some("Spells/Missing".into()))
            .await
            .unwrap();

        let summary = tracker.scan_spell_folders().await;
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 3
            }
        );

        let unknown = tracker.state().roster().unknown();
        let names: Vec<&str> = unknown.iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["Light", "Fireball"]);
        assert!(unknown[0].is_cantrip());
        assert_eq!(unknown[1].school(), Some("Evocation"));
        assert_eq!(unknown[1].level().as_number(), 3);
    }

    #[tokio::test]
    async fn scan_bonus_folder_is_idempotent_and_drops_vanished_notes() {
        let (store, _) = saving_store(Some(wizard(5, 3)));
        let listing = Arc::new(Mutex::new(vec![
            note("Bonuses/Ring.md", "#2_spellSlot_3 #1fireball"),
            note("Bonuses/Tome.md", "bonus-prepared-spells: 2"),
            note("Bonuses/Empty.md", "Nothing here"),
        ]));
        let current = listing.clone();
        let mut notes = MockNoteSource::new();
        notes
            .expect_list_notes()
            .returning(move |_folder: &str| Ok(current.lock().unwrap().clone()));

        let mut tracker = SpellTracker::open(
            store,
            Arc::new(notes),
            clock(1),
            AutoResetPolicy::LongRest,
        )
        .await
        .unwrap();

        assert!(matches!(
            tracker.scan_bonus_folder().await,
            Err(TrackerError::NotConfigured(_))
        ));

        tracker.set_bonus_folder(Some("Bonuses".into())).await;
        tracker
            .add_bonus_slot(BonusSlot::new(1, 1, "Pearl", EntryOrigin::Manual).unwrap())
            .await;

        let summary = tracker.scan_bonus_folder().await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 1
            }
        );
        let once = tracker.state().clone();
        tracker.scan_bonus_folder().await.unwrap();
        assert_eq!(tracker.state(), &once);

        assert_eq!(tracker.state().slots().total(3), 4);
        assert_eq!(tracker.state().extra_uses().remaining("Fireball"), 1);
        assert_eq!(tracker.state().max_prepared(), 10);

        listing.lock().unwrap().retain(|n| n.name != "Ring");
        tracker.scan_bonus_folder().await.unwrap();
        assert_eq!(tracker.state().slots().total(3), 2);
        assert_eq!(tracker.state().slots().total(1), 5);
        assert_eq!(tracker.state().extra_uses().remaining("Fireball"), 0);
        assert_eq!(tracker.state().prepared_count(LevelFilter::Leveled), 0);
    }

    #[tokio::test]
    async fn set_level_clamps_and_reset_restores_defaults() {
        let (store, _) = saving_store(None);
        let mut tracker = SpellTracker::open(store, no_notes(), clock(1), AutoResetPolicy::LongRest)
            .await
            .unwrap();

        let change = tracker.set_level(42).await;
        assert_eq!(change.level.value(), 20);
        assert_eq!(tracker.set_level(-3).await.level.value(), 1);

        tracker.add_task("Scribe scroll").await.unwrap();
        assert!(tracker.toggle_task(0).await.unwrap());
        tracker.reset().await;
        assert_eq!(tracker.state(), &Spellcaster::default());
    }
}
