//! Spellcaster aggregate - everything the tracker knows about one character
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: ledgers are only reachable through this aggregate
//! - **Single writer**: every mutation takes `&mut self`, no interior mutability
//! - **Domain events**: mutations return outcome types (`CastOutcome`, `RestOutcome`, ...)
//! - **Persisted whole**: the aggregate serializes to one camelCase JSON object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    daily_tasks, max_cantrips, max_prepared, BonusPreparedSpell, BonusPreparedStatus, BonusSlot,
    DailyTask, ExtraSpellUse, ExtraUseLedger, LevelFilter, PreparationLimits, SlotEntry,
    SlotLedger, Spell, SpellBonuses, SpellRoster, TaskChecklist,
};
use crate::error::DomainError;
use crate::events::{
    CastOutcome, PreparationChange, ProfileChange, RecoveryOutcome, RestOutcome, ScanOutcome,
};
use crate::game_systems::{resolve_cast, spellbook_capacity, CharacterClass};
use crate::ids::SpellId;
use crate::value_objects::{
    AutoResetPolicy, CharacterLevel, CharacterName, EntryOrigin, MAX_SPELL_LEVEL,
};

const DEFAULT_SUBCLASS: &str = "School of Evocation";

/// Class, level and spellcasting modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub class: CharacterClass,
    pub level: CharacterLevel,
    #[serde(default)]
    pub intelligence_modifier: i32,
}

/// Everything one note in the bonus folder grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteContribution {
    pub bonus_slots: Vec<BonusSlot>,
    pub extra_uses: Vec<ExtraSpellUse>,
    pub spell_bonuses: Option<SpellBonuses>,
}

impl NoteContribution {
    pub fn is_empty(&self) -> bool {
        self.bonus_slots.is_empty() && self.extra_uses.is_empty() && self.spell_bonuses.is_none()
    }
}

/// A character's spellcasting resources.
///
/// # Invariants
///
/// - Slot usage never exceeds effective capacity at any level
/// - A spell name is on at most one roster
/// - A bonus prepared spell is active exactly when its spell is prepared via that bonus
/// - Arcane Recovery is used at most once between long rests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spellcaster {
    name: CharacterName,
    subclass: String,
    profile: CharacterProfile,
    slots: SlotLedger,
    roster: SpellRoster,
    bonus_prepared_spells: Vec<BonusPreparedSpell>,
    spell_bonuses: Vec<SpellBonuses>,
    extra_uses: ExtraUseLedger,
    tasks: TaskChecklist,
    /// Folder to scan per spell level, index 0 is cantrips.
    spell_folders: [Option<String>; 10],
    bonus_folder: Option<String>,
    arcane_recovery_used: bool,
    last_long_rest: Option<DateTime<Utc>>,
}

impl Default for Spellcaster {
    fn default() -> Self {
        Self::new(CharacterName::default(), CharacterProfile::default())
    }
}

impl Spellcaster {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(name: CharacterName, profile: CharacterProfile) -> Self {
        Self {
            name,
            subclass: DEFAULT_SUBCLASS.to_string(),
            profile,
            slots: SlotLedger::for_character(profile.class, profile.level),
            roster: SpellRoster::new(),
            bonus_prepared_spells: Vec::new(),
            spell_bonuses: Vec::new(),
            extra_uses: ExtraUseLedger::new(),
            tasks: TaskChecklist::new(),
            spell_folders: Default::default(),
            bonus_folder: None,
            arcane_recovery_used: false,
            last_long_rest: None,
        }
    }

    // =========================================================================
    // Identity and profile
    // =========================================================================

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn set_name(&mut self, name: CharacterName) {
        self.name = name;
    }

    pub fn subclass(&self) -> &str {
        &self.subclass
    }

    pub fn set_subclass(&mut self, subclass: impl Into<String>) {
        self.subclass = subclass.into();
    }

    pub fn profile(&self) -> CharacterProfile {
        self.profile
    }

    /// Change level, rebuilding slot capacity. Spent slots stay spent where they still fit.
    pub fn set_level(&mut self, level: CharacterLevel) -> ProfileChange {
        let previous = self.profile;
        self.profile.level = level;
        self.slots.recompute(self.profile.class, level);
        self.profile_change(previous)
    }

    pub fn set_class(&mut self, class: CharacterClass) -> ProfileChange {
        let previous = self.profile;
        self.profile.class = class;
        self.slots.recompute(class, self.profile.level);
        self.profile_change(previous)
    }

    pub fn set_intelligence_modifier(&mut self, modifier: i32) {
        self.profile.intelligence_modifier = modifier;
    }

    fn profile_change(&self, previous: CharacterProfile) -> ProfileChange {
        ProfileChange {
            previous_level: previous.level,
            level: self.profile.level,
            previous_class: previous.class,
            class: self.profile.class,
        }
    }

    // =========================================================================
    // Ledger accessors
    // =========================================================================

    pub fn slots(&self) -> &SlotLedger {
        &self.slots
    }

    pub fn roster(&self) -> &SpellRoster {
        &self.roster
    }

    pub fn bonus_prepared_spells(&self) -> &[BonusPreparedSpell] {
        &self.bonus_prepared_spells
    }

    pub fn bonus_prepared_statuses(&self) -> Vec<BonusPreparedStatus> {
        self.roster.bonus_statuses(&self.bonus_prepared_spells)
    }

    pub fn spell_bonuses(&self) -> &[SpellBonuses] {
        &self.spell_bonuses
    }

    pub fn extra_uses(&self) -> &ExtraUseLedger {
        &self.extra_uses
    }

    pub fn arcane_recovery_used(&self) -> bool {
        self.arcane_recovery_used
    }

    pub fn last_long_rest(&self) -> Option<DateTime<Utc>> {
        self.last_long_rest
    }

    // =========================================================================
    // Derived limits
    // =========================================================================

    pub fn max_prepared(&self) -> u32 {
        max_prepared(
            self.profile.intelligence_modifier,
            self.profile.level,
            &self.spell_bonuses,
        )
    }

    pub fn max_cantrips(&self) -> u32 {
        max_cantrips(self.profile.class, self.profile.level, &self.spell_bonuses)
    }

    pub fn prepared_count(&self, filter: LevelFilter) -> u32 {
        self.roster.count_toward_limit(filter)
    }

    pub fn spellbook_capacity(&self) -> u32 {
        spellbook_capacity(self.profile.level)
    }

    fn preparation_limits(&self) -> PreparationLimits {
        PreparationLimits {
            max_cantrips: self.max_cantrips(),
            max_prepared: self.max_prepared(),
        }
    }

    // =========================================================================
    // Slots and casting
    // =========================================================================

    pub fn use_slot(&mut self, level: u8) -> Result<SlotEntry, DomainError> {
        self.slots.use_slot(level)?;
        Ok(self.slot_entry(level))
    }

    pub fn restore_slot(&mut self, level: u8) -> Result<SlotEntry, DomainError> {
        self.slots.restore_slot(level)?;
        Ok(self.slot_entry(level))
    }

    fn slot_entry(&self, level: u8) -> SlotEntry {
        SlotEntry {
            spell_level: level,
            total: self.slots.total(level),
            used: self.slots.used(level),
        }
    }

    /// Cast a known spell, spending whatever [`resolve_cast`] picks.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` when the spell is not on the known roster.
    pub fn cast(&mut self, spell_id: SpellId) -> Result<CastOutcome, DomainError> {
        let spell = self
            .roster
            .get_known(spell_id)
            .ok_or_else(|| DomainError::not_found("Spell", spell_id.to_string()))?;
        Ok(resolve_cast(spell, &mut self.slots, &mut self.extra_uses))
    }

    // =========================================================================
    // Rests
    // =========================================================================

    /// Restore every slot and extra use, re-arm Arcane Recovery and clear tasks.
    pub fn long_rest(&mut self, now: DateTime<Utc>) -> RestOutcome {
        let slots_restored = self
            .slots
            .entries()
            .iter()
            .map(|e| e.used as u32)
            .sum();
        self.slots.restore_all();
        let extra_uses_restored = self.extra_uses.restore_all();
        self.arcane_recovery_used = false;
        self.tasks.reset();
        self.last_long_rest = Some(now);
        RestOutcome {
            slots_restored,
            extra_uses_restored,
        }
    }

    /// Wizard Arcane Recovery: up to half the wizard level (rounded up) in
    /// spent slots, lowest levels first. Usable once per long rest.
    ///
    /// # Errors
    ///
    /// `DomainError::Constraint` for non-wizards or when already used.
    pub fn arcane_recovery(&mut self) -> Result<RecoveryOutcome, DomainError> {
        if self.profile.class != CharacterClass::Wizard {
            return Err(DomainError::constraint("Only wizards have Arcane Recovery"));
        }
        if self.arcane_recovery_used {
            return Err(DomainError::constraint(
                "Arcane Recovery already used since the last long rest",
            ));
        }
        let max_slots = self.profile.level.value().div_ceil(2);
        let recovered = self.slots.recover_slots(max_slots);
        self.arcane_recovery_used = true;
        Ok(RecoveryOutcome { recovered })
    }

    pub fn needs_auto_reset(&self, policy: AutoResetPolicy, now: DateTime<Utc>) -> bool {
        policy.reset_due(self.last_long_rest, now)
    }

    // =========================================================================
    // Rosters
    // =========================================================================

    pub fn add_known_spell(&mut self, spell: Spell) -> Result<SpellId, DomainError> {
        self.roster.add_known(spell)
    }

    pub fn add_unknown_spell(&mut self, spell: Spell) -> Result<SpellId, DomainError> {
        self.roster.add_unknown(spell)
    }

    pub fn learn_spell(&mut self, id: SpellId) -> Result<SpellId, DomainError> {
        self.roster.learn(id)
    }

    pub fn forget_spell(&mut self, id: SpellId) -> Result<SpellId, DomainError> {
        self.roster.forget(id)
    }

    pub fn remove_known_spell(&mut self, id: SpellId) -> Result<Spell, DomainError> {
        self.roster.remove_known(id)
    }

    pub fn remove_unknown_spell(&mut self, id: SpellId) -> Result<Spell, DomainError> {
        self.roster.remove_unknown(id)
    }

    /// Replace the unknown roster with a fresh scan. Returns how many were added.
    pub fn replace_unknown_spells(&mut self, spells: Vec<Spell>) -> usize {
        self.roster.replace_unknown(spells)
    }

    pub fn toggle_preparation(&mut self, id: SpellId) -> Result<PreparationChange, DomainError> {
        let limits = self.preparation_limits();
        self.roster
            .toggle_preparation(id, &self.bonus_prepared_spells, limits)
    }

    // =========================================================================
    // Bonuses
    // =========================================================================

    pub fn add_bonus_slot(&mut self, bonus: BonusSlot) {
        self.slots.add_bonus(bonus);
    }

    pub fn remove_bonus_slot(&mut self, position: usize) -> Result<BonusSlot, DomainError> {
        self.slots.remove_bonus(position)
    }

    pub fn add_extra_use(&mut self, entry: ExtraSpellUse) {
        self.extra_uses.add_use(entry);
    }

    pub fn remove_extra_use(
        &mut self,
        spell_name: &str,
        source: &str,
    ) -> Result<ExtraSpellUse, DomainError> {
        self.extra_uses.remove(spell_name, source)
    }

    /// # Errors
    ///
    /// `DomainError::Constraint` when the same spell and source is already listed.
    pub fn add_bonus_prepared_spell(&mut self, bonus: BonusPreparedSpell) -> Result<(), DomainError> {
        if self
            .bonus_prepared_spells
            .iter()
            .any(|b| b.same_entry(bonus.spell_name().as_str(), bonus.source()))
        {
            return Err(DomainError::constraint(format!(
                "{} from {} is already a bonus prepared spell",
                bonus.spell_name(),
                bonus.source()
            )));
        }
        self.bonus_prepared_spells.push(bonus);
        Ok(())
    }

    /// Remove a bonus prepared spell. A spell prepared through it becomes unprepared.
    pub fn remove_bonus_prepared_spell(
        &mut self,
        spell_name: &str,
        source: &str,
    ) -> Result<BonusPreparedSpell, DomainError> {
        let position = self
            .bonus_prepared_spells
            .iter()
            .position(|b| b.same_entry(spell_name, source))
            .ok_or_else(|| DomainError::not_found("BonusPreparedSpell", spell_name))?;
        let removed = self.bonus_prepared_spells.remove(position);
        self.roster.release_bonus(spell_name, source);
        Ok(removed)
    }

    pub fn add_spell_bonuses(&mut self, bonuses: SpellBonuses) {
        self.spell_bonuses.push(bonuses);
    }

    pub fn remove_spell_bonuses(&mut self, position: usize) -> Result<SpellBonuses, DomainError> {
        if position >= self.spell_bonuses.len() {
            return Err(DomainError::not_found("SpellBonuses", position.to_string()));
        }
        Ok(self.spell_bonuses.remove(position))
    }

    /// Replace whatever `source_file` contributed on a previous scan.
    ///
    /// Manual entries and other files' entries are untouched, so scanning the
    /// same note twice leaves the same state as scanning it once.
    pub fn apply_scan(&mut self, source_file: &str, contribution: NoteContribution) -> ScanOutcome {
        let outcome = ScanOutcome {
            bonus_slots: contribution.bonus_slots.len(),
            extra_uses: contribution.extra_uses.len(),
            spell_bonuses: usize::from(contribution.spell_bonuses.is_some()),
        };
        self.slots
            .replace_scanned_bonuses(source_file, contribution.bonus_slots);
        self.extra_uses
            .replace_scanned(source_file, contribution.extra_uses);
        self.spell_bonuses
            .retain(|b| !b.origin().is_from_file(source_file));
        if let Some(bonuses) = contribution.spell_bonuses {
            self.spell_bonuses
                .push(bonuses.with_origin(EntryOrigin::scanned(source_file)));
        }
        outcome
    }

    /// Drop scanned contributions from files `keep` rejects.
    pub fn retain_scanned_files(&mut self, keep: &dyn Fn(&str) -> bool) {
        self.slots.retain_scanned_files(keep);
        self.extra_uses.retain_scanned_files(keep);
        self.spell_bonuses
            .retain(|b| b.origin().source_file().map(keep).unwrap_or(true));
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Today's checklist, level-derived wizard tasks first.
    pub fn tasks(&self) -> Vec<DailyTask> {
        daily_tasks(
            self.profile.class,
            self.profile.level,
            self.arcane_recovery_used,
            &self.subclass,
            &self.tasks,
        )
    }

    pub fn add_task(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.tasks.add_task(text)
    }

    /// Toggle a custom task by its position among custom tasks.
    pub fn toggle_task(&mut self, index: usize) -> Result<bool, DomainError> {
        self.tasks.toggle_task(index)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<DailyTask, DomainError> {
        self.tasks.remove_task(index)
    }

    // =========================================================================
    // Folders
    // =========================================================================

    pub fn spell_folders(&self) -> &[Option<String>; 10] {
        &self.spell_folders
    }

    pub fn spell_folder(&self, spell_level: u8) -> Option<&str> {
        self.spell_folders
            .get(spell_level as usize)
            .and_then(|f| f.as_deref())
    }

    /// # Errors
    ///
    /// `DomainError::Validation` for a spell level above 9.
    pub fn set_spell_folder(
        &mut self,
        spell_level: u8,
        folder: Option<String>,
    ) -> Result<(), DomainError> {
        if spell_level > MAX_SPELL_LEVEL {
            return Err(DomainError::validation(format!(
                "Spell level must be 0-{}, got {}",
                MAX_SPELL_LEVEL, spell_level
            )));
        }
        self.spell_folders[spell_level as usize] = folder.filter(|f| !f.trim().is_empty());
        Ok(())
    }

    pub fn bonus_folder(&self) -> Option<&str> {
        self.bonus_folder.as_deref()
    }

    pub fn set_bonus_folder(&mut self, folder: Option<String>) {
        self.bonus_folder = folder.filter(|f| !f.trim().is_empty());
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Discard everything and start from defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
