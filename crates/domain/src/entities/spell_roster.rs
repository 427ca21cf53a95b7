//! Known and unknown spell rosters plus the prepared-spell ceiling.
//!
//! A spell name appears at most once across both rosters. Names are matched
//! case-insensitively through an index kept alongside each roster.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::bonuses::{
    total_bonus_cantrips, total_bonus_prepared, BonusPreparedSpell, BonusPreparedStatus,
    SpellBonuses,
};
use crate::entities::spell::{PreparationState, Spell};
use crate::error::DomainError;
use crate::events::PreparationChange;
use crate::game_systems::{cantrips_for_class_level, CharacterClass};
use crate::ids::SpellId;
use crate::value_objects::{name_key, CharacterLevel};

/// Which spells a prepared count covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Level 0 only
    Cantrips,
    /// Every level above 0
    Leveled,
    /// One exact spell level
    Exactly(u8),
}

impl LevelFilter {
    fn accepts(&self, spell: &Spell) -> bool {
        let level = spell.level().as_number();
        match self {
            LevelFilter::Cantrips => level == 0,
            LevelFilter::Leveled => level > 0,
            LevelFilter::Exactly(n) => level == *n,
        }
    }
}

/// Ceilings the toggle checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparationLimits {
    pub max_cantrips: u32,
    pub max_prepared: u32,
}

/// `max(1, int_mod + level) + bonus prepared spells`.
pub fn max_prepared(int_modifier: i32, level: CharacterLevel, bonuses: &[SpellBonuses]) -> u32 {
    let base = int_modifier.saturating_add(level.value() as i32).max(1) as u32;
    base.saturating_add(total_bonus_prepared(bonuses))
}

/// Table cantrips plus bonus cantrips.
pub fn max_cantrips(class: CharacterClass, level: CharacterLevel, bonuses: &[SpellBonuses]) -> u32 {
    (cantrips_for_class_level(class, level) as u32).saturating_add(total_bonus_cantrips(bonuses))
}

/// Prepared spells that count against the ceiling.
///
/// Spells prepared via an active bonus are never counted.
pub fn count_toward_limit<'a>(spells: impl IntoIterator<Item = &'a Spell>, filter: LevelFilter) -> u32 {
    spells
        .into_iter()
        .filter(|s| filter.accepts(s) && s.preparation().counts_toward_limit())
        .count() as u32
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterData {
    #[serde(default)]
    known: Vec<Spell>,
    #[serde(default)]
    unknown: Vec<Spell>,
}

/// The character's known and unknown spells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RosterData", into = "RosterData")]
pub struct SpellRoster {
    known: Vec<Spell>,
    unknown: Vec<Spell>,
    known_index: HashMap<String, SpellId>,
    unknown_index: HashMap<String, SpellId>,
    duplicates_dropped: usize,
}

impl From<RosterData> for SpellRoster {
    fn from(data: RosterData) -> Self {
        let mut roster = SpellRoster::new();
        // Persisted files written by hand may repeat a name; first entry wins
        let mut dropped = 0;
        for spell in data.known {
            if roster.add_known(spell).is_err() {
                dropped += 1;
            }
        }
        for spell in data.unknown {
            if roster.add_unknown(spell).is_err() {
                dropped += 1;
            }
        }
        roster.duplicates_dropped = dropped;
        roster
    }
}

impl From<SpellRoster> for RosterData {
    fn from(roster: SpellRoster) -> Self {
        Self {
            known: roster.known,
            unknown: roster.unknown,
        }
    }
}

impl SpellRoster {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Saved entries skipped on load because their name was already listed.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn known(&self) -> &[Spell] {
        &self.known
    }

    pub fn unknown(&self) -> &[Spell] {
        &self.unknown
    }

    pub fn get_known(&self, id: SpellId) -> Option<&Spell> {
        self.known.iter().find(|s| s.id() == id)
    }

    pub fn get_unknown(&self, id: SpellId) -> Option<&Spell> {
        self.unknown.iter().find(|s| s.id() == id)
    }

    pub fn find_known_by_name(&self, name: &str) -> Option<&Spell> {
        let id = self.known_index.get(&name_key(name))?;
        self.get_known(*id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        let key = name_key(name);
        self.known_index.contains_key(&key) || self.unknown_index.contains_key(&key)
    }

    pub fn count_toward_limit(&self, filter: LevelFilter) -> u32 {
        count_toward_limit(&self.known, filter)
    }

    /// Whether `bonus` is currently used by its spell.
    pub fn is_bonus_active(&self, bonus: &BonusPreparedSpell) -> bool {
        self.find_known_by_name(bonus.spell_name().as_str())
            .and_then(|s| s.preparation().bonus_source())
            .map(|source| source == bonus.source())
            .unwrap_or(false)
    }

    pub fn bonus_statuses(&self, bonuses: &[BonusPreparedSpell]) -> Vec<BonusPreparedStatus> {
        bonuses
            .iter()
            .map(|b| BonusPreparedStatus {
                spell_name: b.spell_name().clone(),
                source: b.source().to_string(),
                is_active: self.is_bonus_active(b),
            })
            .collect()
    }

    // =========================================================================
    // Roster membership
    // =========================================================================

    /// Add a spell to the known roster.
    ///
    /// A same-named spell waiting in the unknown roster is replaced.
    ///
    /// # Errors
    ///
    /// `DomainError::Constraint` when a spell with the same name is already known.
    pub fn add_known(&mut self, spell: Spell) -> Result<SpellId, DomainError> {
        let key = spell.name().key();
        if self.known_index.contains_key(&key) {
            return Err(DomainError::constraint(format!(
                "{} is already known",
                spell.name()
            )));
        }
        if let Some(existing) = self.unknown_index.remove(&key) {
            self.unknown.retain(|s| s.id() != existing);
        }
        let id = spell.id();
        self.known_index.insert(key, id);
        self.known.push(spell);
        Ok(id)
    }

    /// Add a spell to the unknown roster.
    ///
    /// # Errors
    ///
    /// `DomainError::Constraint` when the name is on either roster already.
    pub fn add_unknown(&mut self, mut spell: Spell) -> Result<SpellId, DomainError> {
        if self.contains_name(spell.name().as_str()) {
            return Err(DomainError::constraint(format!(
                "{} is already on a roster",
                spell.name()
            )));
        }
        spell.set_preparation(PreparationState::Unprepared);
        let id = spell.id();
        self.unknown_index.insert(spell.name().key(), id);
        self.unknown.push(spell);
        Ok(id)
    }

    /// Move a spell from unknown to known, keeping its id.
    pub fn learn(&mut self, id: SpellId) -> Result<SpellId, DomainError> {
        let spell = self.remove_unknown(id)?;
        self.add_known(spell)
    }

    /// Move a spell from known to unknown.
    ///
    /// The spell gets a fresh id and loses its preparation (releasing any bonus).
    pub fn forget(&mut self, id: SpellId) -> Result<SpellId, DomainError> {
        let mut spell = self.remove_known(id)?;
        spell.regenerate_id();
        spell.set_preparation(PreparationState::Unprepared);
        self.add_unknown(spell)
    }

    pub fn remove_known(&mut self, id: SpellId) -> Result<Spell, DomainError> {
        let position = self
            .known
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| DomainError::not_found("Spell", id.to_string()))?;
        let spell = self.known.remove(position);
        self.known_index.remove(&spell.name().key());
        Ok(spell)
    }

    pub fn remove_unknown(&mut self, id: SpellId) -> Result<Spell, DomainError> {
        let position = self
            .unknown
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| DomainError::not_found("Spell", id.to_string()))?;
        let spell = self.unknown.remove(position);
        self.unknown_index.remove(&spell.name().key());
        Ok(spell)
    }

    /// Replace the unknown roster wholesale (a rescan).
    ///
    /// Spells already known and repeated names are skipped. Returns how many
    /// spells were added.
    pub fn replace_unknown(&mut self, spells: Vec<Spell>) -> usize {
        self.unknown.clear();
        self.unknown_index.clear();
        spells
            .into_iter()
            .filter_map(|spell| self.add_unknown(spell).ok())
            .count()
    }

    // =========================================================================
    // Preparation
    // =========================================================================

    /// Flip a known spell between prepared and unprepared.
    ///
    /// An unprepared spell with an unused matching bonus is prepared for free;
    /// otherwise it must fit under the cantrip or leveled ceiling. Unpreparing
    /// a bonus-prepared spell releases the bonus.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` when the id is not in the known roster
    /// - `DomainError::PreparedLimitReached` when the ceiling is reached; nothing changes
    pub fn toggle_preparation(
        &mut self,
        id: SpellId,
        bonuses: &[BonusPreparedSpell],
        limits: PreparationLimits,
    ) -> Result<PreparationChange, DomainError> {
        let spell = self
            .get_known(id)
            .ok_or_else(|| DomainError::not_found("Spell", id.to_string()))?;

        let (next, change) = match spell.preparation() {
            PreparationState::PreparedViaBonus { source } => (
                PreparationState::Unprepared,
                PreparationChange::BonusReleased {
                    source: source.clone(),
                },
            ),
            PreparationState::PreparedNormally => {
                (PreparationState::Unprepared, PreparationChange::Unprepared)
            }
            PreparationState::Unprepared => {
                let free_bonus = bonuses
                    .iter()
                    .find(|b| b.spell_name().matches(spell.name().as_str()) && !self.is_bonus_active(b));
                match free_bonus {
                    Some(bonus) => (
                        PreparationState::PreparedViaBonus {
                            source: bonus.source().to_string(),
                        },
                        PreparationChange::PreparedViaBonus {
                            source: bonus.source().to_string(),
                        },
                    ),
                    None => {
                        let (filter, max) = if spell.is_cantrip() {
                            (LevelFilter::Cantrips, limits.max_cantrips)
                        } else {
                            (LevelFilter::Leveled, limits.max_prepared)
                        };
                        let current = self.count_toward_limit(filter);
                        if current >= max {
                            return Err(DomainError::prepared_limit(current, max));
                        }
                        (
                            PreparationState::PreparedNormally,
                            PreparationChange::PreparedNormally,
                        )
                    }
                }
            }
        };

        if let Some(spell) = self.known.iter_mut().find(|s| s.id() == id) {
            spell.set_preparation(next);
        }
        Ok(change)
    }

    /// Unprepare the spell using the bonus `(spell_name, source)`, if any.
    ///
    /// Returns true when a spell was unprepared.
    pub fn release_bonus(&mut self, spell_name: &str, source: &str) -> bool {
        let Some(id) = self.known_index.get(&name_key(spell_name)).copied() else {
            return false;
        };
        match self.known.iter_mut().find(|s| s.id() == id) {
            Some(spell) if spell.preparation().bonus_source() == Some(source) => {
                spell.set_preparation(PreparationState::Unprepared);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{EntryOrigin, SpellLevel, SpellName};

    fn spell(name: &str, level: u8) -> Spell {
        Spell::new(
            SpellName::new(name).unwrap(),
            SpellLevel::try_from(level).unwrap(),
        )
    }

    fn limits(max_prepared: u32) -> PreparationLimits {
        PreparationLimits {
            max_cantrips: 3,
            max_prepared,
        }
    }

    fn mage_armor_bonus() -> BonusPreparedSpell {
        BonusPreparedSpell::new(SpellName::new("Mage Armor").unwrap(), "Feat")
    }

    fn level(n: u8) -> CharacterLevel {
        CharacterLevel::new(n).unwrap()
    }

    #[test]
    fn max_prepared_formula() {
        assert_eq!(max_prepared(3, level(5), &[]), 8);
        assert_eq!(max_prepared(-5, level(1), &[]), 1);
        let bonuses = vec![SpellBonuses::new(0, 2, "Item", EntryOrigin::Manual).unwrap()];
        assert_eq!(max_prepared(3, level(5), &bonuses), 10);
        assert_eq!(max_prepared(-5, level(1), &bonuses), 3);

        assert_eq!(max_prepared(i32::MAX, level(20), &[]), i32::MAX as u32);
        assert_eq!(max_prepared(i32::MIN, level(20), &[]), 1);
        let huge = vec![SpellBonuses::new(0, u32::MAX, "Tome", EntryOrigin::Manual).unwrap()];
        assert_eq!(max_prepared(i32::MAX, level(20), &huge), u32::MAX);
    }

    #[test]
    fn max_cantrips_adds_bonuses() {
        let bonuses = vec![SpellBonuses::new(1, 0, "Feat", EntryOrigin::Manual).unwrap()];
        assert_eq!(max_cantrips(CharacterClass::Wizard, level(4), &bonuses), 5);
        assert_eq!(max_cantrips(CharacterClass::Fighter, level(4), &[]), 0);
    }

    #[test]
    fn add_known_rejects_duplicate_names() {
        let mut roster = SpellRoster::new();
        roster.add_known(spell("Shield", 1)).unwrap();
        let err = roster.add_known(spell("shield", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
        assert!(roster.find_known_by_name("SHIELD").is_some());
    }

    #[test]
    fn add_known_takes_over_unknown_entry() {
        let mut roster = SpellRoster::new();
        roster.add_unknown(spell("Shield", 1)).unwrap();
        roster.add_known(spell("Shield", 1)).unwrap();
        assert!(roster.unknown().is_empty());
        assert_eq!(roster.known().len(), 1);
    }

    #[test]
    fn learn_keeps_id_and_forget_regenerates_it() {
        let mut roster = SpellRoster::new();
        let id = roster.add_unknown(spell("Fireball", 3)).unwrap();
        assert_eq!(roster.learn(id).unwrap(), id);
        assert!(roster.get_known(id).is_some());

        roster
            .toggle_preparation(id, &[], limits(8))
            .unwrap();
        let new_id = roster.forget(id).unwrap();
        assert_ne!(new_id, id);
        let moved = roster.get_unknown(new_id).unwrap();
        assert_eq!(moved.name().as_str(), "Fireball");
        assert!(!moved.is_prepared());
        assert!(roster.known().is_empty());
    }

    #[test]
    fn missing_spell_is_not_found() {
        let mut roster = SpellRoster::new();
        let err = roster
            .toggle_preparation(SpellId::new(), &[], limits(8))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(roster.learn(SpellId::new()).is_err());
    }

    #[test]
    fn replace_unknown_skips_known_and_duplicates() {
        let mut roster = SpellRoster::new();
        roster.add_known(spell("Shield", 1)).unwrap();
        roster.add_unknown(spell("Old Scan", 1)).unwrap();
        let added = roster.replace_unknown(vec![
            spell("Shield", 1),
            spell("Fireball", 3),
            spell("fireball", 3),
            spell("Light", 0),
        ]);
        assert_eq!(added, 2);
        let names: Vec<&str> = roster.unknown().iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["Fireball", "Light"]);
    }

    #[test]
    fn prepare_up_to_ceiling_then_reject() {
        let mut roster = SpellRoster::new();
        let ids: Vec<SpellId> = (0..9)
            .map(|i| roster.add_known(spell(&format!("Spell {}", i), 1)).unwrap())
            .collect();

        for id in &ids[..8] {
            assert_eq!(
                roster.toggle_preparation(*id, &[], limits(8)).unwrap(),
                PreparationChange::PreparedNormally
            );
        }
        let err = roster.toggle_preparation(ids[8], &[], limits(8)).unwrap_err();
        assert_eq!(err, DomainError::prepared_limit(8, 8));
        assert!(!roster.get_known(ids[8]).unwrap().is_prepared());
    }

    #[test]
    fn cantrips_use_their_own_ceiling() {
        let mut roster = SpellRoster::new();
        let leveled = roster.add_known(spell("Shield", 1)).unwrap();
        let cantrips: Vec<SpellId> = ["Light", "Mage Hand", "Prestidigitation", "Fire Bolt"]
            .iter()
            .map(|n| roster.add_known(spell(n, 0)).unwrap())
            .collect();

        roster.toggle_preparation(leveled, &[], limits(1)).unwrap();
        for id in &cantrips[..3] {
            roster.toggle_preparation(*id, &[], limits(1)).unwrap();
        }
        assert!(matches!(
            roster.toggle_preparation(cantrips[3], &[], limits(1)),
            Err(DomainError::PreparedLimitReached { current: 3, max: 3 })
        ));
        assert_eq!(roster.count_toward_limit(LevelFilter::Cantrips), 3);
        assert_eq!(roster.count_toward_limit(LevelFilter::Leveled), 1);
        assert_eq!(roster.count_toward_limit(LevelFilter::Exactly(1)), 1);
    }

    #[test]
    fn bonus_path_bypasses_ceiling_and_is_not_counted() {
        let mut roster = SpellRoster::new();
        let shield = roster.add_known(spell("Shield", 1)).unwrap();
        let armor = roster.add_known(spell("Mage Armor", 1)).unwrap();
        let bonuses = vec![mage_armor_bonus()];

        roster.toggle_preparation(shield, &bonuses, limits(1)).unwrap();
        assert!(!roster.is_bonus_active(&bonuses[0]));

        let change = roster.toggle_preparation(armor, &bonuses, limits(1)).unwrap();
        assert_eq!(
            change,
            PreparationChange::PreparedViaBonus {
                source: "Feat".into()
            }
        );
        assert!(roster.is_bonus_active(&bonuses[0]));
        for filter in [LevelFilter::Leveled, LevelFilter::Exactly(1)] {
            assert_eq!(roster.count_toward_limit(filter), 1);
        }
        assert_eq!(roster.count_toward_limit(LevelFilter::Cantrips), 0);

        let change = roster.toggle_preparation(armor, &bonuses, limits(1)).unwrap();
        assert_eq!(
            change,
            PreparationChange::BonusReleased {
                source: "Feat".into()
            }
        );
        assert!(!roster.is_bonus_active(&bonuses[0]));
        assert!(!roster.get_known(armor).unwrap().is_prepared());
    }

    #[test]
    fn toggle_pair_restores_state_on_both_paths() {
        let mut roster = SpellRoster::new();
        let shield = roster.add_known(spell("Shield", 1)).unwrap();
        let armor = roster.add_known(spell("Mage Armor", 1)).unwrap();
        let bonuses = vec![mage_armor_bonus()];

        for id in [shield, armor] {
            let before = roster.clone();
            let statuses_before = roster.bonus_statuses(&bonuses);
            roster.toggle_preparation(id, &bonuses, limits(8)).unwrap();
            roster.toggle_preparation(id, &bonuses, limits(8)).unwrap();
            assert_eq!(roster, before);
            assert_eq!(roster.bonus_statuses(&bonuses), statuses_before);
        }

        // Starting from prepared: unprepare then prepare again
        roster.toggle_preparation(armor, &bonuses, limits(8)).unwrap();
        let before = roster.clone();
        roster.toggle_preparation(armor, &bonuses, limits(8)).unwrap();
        roster.toggle_preparation(armor, &bonuses, limits(8)).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn count_never_includes_bonus_prepared_spells() {
        let mut roster = SpellRoster::new();
        let bonuses: Vec<BonusPreparedSpell> = (0..=9)
            .map(|l| {
                BonusPreparedSpell::new(SpellName::new(format!("Free {}", l)).unwrap(), "Boon")
            })
            .collect();
        for l in 0..=9u8 {
            let id = roster.add_known(spell(&format!("Free {}", l), l)).unwrap();
            roster.toggle_preparation(id, &bonuses, limits(0)).unwrap();
        }
        for filter in [LevelFilter::Cantrips, LevelFilter::Leveled]
            .into_iter()
            .chain((0..=9).map(LevelFilter::Exactly))
        {
            assert_eq!(roster.count_toward_limit(filter), 0);
        }
        assert!(roster.known().iter().all(|s| s.is_prepared()));
    }

    #[test]
    fn release_bonus_unprepares_only_matching_source() {
        let mut roster = SpellRoster::new();
        let armor = roster.add_known(spell("Mage Armor", 1)).unwrap();
        let bonuses = vec![mage_armor_bonus()];
        roster.toggle_preparation(armor, &bonuses, limits(8)).unwrap();

        assert!(!roster.release_bonus("Mage Armor", "Item"));
        assert!(roster.release_bonus("mage armor", "Feat"));
        assert!(!roster.get_known(armor).unwrap().is_prepared());
    }

    #[test]
    fn roster_round_trips_and_rebuilds_index() {
        let mut roster = SpellRoster::new();
        roster.add_known(spell("Shield", 1)).unwrap();
        roster.add_unknown(spell("Fireball", 3)).unwrap();

        let json = serde_json::to_string(&roster).unwrap();
        let back: SpellRoster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
        assert!(back.find_known_by_name("shield").is_some());
        assert!(back.contains_name("FIREBALL"));
        assert_eq!(back.duplicates_dropped(), 0);
    }

    #[test]
    fn duplicate_names_in_saved_roster_are_counted() {
        let mut known = spell("Shield", 1);
        known.set_preparation(PreparationState::PreparedNormally);
        let data = RosterData {
            known: vec![known, spell("shield", 1)],
            unknown: vec![spell("SHIELD", 1), spell("Fireball", 3), spell("Fireball", 3)],
        };
        let json = serde_json::to_string(&data).unwrap();
        let roster: SpellRoster = serde_json::from_str(&json).unwrap();

        assert_eq!(roster.duplicates_dropped(), 3);
        assert_eq!(roster.known().len(), 1);
        assert!(roster.known()[0].is_prepared());
        assert_eq!(roster.unknown().len(), 1);
    }
}
