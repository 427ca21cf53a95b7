//! Spell slot ledger.
//!
//! Tracks capacity and consumption per spell level 1-9. Capacity is the base
//! progression table plus any bonus slots; consumption is tracked once per
//! level on the base ledger, bonus records only add capacity.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::{slots_for_level, CharacterClass, SlotRow};
use crate::value_objects::{check_slot_level, CharacterLevel, EntryOrigin, MAX_SPELL_LEVEL};

/// Extra slot capacity at one spell level, from an item, feat or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusSlot {
    spell_level: u8,
    amount: u8,
    source: String,
    #[serde(default)]
    origin: EntryOrigin,
}

impl BonusSlot {
    /// Create a validated bonus.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a level outside 1..=9 or a zero amount.
    pub fn new(
        spell_level: u8,
        amount: u8,
        source: impl Into<String>,
        origin: EntryOrigin,
    ) -> Result<Self, DomainError> {
        check_slot_level(spell_level)?;
        if amount == 0 {
            return Err(DomainError::validation("Bonus slot amount must be positive"));
        }
        Ok(Self {
            spell_level,
            amount,
            source: source.into(),
            origin,
        })
    }

    pub fn spell_level(&self) -> u8 {
        self.spell_level
    }

    pub fn amount(&self) -> u8 {
        self.amount
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> &EntryOrigin {
        &self.origin
    }
}

/// Effective view of one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub spell_level: u8,
    pub total: u8,
    pub used: u8,
}

impl SlotEntry {
    pub fn available(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// Per-level slot capacity and usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SlotLedgerData", into = "SlotLedgerData")]
pub struct SlotLedger {
    base: SlotRow,
    used: SlotRow,
    bonuses: Vec<BonusSlot>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotLedgerData {
    base: SlotRow,
    used: SlotRow,
    #[serde(default)]
    bonuses: Vec<BonusSlot>,
}

impl From<SlotLedgerData> for SlotLedger {
    /// Saved usage is capped at the saved capacity.
    fn from(data: SlotLedgerData) -> Self {
        let mut ledger = Self {
            base: data.base,
            used: data.used,
            bonuses: data.bonuses,
        };
        ledger.clamp_used();
        ledger
    }
}

impl From<SlotLedger> for SlotLedgerData {
    fn from(ledger: SlotLedger) -> Self {
        Self {
            base: ledger.base,
            used: ledger.used,
            bonuses: ledger.bonuses,
        }
    }
}

impl SlotLedger {
    /// Ledger with no capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger filled from the progression table, nothing used.
    pub fn for_character(class: CharacterClass, level: CharacterLevel) -> Self {
        let mut ledger = Self::new();
        ledger.recompute(class, level);
        ledger
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Base capacity at a level (0 for invalid levels).
    pub fn base_total(&self, level: u8) -> u8 {
        index(level).map(|i| self.base[i]).unwrap_or(0)
    }

    /// Effective capacity: base plus every bonus at that level.
    pub fn total(&self, level: u8) -> u8 {
        let bonus = self
            .bonuses
            .iter()
            .filter(|b| b.spell_level == level)
            .fold(0u8, |acc, b| acc.saturating_add(b.amount));
        self.base_total(level).saturating_add(bonus)
    }

    pub fn used(&self, level: u8) -> u8 {
        index(level).map(|i| self.used[i]).unwrap_or(0)
    }

    pub fn available(&self, level: u8) -> u8 {
        self.total(level).saturating_sub(self.used(level))
    }

    pub fn has_capacity(&self, level: u8) -> bool {
        self.available(level) > 0
    }

    /// Lowest level strictly above `level` with a free slot.
    pub fn lowest_available_above(&self, level: u8) -> Option<u8> {
        (level.saturating_add(1)..=MAX_SPELL_LEVEL).find(|&l| self.has_capacity(l))
    }

    /// One entry per spell level 1..=9.
    pub fn entries(&self) -> Vec<SlotEntry> {
        (1..=MAX_SPELL_LEVEL)
            .map(|level| SlotEntry {
                spell_level: level,
                total: self.total(level),
                used: self.used(level),
            })
            .collect()
    }

    pub fn bonuses(&self) -> &[BonusSlot] {
        &self.bonuses
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Rebuild base capacity for a class and level.
    ///
    /// Recorded usage survives, clamped to the new totals.
    pub fn recompute(&mut self, class: CharacterClass, level: CharacterLevel) {
        self.base = slots_for_level(class.caster_category(), level);
        self.clamp_used();
    }

    /// Spend one slot at exactly `level`.
    ///
    /// # Errors
    ///
    /// `DomainError::NoSlotsAvailable` when every slot at the level is spent;
    /// the ledger is unchanged.
    pub fn use_slot(&mut self, level: u8) -> Result<(), DomainError> {
        let i = check_slot_level(level)? as usize - 1;
        if self.used[i] >= self.total(level) {
            return Err(DomainError::NoSlotsAvailable { level });
        }
        self.used[i] += 1;
        Ok(())
    }

    /// Give back one slot at `level`. Returns false when nothing was used.
    pub fn restore_slot(&mut self, level: u8) -> Result<bool, DomainError> {
        let i = check_slot_level(level)? as usize - 1;
        if self.used[i] == 0 {
            return Ok(false);
        }
        self.used[i] -= 1;
        Ok(true)
    }

    /// Full rest: nothing used at any level.
    pub fn restore_all(&mut self) {
        self.used = [0; MAX_SPELL_LEVEL as usize];
    }

    /// Restore up to `max_slots` spent slots, lowest level first.
    ///
    /// Returns `(spell_level, restored)` for every level that changed.
    pub fn recover_slots(&mut self, max_slots: u8) -> Vec<(u8, u8)> {
        let mut remaining = max_slots;
        let mut recovered = Vec::new();
        for i in 0..MAX_SPELL_LEVEL as usize {
            if remaining == 0 {
                break;
            }
            let restored = self.used[i].min(remaining);
            if restored > 0 {
                self.used[i] -= restored;
                remaining -= restored;
                recovered.push((i as u8 + 1, restored));
            }
        }
        recovered
    }

    /// Add a bonus record.
    pub fn add_bonus(&mut self, bonus: BonusSlot) {
        self.bonuses.push(bonus);
    }

    /// Remove a bonus record by position.
    pub fn remove_bonus(&mut self, position: usize) -> Result<BonusSlot, DomainError> {
        if position >= self.bonuses.len() {
            return Err(DomainError::not_found("BonusSlot", position.to_string()));
        }
        let removed = self.bonuses.remove(position);
        self.clamp_used();
        Ok(removed)
    }

    /// Replace everything previously scanned from `source_file`.
    ///
    /// Manual bonuses and bonuses from other files are left alone.
    pub fn replace_scanned_bonuses(&mut self, source_file: &str, bonuses: Vec<BonusSlot>) {
        self.bonuses.retain(|b| !b.origin.is_from_file(source_file));
        self.bonuses.extend(bonuses.into_iter().map(|mut b| {
            b.origin = EntryOrigin::scanned(source_file);
            b
        }));
        self.clamp_used();
    }

    /// Drop scanned bonuses whose file is no longer present.
    pub fn retain_scanned_files(&mut self, keep: &dyn Fn(&str) -> bool) {
        self.bonuses
            .retain(|b| b.origin.source_file().map(keep).unwrap_or(true));
        self.clamp_used();
    }

    /// Drop every scanned bonus, keeping manual ones.
    pub fn clear_scanned_bonuses(&mut self) {
        self.bonuses.retain(|b| !b.origin.is_scanned());
        self.clamp_used();
    }

    fn clamp_used(&mut self) {
        for level in 1..=MAX_SPELL_LEVEL {
            let i = level as usize - 1;
            self.used[i] = self.used[i].min(self.total(level));
        }
    }
}

fn index(level: u8) -> Option<usize> {
    check_slot_level(level).ok().map(|l| l as usize - 1)
}
