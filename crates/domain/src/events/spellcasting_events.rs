//! Spellcasting domain events
//!
//! These enums communicate what happened when spellcasting state was
//! modified, allowing callers to report it to the user.

use crate::game_systems::CharacterClass;
use crate::value_objects::CharacterLevel;

/// Outcome of casting a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// An extra free use was consumed
    UsedExtraUse { remaining: u32 },
    /// Cantrip cast, nothing consumed
    UsedCantrip,
    /// A slot at the spell's own level was consumed
    UsedSlotAtLevel(u8),
    /// A higher-level slot was consumed because none was left at the spell's level
    UsedUpcastSlot(u8),
    /// Nothing available, nothing changed
    NoSlotsAvailable,
}

impl CastOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, CastOutcome::NoSlotsAvailable)
    }
}

/// Outcome of toggling a spell's preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparationChange {
    /// Prepared against the normal ceiling
    PreparedNormally,
    /// Prepared for free, the bonus from `source` is now in use
    PreparedViaBonus { source: String },
    /// Normally prepared spell unprepared
    Unprepared,
    /// Bonus-prepared spell unprepared, the bonus from `source` is available again
    BonusReleased { source: String },
}

/// Outcome of a long rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestOutcome {
    /// Slots that were spent before the rest
    pub slots_restored: u32,
    /// Extra uses that were spent before the rest
    pub extra_uses_restored: u32,
}

/// Outcome of Arcane Recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryOutcome {
    /// `(spell_level, restored)` per level that changed
    pub recovered: Vec<(u8, u8)>,
}

impl RecoveryOutcome {
    pub fn total(&self) -> u32 {
        self.recovered.iter().map(|(_, n)| *n as u32).sum()
    }
}

/// Outcome of changing the character's level or class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileChange {
    pub previous_level: CharacterLevel,
    pub level: CharacterLevel,
    pub previous_class: CharacterClass,
    pub class: CharacterClass,
}

impl ProfileChange {
    pub fn changed(&self) -> bool {
        self.previous_level != self.level || self.previous_class != self.class
    }
}

/// What a single note contributed after a rescan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub bonus_slots: usize,
    pub extra_uses: usize,
    pub spell_bonuses: usize,
}

impl ScanOutcome {
    pub fn is_empty(&self) -> bool {
        self.bonus_slots == 0 && self.extra_uses == 0 && self.spell_bonuses == 0
    }
}
