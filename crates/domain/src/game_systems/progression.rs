//! D&D 5th Edition level progression.
//!
//! Static tables mapping character level to spell slots and cantrips known.
//! Values follow the standard 5e full-caster and half-caster progressions and
//! are copied, not derived.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{CharacterLevel, MAX_SPELL_LEVEL};

/// Slot totals for spell levels 1..=9 (index 0 = 1st level).
pub type SlotRow = [u8; MAX_SPELL_LEVEL as usize];

/// Character classes the tracker knows about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    #[default]
    Wizard,
    Cleric,
    Druid,
    Bard,
    Sorcerer,
    Paladin,
    Ranger,
    Warlock,
    Fighter,
    Rogue,
    Barbarian,
    Monk,
}

/// How fast a class gains spell slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterCategory {
    /// Standard full-caster table, up to 9th level slots.
    Full,
    /// Slots from character level 2, up to 5th level slots.
    Half,
    /// No spell slots.
    None,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 12] = [
        CharacterClass::Wizard,
        CharacterClass::Cleric,
        CharacterClass::Druid,
        CharacterClass::Bard,
        CharacterClass::Sorcerer,
        CharacterClass::Paladin,
        CharacterClass::Ranger,
        CharacterClass::Warlock,
        CharacterClass::Fighter,
        CharacterClass::Rogue,
        CharacterClass::Barbarian,
        CharacterClass::Monk,
    ];

    pub fn caster_category(&self) -> CasterCategory {
        match self {
            CharacterClass::Wizard
            | CharacterClass::Cleric
            | CharacterClass::Druid
            | CharacterClass::Bard
            | CharacterClass::Sorcerer => CasterCategory::Full,
            CharacterClass::Paladin | CharacterClass::Ranger => CasterCategory::Half,
            // Pact magic is not modelled by the slot ledger
            CharacterClass::Warlock
            | CharacterClass::Fighter
            | CharacterClass::Rogue
            | CharacterClass::Barbarian
            | CharacterClass::Monk => CasterCategory::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Wizard => "wizard",
            CharacterClass::Cleric => "cleric",
            CharacterClass::Druid => "druid",
            CharacterClass::Bard => "bard",
            CharacterClass::Sorcerer => "sorcerer",
            CharacterClass::Paladin => "paladin",
            CharacterClass::Ranger => "ranger",
            CharacterClass::Warlock => "warlock",
            CharacterClass::Fighter => "fighter",
            CharacterClass::Rogue => "rogue",
            CharacterClass::Barbarian => "barbarian",
            CharacterClass::Monk => "monk",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CharacterClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown character class: {}", s)))
    }
}

// Spell slot progression tables (index is character level - 1)

const FULL_CASTER_SLOTS: [SlotRow; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0], // Level 1
    [3, 0, 0, 0, 0, 0, 0, 0, 0], // Level 2
    [4, 2, 0, 0, 0, 0, 0, 0, 0], // Level 3
    [4, 3, 0, 0, 0, 0, 0, 0, 0], // Level 4
    [4, 3, 2, 0, 0, 0, 0, 0, 0], // Level 5
    [4, 3, 3, 0, 0, 0, 0, 0, 0], // Level 6
    [4, 3, 3, 1, 0, 0, 0, 0, 0], // Level 7
    [4, 3, 3, 2, 0, 0, 0, 0, 0], // Level 8
    [4, 3, 3, 3, 1, 0, 0, 0, 0], // Level 9
    [4, 3, 3, 3, 2, 0, 0, 0, 0], // Level 10
    [4, 3, 3, 3, 2, 1, 0, 0, 0], // Level 11
    [4, 3, 3, 3, 2, 1, 0, 0, 0], // Level 12
    [4, 3, 3, 3, 2, 1, 1, 0, 0], // Level 13
    [4, 3, 3, 3, 2, 1, 1, 0, 0], // Level 14
    [4, 3, 3, 3, 2, 1, 1, 1, 0], // Level 15
    [4, 3, 3, 3, 2, 1, 1, 1, 0], // Level 16
    [4, 3, 3, 3, 2, 1, 1, 1, 1], // Level 17
    [4, 3, 3, 3, 3, 1, 1, 1, 1], // Level 18
    [4, 3, 3, 3, 3, 2, 1, 1, 1], // Level 19
    [4, 3, 3, 3, 3, 2, 2, 1, 1], // Level 20
];

const HALF_CASTER_SLOTS: [SlotRow; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0], // Level 1
    [2, 0, 0, 0, 0, 0, 0, 0, 0], // Level 2
    [3, 0, 0, 0, 0, 0, 0, 0, 0], // Level 3
    [3, 0, 0, 0, 0, 0, 0, 0, 0], // Level 4
    [4, 2, 0, 0, 0, 0, 0, 0, 0], // Level 5
    [4, 2, 0, 0, 0, 0, 0, 0, 0], // Level 6
    [4, 3, 0, 0, 0, 0, 0, 0, 0], // Level 7
    [4, 3, 0, 0, 0, 0, 0, 0, 0], // Level 8
    [4, 3, 2, 0, 0, 0, 0, 0, 0], // Level 9
    [4, 3, 2, 0, 0, 0, 0, 0, 0], // Level 10
    [4, 3, 3, 0, 0, 0, 0, 0, 0], // Level 11
    [4, 3, 3, 0, 0, 0, 0, 0, 0], // Level 12
    [4, 3, 3, 1, 0, 0, 0, 0, 0], // Level 13
    [4, 3, 3, 1, 0, 0, 0, 0, 0], // Level 14
    [4, 3, 3, 2, 0, 0, 0, 0, 0], // Level 15
    [4, 3, 3, 2, 0, 0, 0, 0, 0], // Level 16
    [4, 3, 3, 3, 1, 0, 0, 0, 0], // Level 17
    [4, 3, 3, 3, 1, 0, 0, 0, 0], // Level 18
    [4, 3, 3, 3, 2, 0, 0, 0, 0], // Level 19
    [4, 3, 3, 3, 2, 0, 0, 0, 0], // Level 20
];

/// Spell slot totals for a caster category at a character level.
pub fn slots_for_level(category: CasterCategory, level: CharacterLevel) -> SlotRow {
    let index = (level.value() - 1) as usize;
    match category {
        CasterCategory::Full => FULL_CASTER_SLOTS[index],
        CasterCategory::Half => HALF_CASTER_SLOTS[index],
        CasterCategory::None => [0; MAX_SPELL_LEVEL as usize],
    }
}

/// Cantrips known for a class at a character level.
pub fn cantrips_for_class_level(class: CharacterClass, level: CharacterLevel) -> u8 {
    let tier = match level.value() {
        1..=3 => 0,
        4..=9 => 1,
        _ => 2,
    };
    match class {
        CharacterClass::Wizard | CharacterClass::Cleric | CharacterClass::Druid => 3 + tier,
        CharacterClass::Sorcerer => 4 + tier,
        CharacterClass::Bard => 2 + tier,
        _ => 0,
    }
}

/// Spells a wizard's spellbook holds at a level (6 at 1st, +2 per level).
pub fn spellbook_capacity(level: CharacterLevel) -> u32 {
    6 + 2 * (level.value() as u32 - 1)
}
