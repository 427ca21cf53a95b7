//! Character and spell level value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Highest character level.
pub const MAX_CHARACTER_LEVEL: u8 = 20;

/// Highest spell level (and number of slot levels).
pub const MAX_SPELL_LEVEL: u8 = 9;

// ============================================================================
// CharacterLevel
// ============================================================================

/// A character level in 1..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CharacterLevel(u8);

impl CharacterLevel {
    /// Create a validated level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `level` is outside 1..=20.
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if !(1..=MAX_CHARACTER_LEVEL).contains(&level) {
            return Err(DomainError::validation(format!(
                "Character level must be between 1 and {}, got {}",
                MAX_CHARACTER_LEVEL, level
            )));
        }
        Ok(Self(level))
    }

    /// Saturate any integer into 1..=20.
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(1, MAX_CHARACTER_LEVEL as i32) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for CharacterLevel {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for CharacterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for CharacterLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<CharacterLevel> for u8 {
    fn from(level: CharacterLevel) -> u8 {
        level.0
    }
}

// ============================================================================
// SpellLevel
// ============================================================================

/// Spell level representation.
///
/// Persisted as a plain integer (0 = cantrip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpellLevel {
    /// Cantrip (level 0 spell, can be cast at will)
    Cantrip,
    /// Leveled spell (1-9)
    Level(u8),
}

impl SpellLevel {
    /// Convert to numeric level (cantrip = 0).
    pub fn as_number(&self) -> u8 {
        match self {
            SpellLevel::Cantrip => 0,
            SpellLevel::Level(n) => *n,
        }
    }

    /// Check if this is a cantrip.
    pub fn is_cantrip(&self) -> bool {
        matches!(self, SpellLevel::Cantrip)
    }
}

impl TryFrom<u8> for SpellLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(SpellLevel::Cantrip),
            1..=MAX_SPELL_LEVEL => Ok(SpellLevel::Level(level)),
            _ => Err(DomainError::validation(format!(
                "Spell level must be between 0 and {}, got {}",
                MAX_SPELL_LEVEL, level
            ))),
        }
    }
}

impl From<SpellLevel> for u8 {
    fn from(level: SpellLevel) -> u8 {
        level.as_number()
    }
}

impl fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellLevel::Cantrip => write!(f, "Cantrip"),
            SpellLevel::Level(n) => write!(f, "Level {}", n),
        }
    }
}

/// Validate a slot level (1..=9).
pub fn check_slot_level(level: u8) -> Result<u8, DomainError> {
    if (1..=MAX_SPELL_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(DomainError::validation(format!(
            "Slot level must be between 1 and {}, got {}",
            MAX_SPELL_LEVEL, level
        )))
    }
}
