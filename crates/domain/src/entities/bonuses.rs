//! Bonus records that raise spellcasting limits.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{EntryOrigin, SpellName};

/// A named spell the character may prepare for free.
///
/// Whether the bonus is in use is not stored here: it is active exactly when
/// the known spell with this name is prepared via this bonus's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusPreparedSpell {
    spell_name: SpellName,
    source: String,
}

impl BonusPreparedSpell {
    pub fn new(spell_name: SpellName, source: impl Into<String>) -> Self {
        Self {
            spell_name,
            source: source.into(),
        }
    }

    pub fn spell_name(&self) -> &SpellName {
        &self.spell_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Same spell (case-insensitive) and same source.
    pub fn same_entry(&self, spell_name: &str, source: &str) -> bool {
        self.spell_name.matches(spell_name) && self.source == source
    }
}

/// A bonus prepared spell together with its derived activity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusPreparedStatus {
    pub spell_name: SpellName,
    pub source: String,
    pub is_active: bool,
}

/// Additive modifiers to the cantrip and prepared-spell maxima.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellBonuses {
    #[serde(default)]
    bonus_cantrips: u32,
    #[serde(default)]
    bonus_prepared_spells: u32,
    source: String,
    #[serde(default)]
    origin: EntryOrigin,
}

impl SpellBonuses {
    /// Create a bonus record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when both amounts are zero.
    pub fn new(
        bonus_cantrips: u32,
        bonus_prepared_spells: u32,
        source: impl Into<String>,
        origin: EntryOrigin,
    ) -> Result<Self, DomainError> {
        if bonus_cantrips == 0 && bonus_prepared_spells == 0 {
            return Err(DomainError::validation(
                "Spell bonus must grant at least one cantrip or prepared spell",
            ));
        }
        Ok(Self {
            bonus_cantrips,
            bonus_prepared_spells,
            source: source.into(),
            origin,
        })
    }

    pub fn bonus_cantrips(&self) -> u32 {
        self.bonus_cantrips
    }

    pub fn bonus_prepared_spells(&self) -> u32 {
        self.bonus_prepared_spells
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> &EntryOrigin {
        &self.origin
    }

    pub(crate) fn with_origin(mut self, origin: EntryOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Sum of every record's bonus cantrips.
pub fn total_bonus_cantrips(bonuses: &[SpellBonuses]) -> u32 {
    bonuses
        .iter()
        .fold(0u32, |acc, b| acc.saturating_add(b.bonus_cantrips))
}

/// Sum of every record's bonus prepared spells.
pub fn total_bonus_prepared(bonuses: &[SpellBonuses]) -> u32 {
    bonuses
        .iter()
        .fold(0u32, |acc, b| acc.saturating_add(b.bonus_prepared_spells))
}
