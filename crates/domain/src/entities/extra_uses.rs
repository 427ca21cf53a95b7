//! Free casts of named spells, granted by items or features.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{name_key, EntryOrigin, SpellName};

/// Free casts of one spell from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraSpellUse {
    spell_name: SpellName,
    uses: u32,
    uses_remaining: u32,
    #[serde(default)]
    source: String,
    #[serde(default)]
    origin: EntryOrigin,
}

impl ExtraSpellUse {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for zero uses.
    pub fn new(
        spell_name: SpellName,
        uses: u32,
        source: impl Into<String>,
        origin: EntryOrigin,
    ) -> Result<Self, DomainError> {
        if uses == 0 {
            return Err(DomainError::validation("Extra uses must be positive"));
        }
        Ok(Self {
            spell_name,
            uses,
            uses_remaining: uses,
            source: source.into(),
            origin,
        })
    }

    pub fn spell_name(&self) -> &SpellName {
        &self.spell_name
    }

    pub fn uses(&self) -> u32 {
        self.uses
    }

    pub fn uses_remaining(&self) -> u32 {
        self.uses_remaining
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> &EntryOrigin {
        &self.origin
    }

    fn same_entry(&self, key: &str, source: &str) -> bool {
        self.spell_name.key() == key && self.source == source
    }
}

/// All extra-use records of a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ExtraSpellUse>", into = "Vec<ExtraSpellUse>")]
pub struct ExtraUseLedger {
    entries: Vec<ExtraSpellUse>,
}

impl From<Vec<ExtraSpellUse>> for ExtraUseLedger {
    /// Saved records with zero uses are dropped; remaining is capped at uses.
    fn from(entries: Vec<ExtraSpellUse>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| e.uses > 0)
            .map(|mut e| {
                e.uses_remaining = e.uses_remaining.min(e.uses);
                e
            })
            .collect();
        Self { entries }
    }
}

impl From<ExtraUseLedger> for Vec<ExtraSpellUse> {
    fn from(ledger: ExtraUseLedger) -> Self {
        ledger.entries
    }
}

impl ExtraUseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ExtraSpellUse] {
        &self.entries
    }

    /// Remaining free casts of a spell across every source.
    pub fn remaining(&self, spell_name: &str) -> u32 {
        let key = name_key(spell_name);
        self.entries
            .iter()
            .filter(|e| e.spell_name.key() == key)
            .map(|e| e.uses_remaining)
            .sum()
    }

    /// Add uses, merging into an existing record with the same name, source
    /// and origin. Manual and scanned records never merge.
    pub fn add_use(&mut self, entry: ExtraSpellUse) {
        let key = entry.spell_name.key();
        match self
            .entries
            .iter_mut()
            .find(|e| e.same_entry(&key, &entry.source) && e.origin == entry.origin)
        {
            Some(existing) => {
                existing.uses = existing.uses.saturating_add(entry.uses);
                existing.uses_remaining =
                    existing.uses_remaining.saturating_add(entry.uses_remaining);
            }
            None => self.entries.push(entry),
        }
    }

    /// Spend one free cast of a spell.
    ///
    /// Returns the uses left on the consumed record.
    ///
    /// # Errors
    ///
    /// `DomainError::NoExtraUses` when no record for the spell has a use left.
    pub fn consume(&mut self, spell_name: &str) -> Result<u32, DomainError> {
        let key = name_key(spell_name);
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.spell_name.key() == key && e.uses_remaining > 0)
            .ok_or_else(|| DomainError::NoExtraUses(spell_name.to_string()))?;
        entry.uses_remaining -= 1;
        Ok(entry.uses_remaining)
    }

    /// Long rest. Returns how many uses had been spent.
    pub fn restore_all(&mut self) -> u32 {
        self.entries
            .iter_mut()
            .map(|e| {
                let spent = e.uses.saturating_sub(e.uses_remaining);
                e.uses_remaining = e.uses;
                spent
            })
            .sum()
    }

    /// Remove the record for `(spell_name, source)`.
    pub fn remove(&mut self, spell_name: &str, source: &str) -> Result<ExtraSpellUse, DomainError> {
        let key = name_key(spell_name);
        let position = self
            .entries
            .iter()
            .position(|e| e.same_entry(&key, source))
            .ok_or_else(|| DomainError::not_found("ExtraSpellUse", spell_name))?;
        Ok(self.entries.remove(position))
    }

    /// Replace everything previously scanned from `source_file`.
    pub fn replace_scanned(&mut self, source_file: &str, entries: Vec<ExtraSpellUse>) {
        self.entries.retain(|e| !e.origin.is_from_file(source_file));
        for mut entry in entries {
            entry.origin = EntryOrigin::scanned(source_file);
            self.add_use(entry);
        }
    }

    /// Drop scanned records whose file is no longer present.
    pub fn retain_scanned_files(&mut self, keep: &dyn Fn(&str) -> bool) {
        self.entries
            .retain(|e| e.origin.source_file().map(keep).unwrap_or(true));
    }
}
