//! Spell entity as tracked on a character.
//!
//! A spell lives in exactly one roster (known or unknown). Its preparation
//! state records *how* it was prepared so the prepared-spell ceiling can tell
//! counted preparations from free ones without cross-referencing the bonus list.

use serde::{Deserialize, Serialize};

use crate::ids::SpellId;
use crate::value_objects::{SpellLevel, SpellName};

/// How (or whether) a spell is prepared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PreparationState {
    #[default]
    Unprepared,
    /// Prepared against the normal ceiling.
    PreparedNormally,
    /// Prepared for free through a bonus prepared spell from `source`.
    PreparedViaBonus { source: String },
}

impl PreparationState {
    pub fn is_prepared(&self) -> bool {
        !matches!(self, PreparationState::Unprepared)
    }

    /// Prepared and counted against the ceiling.
    pub fn counts_toward_limit(&self) -> bool {
        matches!(self, PreparationState::PreparedNormally)
    }

    pub fn bonus_source(&self) -> Option<&str> {
        match self {
            PreparationState::PreparedViaBonus { source } => Some(source),
            _ => None,
        }
    }
}

/// A spell on a character's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    id: SpellId,
    name: SpellName,
    level: SpellLevel,
    #[serde(default)]
    description: String,
    /// School of magic (e.g., "Evocation"), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    school: Option<String>,
    /// Link to the note the spell was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default)]
    preparation: PreparationState,
}

impl Spell {
    pub fn new(name: SpellName, level: SpellLevel) -> Self {
        Self {
            id: SpellId::new(),
            name,
            level,
            description: String::new(),
            school: None,
            path: None,
            preparation: PreparationState::Unprepared,
        }
    }

    // Builder-style methods for optional fields

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = Some(school.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    // Read-only accessors

    pub fn id(&self) -> SpellId {
        self.id
    }

    pub fn name(&self) -> &SpellName {
        &self.name
    }

    pub fn level(&self) -> SpellLevel {
        self.level
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn school(&self) -> Option<&str> {
        self.school.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn preparation(&self) -> &PreparationState {
        &self.preparation
    }

    pub fn is_prepared(&self) -> bool {
        self.preparation.is_prepared()
    }

    pub fn is_cantrip(&self) -> bool {
        self.level.is_cantrip()
    }

    // Crate-internal mutation (roster owns the invariants)

    pub(crate) fn set_preparation(&mut self, state: PreparationState) {
        self.preparation = state;
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = SpellId::new();
    }
}
