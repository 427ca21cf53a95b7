//! Spell slot and preparation accounting for a D&D 5e spellcaster.
//!
//! Pure domain logic: no I/O, no async. The `spelltracker-engine` crate wires
//! this into persistence and note scanning.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{CharacterProfile, NoteContribution, Spellcaster};

pub use entities::{
    count_toward_limit, daily_tasks, max_cantrips, max_prepared, total_bonus_cantrips,
    total_bonus_prepared, BonusPreparedSpell, BonusPreparedStatus, BonusSlot, DailyTask,
    ExtraSpellUse, ExtraUseLedger, LevelFilter, PreparationLimits, PreparationState, SlotEntry,
    SlotLedger, Spell, SpellBonuses, SpellRoster, TaskChecklist,
};

pub use error::DomainError;

pub use events::{
    CastOutcome, PreparationChange, ProfileChange, RecoveryOutcome, RestOutcome, ScanOutcome,
};

pub use game_systems::{
    cantrips_for_class_level, resolve_cast, slots_for_level, spellbook_capacity, CasterCategory,
    CharacterClass, SlotRow,
};

pub use ids::SpellId;

pub use value_objects::{
    check_slot_level, name_key, AutoResetPolicy, CharacterLevel, CharacterName, EntryOrigin,
    SpellLevel, SpellName, MAX_CHARACTER_LEVEL, MAX_SPELL_LEVEL,
};
