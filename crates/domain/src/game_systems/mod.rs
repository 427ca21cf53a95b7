//! D&D 5th edition spellcasting rules.
//!
//! Progression tables and the cast resolver. Both are pure functions over
//! the ledgers in `entities`.

mod casting;
mod progression;

pub use casting::resolve_cast;
pub use progression::{
    cantrips_for_class_level, slots_for_level, spellbook_capacity, CasterCategory,
    CharacterClass, SlotRow,
};
