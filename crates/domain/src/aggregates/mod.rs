//! Aggregate roots - domain objects that own their related data
//!
//! The spellcaster owns every ledger outright: slots, rosters, bonuses, extra
//! uses and tasks. Mutations go through its methods and return domain events.

pub mod spellcaster;

pub use spellcaster::{CharacterProfile, NoteContribution, Spellcaster};
