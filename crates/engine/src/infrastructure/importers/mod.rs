//! Content importers for vault notes.
//!
//! Converts spell and bonus notes into domain types.

mod note_tags;

pub use note_tags::{detect_school, parse_bonus_note, parse_spell_note, NoteSkipped};
