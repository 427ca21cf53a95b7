//! Value objects - Immutable objects defined by their attributes

mod levels;
mod names;
mod origin;
mod settings;

pub use levels::{
    check_slot_level, CharacterLevel, SpellLevel, MAX_CHARACTER_LEVEL, MAX_SPELL_LEVEL,
};
pub use names::{name_key, CharacterName, SpellName};
pub use origin::EntryOrigin;
pub use settings::AutoResetPolicy;
