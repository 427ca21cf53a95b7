//! Domain events
//!
//! Return types from aggregate mutations, communicating what happened when
//! state was modified.

pub mod spellcasting_events;

pub use spellcasting_events::*;
