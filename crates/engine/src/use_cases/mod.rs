//! Use cases - orchestration of the spellcaster aggregate with its ports.

mod tracker;

pub use tracker::{ImportSummary, SpellTracker, TrackerError};
