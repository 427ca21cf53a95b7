//! Spell tracker engine library.
//!
//! Persistence, note scanning and the tracker use case around
//! `spelltracker-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - Tracker operations: mutate the aggregate, then persist
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `config` - Environment-driven settings
//! - `logging` - Tracing subscriber setup
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod logging;
pub mod use_cases;

pub use app::App;
pub use config::TrackerConfig;
pub use use_cases::{ImportSummary, SpellTracker, TrackerError};
