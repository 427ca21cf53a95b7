//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - State persistence (could swap the JSON file for a host plugin's data API)
//! - Note access (could swap the filesystem for a host vault API)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{ImportError, StoreError};
pub use external::{NoteFile, NoteSource};
pub use repos::StateStore;
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockNoteSource;
#[cfg(test)]
pub use repos::MockStateStore;
#[cfg(test)]
pub use testing::MockClockPort;
