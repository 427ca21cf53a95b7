//! Persistence port for the tracker state.

use async_trait::async_trait;
use spelltracker_domain::Spellcaster;

use super::error::StoreError;

/// Whole-object storage for the spellcaster.
///
/// The state is read whole and written whole; there is no partial update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Spellcaster>, StoreError>;
    async fn save(&self, state: &Spellcaster) -> Result<(), StoreError>;
}
