pub mod notes;

pub use notes::NoteStore;

use anyhow::Result;
use std::path::Path;

/// Opens the note store, logging where it lives.
pub async fn initialize_store(state_path: &Path) -> Result<NoteStore> {
    let store = NoteStore::open(state_path).await?;
    tracing::info!(path = %state_path.display(), "Note store ready");
    Ok(store)
}
