//! Note Store
//!
//! Note titles and per-note chat history kept in a single pretty-printed JSON
//! file. The whole state is cached in the handle; every mutation rewrites the
//! file while the write lock is held.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use buddy_models::{new_note_id, ChatTurn, Note, NoteState, NoteSummary};

#[derive(Clone)]
pub struct NoteStore {
    path: PathBuf,
    state: Arc<RwLock<NoteState>>,
}

impl NoteStore {
    /// Loads the state file, creating it with empty maps when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let state = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read note state {}", path.display()))?;
            serde_json::from_str::<NoteState>(&text).context("Failed to parse note state")?
        } else {
            let state = NoteState::default();
            write_state(&path, &state).await?;
            tracing::info!(path = %path.display(), "Created empty note state");
            state
        };

        tracing::info!(notes = state.notes.len(), "Note store opened");
        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list_notes(&self) -> Vec<NoteSummary> {
        self.state.read().await.summaries()
    }

    pub async fn contains(&self, note_id: &str) -> bool {
        self.state.read().await.contains(note_id)
    }

    pub async fn create_note(&self, title: &str) -> Result<NoteSummary> {
        let mut state = self.state.write().await;
        let id = new_note_id();
        state.notes.insert(id.clone(), Note::new(title));
        write_state(&self.path, &state).await?;

        tracing::info!(note_id = %id, "Note created");
        Ok(NoteSummary {
            id,
            title: title.to_string(),
        })
    }

    /// `None` when the note does not exist.
    pub async fn rename_note(&self, note_id: &str, title: &str) -> Result<Option<NoteSummary>> {
        let mut state = self.state.write().await;
        let Some(note) = state.notes.get_mut(note_id) else {
            return Ok(None);
        };
        note.title = title.to_string();
        write_state(&self.path, &state).await?;

        Ok(Some(NoteSummary {
            id: note_id.to_string(),
            title: title.to_string(),
        }))
    }

    /// Chat history of a known note; `None` for unknown ids.
    pub async fn chats(&self, note_id: &str) -> Option<Vec<ChatTurn>> {
        let state = self.state.read().await;
        if !state.contains(note_id) {
            return None;
        }
        Some(state.chats.get(note_id).cloned().unwrap_or_default())
    }

    /// Appends a turn under `note_id`, whether or not the note has metadata.
    pub async fn append_chat(&self, note_id: &str, turn: ChatTurn) -> Result<()> {
        let mut state = self.state.write().await;
        state.chats.entry(note_id.to_string()).or_default().push(turn);
        write_state(&self.path, &state).await?;

        tracing::debug!(note_id, "Chat turn appended");
        Ok(())
    }
}

async fn write_state(path: &Path, state: &NoteState) -> Result<()> {
    let text = serde_json::to_string_pretty(state).context("Failed to serialize note state")?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write note state {}", path.display()))
}
