//! Actions for the notes application.

use serde::{Deserialize, Serialize};

use super::state::NoteId;
use crate::store::Action;

/// Actions that can be dispatched to the notes reducer.
///
/// The untyped form carries the variant in a `type` field, e.g.
/// `{"type": "UPDATE_NOTE", "id": 1, "content": "hi"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteAction {
    /// Allocate the next id, add an empty note and open it.
    CreateNote,

    /// Replace the content of an existing note.
    UpdateNote { id: NoteId, content: String },

    OpenNote { id: NoteId },

    CloseNote,
}

impl NoteAction {
    pub const CREATE_NOTE: &'static str = "CREATE_NOTE";
    pub const UPDATE_NOTE: &'static str = "UPDATE_NOTE";
    pub const OPEN_NOTE: &'static str = "OPEN_NOTE";
    pub const CLOSE_NOTE: &'static str = "CLOSE_NOTE";
}

impl Action for NoteAction {
    const KINDS: &'static [&'static str] = &[
        Self::CREATE_NOTE,
        Self::UPDATE_NOTE,
        Self::OPEN_NOTE,
        Self::CLOSE_NOTE,
    ];

    fn kind(&self) -> &'static str {
        match self {
            NoteAction::CreateNote => Self::CREATE_NOTE,
            NoteAction::UpdateNote { .. } => Self::UPDATE_NOTE,
            NoteAction::OpenNote { .. } => Self::OPEN_NOTE,
            NoteAction::CloseNote => Self::CLOSE_NOTE,
        }
    }
}
