//! State for the notes application.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::store::StoreState;

/// Identifier of a note. Allocated from 1 upwards and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    pub const FIRST: NoteId = NoteId(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
}

impl Note {
    /// First line of the content with surrounding whitespace removed, or
    /// `None` if that leaves nothing.
    pub fn title(&self) -> Option<&str> {
        let title = self.content.lines().next().unwrap_or_default().trim();
        (!title.is_empty()).then_some(title)
    }
}

/// Notes application state.
///
/// Serializes as `{"nextNoteId": .., "notes": {"1": {..}}, "openNoteId": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesState {
    /// Id the next created note receives.
    pub next_note_id: NoteId,
    pub notes: BTreeMap<NoteId, Note>,
    /// Note shown in the editor, if any.
    pub open_note_id: Option<NoteId>,
}

impl Default for NotesState {
    fn default() -> Self {
        Self {
            next_note_id: NoteId::FIRST,
            notes: BTreeMap::new(),
            open_note_id: None,
        }
    }
}

impl StoreState for NotesState {}

impl NotesState {
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// The open note, if one is open and exists.
    pub fn open_note(&self) -> Option<&Note> {
        self.open_note_id.and_then(|id| self.note(id))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
