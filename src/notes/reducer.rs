//! Reducer for the notes application.

use std::sync::Arc;
use thiserror::Error;

use super::action::NoteAction;
use super::state::{Note, NoteId, NotesState};
use crate::store::{Incoming, Reducer};

/// Preconditions a notes action can violate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotesError {
    #[error("Note {id} does not exist")]
    NoteNotFound { id: NoteId },
}

/// Reducer for notes state transitions.
///
/// Unknown actions and the init marker return the prior state unchanged
/// (the very same `Arc`), or the default state when there is none yet.
pub struct NotesReducer;

impl Reducer for NotesReducer {
    type State = NotesState;
    type Action = NoteAction;
    type Error = NotesError;

    fn reduce(
        &self,
        state: Option<Arc<NotesState>>,
        action: Incoming<NoteAction>,
    ) -> Result<Arc<NotesState>, NotesError> {
        let state = state.unwrap_or_default();
        let action = match action {
            Incoming::Action(action) => action,
            Incoming::Init | Incoming::Unrecognized { .. } => return Ok(state),
        };

        match action {
            NoteAction::CreateNote => {
                let mut next = NotesState::clone(&state);
                let id = next.next_note_id;
                next.notes.insert(
                    id,
                    Note {
                        id,
                        content: String::new(),
                    },
                );
                next.next_note_id = id.next();
                next.open_note_id = Some(id);
                Ok(Arc::new(next))
            }

            NoteAction::UpdateNote { id, content } => {
                if !state.notes.contains_key(&id) {
                    return Err(NotesError::NoteNotFound { id });
                }
                let mut next = NotesState::clone(&state);
                if let Some(note) = next.notes.get_mut(&id) {
                    note.content = content;
                }
                Ok(Arc::new(next))
            }

            NoteAction::OpenNote { id } => Ok(Arc::new(NotesState {
                open_note_id: Some(id),
                ..NotesState::clone(&state)
            })),

            NoteAction::CloseNote => Ok(Arc::new(NotesState {
                open_note_id: None,
                ..NotesState::clone(&state)
            })),
        }
    }
}
