//! Plain-text note app, connected to the store through a bridge.

use std::io::Write;

use super::output::SharedOutput;
use crate::connect::{ConnectedProps, Consumer};
use crate::notes::{Note, NoteAction, NoteId, NotesError, NotesReducer, NotesState};
use crate::store::{DispatchError, Dispatcher};

/// State props: either the open note or the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteListing {
    pub open: Option<Note>,
    pub notes: Vec<Note>,
}

impl NoteListing {
    pub fn from_state(state: &NotesState) -> Self {
        Self {
            open: state.open_note().cloned(),
            notes: state.notes.values().cloned().collect(),
        }
    }
}

/// Dispatch props: the commands the note app's controls trigger.
#[derive(Debug, Clone)]
pub struct NoteCommands {
    dispatcher: Dispatcher<NotesReducer>,
}

impl NoteCommands {
    pub fn new(dispatcher: &Dispatcher<NotesReducer>) -> Self {
        Self {
            dispatcher: dispatcher.clone(),
        }
    }

    pub fn add_note(&self) -> Result<(), DispatchError<NotesError>> {
        self.dispatcher.dispatch(NoteAction::CreateNote)
    }

    pub fn change_note(&self, id: NoteId, content: &str) -> Result<(), DispatchError<NotesError>> {
        self.dispatcher.dispatch(NoteAction::UpdateNote {
            id,
            content: content.to_string(),
        })
    }

    pub fn open_note(&self, id: NoteId) -> Result<(), DispatchError<NotesError>> {
        self.dispatcher.dispatch(NoteAction::OpenNote { id })
    }

    pub fn close_note(&self) -> Result<(), DispatchError<NotesError>> {
        self.dispatcher.dispatch(NoteAction::CloseNote)
    }
}

pub type NoteAppProps = ConnectedProps<NoteListing, NoteCommands, ()>;

/// Text for one frame of the note app.
///
/// An open note shows as an editor; otherwise every note is listed by title.
pub fn render_text(listing: &NoteListing) -> String {
    let mut lines = Vec::new();
    match &listing.open {
        Some(note) => {
            lines.push(format!("== Note {} ==", note.id));
            if !note.content.is_empty() {
                lines.push(note.content.clone());
            }
            lines.push("[Close]".to_string());
        }
        None => {
            lines.extend(
                listing
                    .notes
                    .iter()
                    .map(|note| format!("- {}", note.title().unwrap_or("Untitled"))),
            );
            lines.push("[New Note]".to_string());
        }
    }
    lines.join("\n")
}

/// Consumer that prints every frame to a shared output.
pub struct NoteAppView<W> {
    output: SharedOutput<W>,
    frames: usize,
}

impl<W: Write> NoteAppView<W> {
    pub fn new(output: SharedOutput<W>) -> Self {
        Self { output, frames: 0 }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl<W: Write + Send + 'static> Consumer for NoteAppView<W> {
    type Props = NoteAppProps;

    fn render(&mut self, props: &NoteAppProps) {
        self.frames += 1;
        self.output.emit(&render_text(&props.state));
    }
}
