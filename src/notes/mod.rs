//! Note-taking application state.
//!
//! The worked example of the store contract:
//! - `state.rs` - Notes, their ids and the open-note cursor
//! - `action.rs` - Transition requests (create, update, open, close)
//! - `reducer.rs` - State transitions (pure, no side effects)

mod action;
mod reducer;
mod state;

pub use action::NoteAction;
pub use reducer::{NotesError, NotesReducer};
pub use state::{Note, NoteId, NotesState};

use crate::store::Store;

/// Store holding the notes application state.
pub type NotesStore = Store<NotesReducer>;

/// Create a store with the initial notes state.
pub fn create_store() -> Result<NotesStore, NotesError> {
    Store::new(NotesReducer)
}
