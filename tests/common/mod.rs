//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use minidux::notes::{create_store, NoteAction, NoteId, NotesStore};
use minidux::store::Subscription;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Log of labels pushed by subscribers, in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

/// Fresh notes store.
pub fn notes_store() -> NotesStore {
    create_store().expect("notes store init never fails")
}

/// Subscribe a handler that records `label` each time it runs.
pub fn record(store: &NotesStore, log: &CallLog, label: &str) -> Subscription {
    let log = Arc::clone(log);
    let label = label.to_string();
    store.subscribe(move || log.lock().push(label.clone()))
}

pub fn update(id: u64, content: &str) -> NoteAction {
    NoteAction::UpdateNote {
        id: NoteId::new(id),
        content: content.to_string(),
    }
}

/// Write `content` to a file in a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}
