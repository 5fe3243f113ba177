mod common;

use common::{notes_store, update};
use minidux::cli::{render_text, NoteAppView, NoteCommands, NoteListing, SharedOutput};
use minidux::connect::{connect, render_fn, ConnectedProps};
use minidux::notes::{NoteAction, NoteId, NotesReducer, NotesState};
use minidux::store::Dispatcher;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type OpenProps = ConnectedProps<Option<NoteId>, Dispatcher<NotesReducer>, &'static str>;

fn open_note_id(state: &NotesState) -> Option<NoteId> {
    state.open_note_id
}

#[test]
fn mount_renders_once_with_all_three_sources() {
    let store = notes_store();
    let seen: Arc<Mutex<Vec<OpenProps>>> = Arc::new(Mutex::new(Vec::new()));

    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn({
            let seen = Arc::clone(&seen);
            move |props: &OpenProps| seen.lock().push(props.clone())
        }))
        .mount(&store, "sidebar");

    assert_eq!(bridge.render_count(), 1);
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].state, None);
    assert_eq!(seen[0].own, "sidebar");
    assert!(seen[0].dispatch.same_store(&store.dispatcher()));
}

#[test]
fn store_changes_rerender_with_fresh_state() {
    let store = notes_store();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn({
            let seen = Arc::clone(&seen);
            move |props: &OpenProps| seen.lock().push(props.state)
        }))
        .mount(&store, "");

    store.dispatch(NoteAction::CreateNote).unwrap();
    store.dispatch(NoteAction::CloseNote).unwrap();

    assert_eq!(*seen.lock(), vec![None, Some(NoteId::new(1)), None]);
    assert_eq!(bridge.render_count(), 3);
    assert_eq!(bridge.props().state, None);
}

#[test]
fn own_props_change_rerenders() {
    let store = notes_store();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn({
            let seen = Arc::clone(&seen);
            move |props: &OpenProps| seen.lock().push(props.own)
        }))
        .mount(&store, "first");

    bridge.set_own_props("second");

    assert_eq!(*seen.lock(), vec!["first", "second"]);
    assert_eq!(bridge.props().own, "second");
}

#[test]
fn unmount_unsubscribes() {
    let store = notes_store();
    let renders = Arc::new(Mutex::new(0));

    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn({
            let renders = Arc::clone(&renders);
            move |_: &OpenProps| *renders.lock() += 1
        }))
        .mount(&store, "");
    assert_eq!(store.subscriber_count(), 1);

    bridge.unmount();
    assert_eq!(store.subscriber_count(), 0);

    store.dispatch(NoteAction::CreateNote).unwrap();
    assert_eq!(*renders.lock(), 1);
}

#[test]
fn dropping_bridge_unsubscribes() {
    let store = notes_store();
    {
        let _bridge = connect::<NotesReducer>()
            .wrap(render_fn(|_: &ConnectedProps<(), Dispatcher<NotesReducer>, ()>| {}))
            .mount(&store, ());
        assert_eq!(store.subscriber_count(), 1);
    }
    assert_eq!(store.subscriber_count(), 0);
    store.dispatch(NoteAction::CreateNote).unwrap();
}

#[test]
fn default_connect_hands_out_the_dispatcher() {
    let store = notes_store();
    let bridge = connect::<NotesReducer>()
        .wrap(render_fn(|_: &ConnectedProps<(), Dispatcher<NotesReducer>, ()>| {}))
        .mount(&store, ());

    bridge
        .props()
        .dispatch
        .dispatch(NoteAction::CreateNote)
        .unwrap();

    assert_eq!(store.state().len(), 1);
    assert_eq!(bridge.render_count(), 2);
}

#[test]
fn one_connect_wraps_many_consumers() {
    let store = notes_store();
    let log = Arc::new(Mutex::new(Vec::new()));
    let connection = connect::<NotesReducer>().map_state(open_note_id);

    let make = |label: &'static str| {
        let log = Arc::clone(&log);
        render_fn(move |props: &OpenProps| log.lock().push((label, props.state)))
    };
    let _left = connection.wrap(make("left")).mount(&store, "");
    let _right = connection.wrap(make("right")).mount(&store, "");
    log.lock().clear();

    store.dispatch(NoteAction::CreateNote).unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            ("left", Some(NoteId::new(1))),
            ("right", Some(NoteId::new(1)))
        ]
    );
}

#[test]
fn dispatch_from_render_is_folded_into_another_pass() {
    let store = notes_store();
    let seen = Arc::new(Mutex::new(Vec::new()));

    // Closes every note as soon as it is shown open.
    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn({
            let seen = Arc::clone(&seen);
            move |props: &OpenProps| {
                seen.lock().push(props.state);
                if props.state.is_some() {
                    props.dispatch.dispatch(NoteAction::CloseNote).unwrap();
                }
            }
        }))
        .mount(&store, "");

    store.dispatch(NoteAction::CreateNote).unwrap();

    assert_eq!(*seen.lock(), vec![None, Some(NoteId::new(1)), None]);
    assert_eq!(store.state().open_note_id, None);
    assert_eq!(bridge.render_count(), 3);
}

#[test]
fn note_commands_drive_the_store() {
    let store = notes_store();
    let bridge = connect::<NotesReducer>()
        .map_state(NoteListing::from_state)
        .map_dispatch(NoteCommands::new)
        .wrap(NoteAppView::new(SharedOutput::new(Vec::new())))
        .mount(&store, ());

    let commands = bridge.props().dispatch;
    commands.add_note().unwrap();
    commands.change_note(NoteId::new(1), "Groceries\nmilk").unwrap();
    assert_eq!(
        render_text(&bridge.props().state),
        "== Note 1 ==\nGroceries\nmilk\n[Close]"
    );

    commands.close_note().unwrap();
    assert_eq!(render_text(&bridge.props().state), "- Groceries\n[New Note]");

    commands.open_note(NoteId::new(1)).unwrap();
    assert_eq!(bridge.props().state.open.map(|note| note.id), Some(NoteId::new(1)));

    assert!(commands.change_note(NoteId::new(7), "ghost").is_err());
    assert_eq!(bridge.with_consumer(|view| view.frames()), 5);
}

#[test]
fn rejected_dispatch_does_not_rerender() {
    let store = notes_store();
    let bridge = connect::<NotesReducer>()
        .map_state(open_note_id)
        .wrap(render_fn(|_: &OpenProps| {}))
        .mount(&store, "");

    assert!(store.dispatch(update(3, "nope")).is_err());
    assert_eq!(bridge.render_count(), 1);
}

#[test]
fn projections_run_once_per_change() {
    let store = notes_store();
    let state_calls = Arc::new(AtomicUsize::new(0));
    let dispatch_calls = Arc::new(AtomicUsize::new(0));

    let bridge = connect::<NotesReducer>()
        .map_state({
            let calls = Arc::clone(&state_calls);
            move |state: &NotesState| {
                calls.fetch_add(1, Ordering::SeqCst);
                state.open_note_id
            }
        })
        .map_dispatch({
            let calls = Arc::clone(&dispatch_calls);
            move |dispatcher: &Dispatcher<NotesReducer>| {
                calls.fetch_add(1, Ordering::SeqCst);
                dispatcher.clone()
            }
        })
        .wrap(render_fn(|_: &OpenProps| {}))
        .mount(&store, "");

    assert_eq!(state_calls.load(Ordering::SeqCst), 1);
    assert_eq!(dispatch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(bridge.render_count(), 1);

    store.dispatch(NoteAction::CreateNote).unwrap();
    store.dispatch(NoteAction::CloseNote).unwrap();
    bridge.set_own_props("moved");

    assert_eq!(state_calls.load(Ordering::SeqCst), 4);
    assert_eq!(dispatch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(bridge.render_count(), 4);
}
