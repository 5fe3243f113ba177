//! Replay loop: dispatch every script step and keep a renderer attached.

use std::io::{self, Write};
use thiserror::Error;

use super::output::SharedOutput;
use super::script::ScriptStep;
use super::view::{NoteAppView, NoteCommands, NoteListing};
use crate::config::RenderMode;
use crate::connect::connect;
use crate::notes::{self, NotesError, NotesReducer, NotesState, NotesStore};
use crate::store::{DispatchError, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub render: RenderMode,
    pub pretty: bool,
    /// Report failed steps instead of stopping at the first one.
    pub keep_going: bool,
}

/// Counts of what happened to the script's steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub rejected: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to create store: {0}")]
    Store(#[source] NotesError),

    #[error("Action on line {line} rejected: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: DispatchError<NotesError>,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Keeps a renderer attached to the store until dropped.
///
/// The JSON subscriber holds a clone of the store, so it must be removed
/// from the registry on every exit path or the store never goes away.
enum Renderer {
    Json(Option<Subscription>),
    View(Option<Box<dyn FnOnce()>>),
}

impl Drop for Renderer {
    fn drop(&mut self) {
        match self {
            Renderer::Json(subscription) => {
                if let Some(subscription) = subscription.take() {
                    subscription.unsubscribe();
                }
            }
            Renderer::View(unmount) => {
                if let Some(unmount) = unmount.take() {
                    unmount();
                }
            }
        }
    }
}

/// Create a notes store, attach the configured renderer and dispatch every
/// step through the untyped path.
///
/// The renderer draws once for the initial state and once per applied step.
/// Failed steps go to `errors`; without `keep_going` the first one ends the run.
pub fn run<W, E>(
    options: &RunOptions,
    steps: &[ScriptStep],
    out: W,
    mut errors: E,
) -> Result<RunSummary, RunError>
where
    W: Write + Send + 'static,
    E: Write,
{
    let store = notes::create_store().map_err(RunError::Store)?;
    let output = SharedOutput::new(out);
    let renderer = attach(&store, &output, options);

    let mut summary = RunSummary::default();
    let mut failure = None;
    for step in steps {
        match store.dispatch_raw(&step.action) {
            Ok(()) => summary.applied += 1,
            Err(source) => {
                summary.rejected += 1;
                tracing::warn!(line = step.line, error = %source, "Action rejected");
                writeln!(errors, "error: line {}: {}", step.line, source)?;
                if !options.keep_going {
                    failure = Some(RunError::Rejected {
                        line: step.line,
                        source,
                    });
                    break;
                }
            }
        }
    }

    drop(renderer);
    if let Some(err) = output.take_error() {
        return Err(RunError::Output(err));
    }
    if let Some(failure) = failure {
        return Err(failure);
    }

    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        subscribers = store.subscriber_count(),
        "Script finished"
    );
    Ok(summary)
}

fn attach<W>(store: &NotesStore, output: &SharedOutput<W>, options: &RunOptions) -> Renderer
where
    W: Write + Send + 'static,
{
    match options.render {
        RenderMode::Json => {
            let pretty = options.pretty;
            let draw = {
                let output = output.clone();
                move |state: &NotesState| match format_state(state, pretty) {
                    Ok(text) => output.emit(&text),
                    Err(err) => output.fail(io::Error::other(err)),
                }
            };
            draw(&*store.state());

            let reader = store.clone();
            Renderer::Json(Some(store.subscribe(move || draw(&*reader.state()))))
        }
        RenderMode::View => {
            let bridge = connect::<NotesReducer>()
                .map_state(NoteListing::from_state)
                .map_dispatch(NoteCommands::new)
                .wrap(NoteAppView::new(output.clone()))
                .mount(store, ());
            Renderer::View(Some(Box::new(move || bridge.unmount())))
        }
    }
}

/// State as JSON, mirroring what the subscriber prints.
pub(crate) fn format_state(state: &NotesState, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_script;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Write end whose contents stay readable after `run` takes ownership.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    fn options(render: RenderMode, keep_going: bool) -> RunOptions {
        RunOptions {
            render,
            pretty: false,
            keep_going,
        }
    }

    const SCRIPT: &str = r#"
{"type": "CREATE_NOTE"}
{"type": "UPDATE_NOTE", "id": 1, "content": "hi"}
"#;

    #[test]
    fn json_mode_prints_every_state() {
        let out = Capture::default();
        let mut errors = Vec::new();
        let steps = parse_script(SCRIPT).unwrap();

        let summary =
            run(&options(RenderMode::Json, false), &steps, out.clone(), &mut errors).unwrap();

        assert_eq!(summary, RunSummary { applied: 2, rejected: 0 });
        let text = out.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"nextNoteId":1,"notes":{},"openNoteId":null}"#,
                r#"{"nextNoteId":2,"notes":{"1":{"id":1,"content":""}},"openNoteId":1}"#,
                r#"{"nextNoteId":2,"notes":{"1":{"id":1,"content":"hi"}},"openNoteId":1}"#,
            ]
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn invalid_action_stops_run() {
        let out = Capture::default();
        let mut errors = Vec::new();
        let steps =
            parse_script("{\"type\":\"CREATE_NOTE\"}\n{}\n{\"type\":\"CLOSE_NOTE\"}\n").unwrap();

        let err = run(&options(RenderMode::Json, false), &steps, out.clone(), &mut errors)
            .unwrap_err();

        assert!(matches!(err, RunError::Rejected { line: 2, .. }));
        assert_eq!(out.text().lines().count(), 2);
        let errors = String::from_utf8(errors).unwrap();
        assert_eq!(errors, "error: line 2: Action must have a type\n");
    }

    #[test]
    fn keep_going_skips_failed_steps() {
        let out = Capture::default();
        let mut errors = Vec::new();
        let steps = parse_script(
            "null\n{\"type\":\"UPDATE_NOTE\",\"id\":5,\"content\":\"x\"}\n{\"type\":\"CREATE_NOTE\"}\n",
        )
        .unwrap();

        let summary =
            run(&options(RenderMode::Json, true), &steps, out.clone(), &mut errors).unwrap();

        assert_eq!(summary, RunSummary { applied: 1, rejected: 2 });
        assert_eq!(out.text().lines().count(), 2);
        let errors = String::from_utf8(errors).unwrap();
        assert!(errors.contains("line 1: Action must be an object, got nothing"));
        assert!(errors.contains("line 2: Reducer rejected action: Note 5 does not exist"));
    }

    #[test]
    fn view_mode_renders_through_bridge() {
        let out = Capture::default();
        let steps = parse_script(
            "{\"type\":\"CREATE_NOTE\"}\n{\"type\":\"UPDATE_NOTE\",\"id\":1,\"content\":\"Shopping\\nmilk\"}\n{\"type\":\"CLOSE_NOTE\"}\n",
        )
        .unwrap();

        run(&options(RenderMode::View, false), &steps, out.clone(), io::sink()).unwrap();

        let frames = out.text();
        assert_eq!(
            frames,
            "[New Note]\n\
             == Note 1 ==\n[Close]\n\
             == Note 1 ==\nShopping\nmilk\n[Close]\n\
             - Shopping\n[New Note]\n"
        );
    }

    /// Write end that counts how often it is dropped.
    struct DropCounter(Arc<AtomicUsize>);

    impl Write for DropCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Unwritable;

    impl Write for Unwritable {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_error_report_still_releases_output() {
        let steps = parse_script("{}\n").unwrap();

        for render in [RenderMode::Json, RenderMode::View] {
            let drops = Arc::new(AtomicUsize::new(0));
            let err = run(
                &options(render, true),
                &steps,
                DropCounter(Arc::clone(&drops)),
                Unwritable,
            )
            .unwrap_err();

            assert!(matches!(err, RunError::Output(_)));
            assert_eq!(drops.load(Ordering::SeqCst), 1, "{render:?}");
        }
    }

    #[test]
    fn finished_run_releases_output() {
        let drops = Arc::new(AtomicUsize::new(0));
        let steps = parse_script(SCRIPT).unwrap();

        run(
            &options(RenderMode::Json, false),
            &steps,
            DropCounter(Arc::clone(&drops)),
            io::sink(),
        )
        .unwrap();

        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pretty_format_spans_lines() {
        let text = format_state(&NotesState::default(), true).unwrap();
        assert!(text.contains("\n  \"nextNoteId\": 1"));
    }
}
