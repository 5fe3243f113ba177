//! Command-line front end: replay an action script through a notes store.
//!
//! ```text
//! Script → parse → dispatch_raw → Store ──notify──→ renderer → stdout
//! ```

mod output;
mod run;
mod script;
mod view;

pub use output::SharedOutput;
pub use run::{run, RunError, RunOptions, RunSummary};
pub use script::{parse_script, read_script, ScriptError, ScriptStep};
pub use view::{render_text, NoteAppProps, NoteAppView, NoteCommands, NoteListing};

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, RenderMode};

/// Replay note actions through a single-writer store and render every state.
#[derive(Debug, Parser)]
#[command(name = "minidux", version, about)]
pub struct Args {
    /// Action script: one JSON action per line, or a single JSON array.
    /// Reads stdin when omitted or "-".
    pub script: Option<PathBuf>,

    /// Config file (default: ~/.config/minidux/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured renderer
    #[arg(long, value_enum)]
    pub render: Option<RenderMode>,

    /// Print JSON on one line
    #[arg(long)]
    pub compact: bool,

    /// Report invalid or rejected actions and continue with the next one
    #[arg(long)]
    pub keep_going: bool,
}

impl Args {
    /// Merge command-line overrides over the loaded config.
    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            render: self.render.unwrap_or(config.render.mode),
            pretty: config.render.pretty && !self.compact,
            keep_going: self.keep_going,
        }
    }
}
