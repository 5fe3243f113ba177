use anyhow::Context;
use clap::Parser;
use std::io;

use minidux::cli::{parse_script, read_script, run, Args};
use minidux::config::Config;
use minidux::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging);

    let text = read_script(args.script.as_deref())?;
    let steps = parse_script(&text)?;
    let options = args.run_options(&config);
    tracing::debug!(steps = steps.len(), render = ?options.render, "Script loaded");

    run(&options, &steps, io::stdout(), io::stderr()).context("Script failed")?;
    Ok(())
}
