// SPDX-License-Identifier: MIT
//
// kilt — a small raw-mode terminal text viewer.
//
// This is the binary that wires the two crates together:
//
//   kilt-term   → raw mode, window size, key decoding, event loop
//   kilt-editor → line buffer, cursor, viewport, frame composition
//
// Startup order matters: raw mode first (so the size query's reply is not
// echoed), then the window size, then the file. Every step can fail, and
// any failure clears the screen, restores the terminal and exits 1.
//
// stdout is the display, so logs never go there. They are written to the
// file named by --log-file (or KILT_LOG_FILE) and are off otherwise.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kilt_editor::editor::Editor;
use kilt_term::ansi;
use kilt_term::event_loop::EventLoop;
use kilt_term::output::StdoutSink;
use kilt_term::reader::StdinSource;
use kilt_term::terminal::{Size, Terminal, window_size};

/// A small raw-mode terminal text viewer
#[derive(Parser, Debug)]
#[command(name = "kilt", version, about, long_about = None)]
struct Cli {
    /// File to view; without one, kilt opens an empty screen
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write diagnostics to this file (filtered by RUST_LOG, default info)
    #[arg(long, value_name = "PATH", env = "KILT_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Size the editor and load the file, if one was named.
fn prepare(size: Size, file: Option<&Path>) -> Result<Editor> {
    info!(rows = size.rows, cols = size.cols, "screen");
    let mut editor = Editor::new(size);
    if let Some(path) = file {
        editor.open(path)?;
    }
    Ok(editor)
}

fn run(cli: &Cli) -> Result<()> {
    let mut term = Terminal::new();
    term.enable().context("cannot enter raw mode")?;

    let mut src = StdinSource::new();
    let mut out = StdoutSink::new();
    let size = window_size(&mut src, &mut out)?;
    let mut editor = prepare(size, cli.file.as_deref())?;

    EventLoop::new(src, out).run(&mut editor)?;
    term.disable()?;
    Ok(())
}

/// Clear the screen, print the error chain to stderr and pick the exit
/// status. Raw mode is already off: `run` dropped its `Terminal`.
fn report_fatal(out: &mut impl Write, err: &anyhow::Error) -> ExitCode {
    error!("{err:#}");
    let _ = ansi::clear_and_home(out);
    let _ = out.flush();
    eprintln!("kilt: {err:#}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_file.as_deref()) {
        eprintln!("kilt: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_fatal(&mut StdoutSink::new(), &err),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
