//! Terminal host for the reader.
//!
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Extract the book on a worker thread.
//! - Either print the chapter index (`--inspect`) or play the book, reading
//!   commands from stdin and checkpointing progress into the cache.

use anyhow::{Context, Result, anyhow};
use rsvp_reader::cache::FileProgressStore;
use rsvp_reader::config::{AppConfig, load_config};
use rsvp_reader::controls::{self, ControlAction};
use rsvp_reader::document::ParsedDocument;
use rsvp_reader::extractor::extract_in_background;
use rsvp_reader::playback::PlaybackScheduler;
use rsvp_reader::playback::checkpoint::{ProgressCheckpoint, ProgressSource};
use rsvp_reader::playback::runner::{PlaybackEvent, PlaybackRunner, RunnerMessage};
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

struct CliArgs {
    book: PathBuf,
    inspect: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %args.book.display(),
        level = %config.log_level,
        "Starting reader"
    );

    let bytes = fs::read(&args.book)
        .with_context(|| format!("Failed to read {}", args.book.display()))?;
    let document = extract_in_background(bytes)
        .recv()
        .context("Extraction worker exited without a result")?
        .with_context(|| format!("Failed to extract {}", args.book.display()))?;

    if args.inspect {
        return inspect(&document);
    }
    play(document, &config, &args.book)
}

#[derive(Serialize)]
struct Inspection<'a> {
    title: &'a str,
    author: Option<&'a str>,
    words: usize,
    cover_media_type: Option<&'a str>,
    chapters: &'a [rsvp_reader::ChapterMark],
}

fn inspect(document: &ParsedDocument) -> Result<()> {
    let report = Inspection {
        title: &document.title,
        author: document.author.as_deref(),
        words: document.word_count(),
        cover_media_type: document
            .cover_image
            .as_ref()
            .map(|cover| cover.media_type.as_str()),
        chapters: &document.chapters,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn play(document: ParsedDocument, config: &AppConfig, book: &Path) -> Result<()> {
    if document.is_empty() {
        return Err(anyhow!("{} contains no readable words", book.display()));
    }

    let store = FileProgressStore::new(&config.cache_root(), book);
    let seed = store.load_checkpoint().unwrap_or(ProgressCheckpoint {
        word_index: 0,
        words_per_minute: config.seed_wpm(),
    });
    info!(
        title = %document.title,
        words = document.word_count(),
        chapters = document.chapters.len(),
        start = seed.word_index,
        wpm = seed.words_per_minute,
        "Opening playback session"
    );

    let scheduler = PlaybackScheduler::with_checkpoint_window(
        Arc::new(document),
        Some(seed),
        config.checkpoint_window(),
    );
    let handle = PlaybackRunner::spawn(scheduler, Box::new(store));

    let interrupt = handle.commands();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(RunnerMessage::Shutdown);
    })
    .context("Failed to install Ctrl-C handler")?;

    spawn_input_reader(config.clone(), handle.commands());
    eprintln!("{}", controls::help_text(config));

    let mut stdout = io::stdout();
    for event in handle.events().iter() {
        match event {
            PlaybackEvent::Frame(frame) => {
                let line = controls::render_frame(&frame);
                let _ = write!(stdout, "\r\x1b[2K{line}");
                let _ = stdout.flush();
            }
            PlaybackEvent::Finished => {
                let _ = writeln!(stdout);
                info!("Reached the end of the book");
            }
        }
    }
    let _ = writeln!(stdout);

    match handle.shutdown() {
        Some(state) => info!(index = state.word_index, wpm = state.words_per_minute, "Session closed"),
        None => warn!("Playback loop panicked"),
    }
    Ok(())
}

fn spawn_input_reader(config: AppConfig, commands: std::sync::mpsc::Sender<RunnerMessage>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let message = match controls::parse_command(&config, &line) {
                Some(ControlAction::Playback(command)) => RunnerMessage::Command(command),
                Some(ControlAction::Quit) => RunnerMessage::Shutdown,
                None => {
                    warn!(input = %line.trim(), "Unrecognized command");
                    continue;
                }
            };
            let quitting = message == RunnerMessage::Shutdown;
            if commands.send(message).is_err() || quitting {
                return;
            }
        }
        let _ = commands.send(RunnerMessage::Shutdown);
    });
}

fn parse_args() -> Result<CliArgs> {
    let mut book = None;
    let mut inspect = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--inspect" => inspect = true,
            _ if book.is_none() => book = Some(PathBuf::from(arg)),
            _ => return Err(anyhow!("Unexpected argument: {arg}")),
        }
    }
    let book = book.ok_or_else(|| anyhow!("Usage: rsvp-reader <book.epub> [--inspect]"))?;
    if !book.exists() {
        return Err(anyhow!("File not found: {}", book.display()));
    }
    Ok(CliArgs { book, inspect })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
