//! Single-threaded event loop around [`PlaybackScheduler`].
//!
//! Commands and tick deadlines are serialised through one thread, so a
//! command can never interleave with a tick. Checkpoints go to the progress
//! sink; display updates go back to the caller as [`PlaybackEvent`]s.

use super::checkpoint::ProgressSink;
use super::{PlaybackCommand, PlaybackEffect, PlaybackScheduler, PlaybackState, PlaybackStatus};
use crate::focal::FocalSplit;
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum RunnerMessage {
    Command(PlaybackCommand),
    /// Pause (which checkpoints) and stop the loop.
    Shutdown,
}

/// Everything a display needs to draw the current word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFrame {
    pub word_index: usize,
    pub word_count: usize,
    pub split: Option<FocalSplit>,
    pub chapter: Option<String>,
    pub words_per_minute: u32,
    pub running: bool,
    pub completed: bool,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Frame(PlaybackFrame),
    Finished,
}

pub struct RunnerHandle {
    commands: Sender<RunnerMessage>,
    events: Receiver<PlaybackEvent>,
    join: JoinHandle<PlaybackState>,
}

impl RunnerHandle {
    /// Queue a command; returns false once the loop has stopped.
    pub fn send(&self, command: PlaybackCommand) -> bool {
        self.commands.send(RunnerMessage::Command(command)).is_ok()
    }

    pub fn commands(&self) -> Sender<RunnerMessage> {
        self.commands.clone()
    }

    pub fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.events
    }

    /// Stop the loop and wait for it, returning the final state.
    pub fn shutdown(self) -> Option<PlaybackState> {
        let _ = self.commands.send(RunnerMessage::Shutdown);
        self.join.join().ok()
    }
}

pub struct PlaybackRunner;

impl PlaybackRunner {
    pub fn spawn(scheduler: PlaybackScheduler, sink: Box<dyn ProgressSink>) -> RunnerHandle {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let join = thread::spawn(move || run_loop(scheduler, sink, command_rx, event_tx));
        RunnerHandle {
            commands: command_tx,
            events: event_rx,
            join,
        }
    }
}

fn run_loop(
    mut scheduler: PlaybackScheduler,
    sink: Box<dyn ProgressSink>,
    commands: Receiver<RunnerMessage>,
    events: Sender<PlaybackEvent>,
) -> PlaybackState {
    info!(
        words = scheduler.document().word_count(),
        start = scheduler.word_index(),
        wpm = scheduler.words_per_minute(),
        "Playback loop started"
    );
    let _ = events.send(PlaybackEvent::Frame(frame(&scheduler)));

    loop {
        match wait_for_wakeup(&scheduler, &commands) {
            Wakeup::Command(command) => {
                let effects = scheduler.apply(command, Instant::now());
                dispatch(&scheduler, effects, sink.as_ref(), &events);
                // Speed and play/pause changes have no effect of their own.
                let _ = events.send(PlaybackEvent::Frame(frame(&scheduler)));
            }
            Wakeup::Tick(due) => {
                let effects = scheduler.tick(Instant::now().max(due));
                dispatch(&scheduler, effects, sink.as_ref(), &events);
            }
            Wakeup::Shutdown => {
                let effects = scheduler.pause(Instant::now());
                dispatch(&scheduler, effects, sink.as_ref(), &events);
                break;
            }
        }
    }

    info!(
        index = scheduler.word_index(),
        wpm = scheduler.words_per_minute(),
        "Playback loop stopped"
    );
    scheduler.state()
}

#[derive(Debug, Clone, PartialEq)]
enum Wakeup {
    Command(PlaybackCommand),
    Tick(Instant),
    Shutdown,
}

/// Block until the pending tick is due or a message arrives. An overdue tick
/// is fired before any queued command so input cannot starve playback.
fn wait_for_wakeup(scheduler: &PlaybackScheduler, commands: &Receiver<RunnerMessage>) -> Wakeup {
    let received = match scheduler.next_deadline() {
        Some(due) => {
            let wait = due.saturating_duration_since(Instant::now());
            if wait.is_zero() {
                return Wakeup::Tick(due);
            }
            match commands.recv_timeout(wait) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => return Wakeup::Tick(due),
                Err(RecvTimeoutError::Disconnected) => RunnerMessage::Shutdown,
            }
        }
        None => commands.recv().unwrap_or(RunnerMessage::Shutdown),
    };
    match received {
        RunnerMessage::Command(command) => Wakeup::Command(command),
        RunnerMessage::Shutdown => Wakeup::Shutdown,
    }
}

fn dispatch(
    scheduler: &PlaybackScheduler,
    effects: Vec<PlaybackEffect>,
    sink: &dyn ProgressSink,
    events: &Sender<PlaybackEvent>,
) {
    for effect in effects {
        match effect {
            PlaybackEffect::WordChanged { .. } => {
                let _ = events.send(PlaybackEvent::Frame(frame(scheduler)));
            }
            PlaybackEffect::Checkpoint(checkpoint) => {
                debug!(
                    index = checkpoint.word_index,
                    wpm = checkpoint.words_per_minute,
                    "Checkpoint"
                );
                sink.on_checkpoint(checkpoint);
            }
            PlaybackEffect::Finished => {
                let _ = events.send(PlaybackEvent::Finished);
            }
        }
    }
}

pub fn frame(scheduler: &PlaybackScheduler) -> PlaybackFrame {
    PlaybackFrame {
        word_index: scheduler.word_index(),
        word_count: scheduler.document().word_count(),
        split: scheduler.focal_split(),
        chapter: scheduler.current_chapter().map(|mark| mark.title.clone()),
        words_per_minute: scheduler.words_per_minute(),
        running: scheduler.is_running(),
        completed: scheduler.status() == PlaybackStatus::Completed,
        progress: scheduler.progress_fraction(),
    }
}
