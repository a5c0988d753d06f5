//! Word-by-word playback.
//!
//! [`PlaybackScheduler`] is a pure state machine: callers pass the current
//! `Instant` into every command and get back the effects to dispatch. It
//! owns at most one pending tick; every mutating command cancels that tick
//! before touching state and reschedules only if playback continues. The
//! [`runner`] module drives it from a single thread.

pub mod checkpoint;
pub mod runner;

use crate::document::{ChapterMark, ParsedDocument};
use crate::focal::{self, FocalSplit};
use checkpoint::{CheckpointThrottle, ProgressCheckpoint};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const MIN_WPM: u32 = 100;
pub const MAX_WPM: u32 = 1000;
pub const DEFAULT_WPM: u32 = 300;
pub const DEFAULT_CHECKPOINT_WINDOW: Duration = Duration::from_millis(2000);

/// Delay between words at `words_per_minute`.
pub fn tick_interval(words_per_minute: u32) -> Duration {
    Duration::from_millis(60_000 / u64::from(words_per_minute.max(1)))
}

pub fn clamp_wpm(words_per_minute: i64) -> u32 {
    words_per_minute.clamp(i64::from(MIN_WPM), i64::from(MAX_WPM)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub word_index: usize,
    pub words_per_minute: u32,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Completed,
}

/// Something the owner of the scheduler must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEffect {
    WordChanged { word_index: usize },
    Checkpoint(ProgressCheckpoint),
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Toggle,
    SeekBy { words: i64 },
    SeekBySeconds { seconds: f64 },
    SeekToFraction { fraction: f64 },
    SeekToChapter { position: usize },
    NextChapter,
    PreviousChapter,
    SetSpeed { delta: i32 },
    Restart,
}

impl PlaybackCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Play => "playback_play",
            Self::Pause => "playback_pause",
            Self::Toggle => "playback_toggle",
            Self::SeekBy { .. } => "playback_seek_by",
            Self::SeekBySeconds { .. } => "playback_seek_by_seconds",
            Self::SeekToFraction { .. } => "playback_seek_to_fraction",
            Self::SeekToChapter { .. } => "playback_seek_to_chapter",
            Self::NextChapter => "playback_next_chapter",
            Self::PreviousChapter => "playback_previous_chapter",
            Self::SetSpeed { .. } => "playback_set_speed",
            Self::Restart => "playback_restart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTick {
    due: Instant,
}

pub struct PlaybackScheduler {
    document: Arc<ParsedDocument>,
    state: PlaybackState,
    status: PlaybackStatus,
    pending: Option<PendingTick>,
    throttle: CheckpointThrottle,
}

impl PlaybackScheduler {
    /// Start a session, seeded from a stored checkpoint when there is one.
    pub fn new(document: Arc<ParsedDocument>, seed: Option<ProgressCheckpoint>) -> Self {
        Self::with_checkpoint_window(document, seed, DEFAULT_CHECKPOINT_WINDOW)
    }

    pub fn with_checkpoint_window(
        document: Arc<ParsedDocument>,
        seed: Option<ProgressCheckpoint>,
        window: Duration,
    ) -> Self {
        let seed = seed.unwrap_or(ProgressCheckpoint {
            word_index: 0,
            words_per_minute: DEFAULT_WPM,
        });
        let word_index = seed
            .word_index
            .min(document.last_index().unwrap_or_default());
        Self {
            document,
            state: PlaybackState {
                word_index,
                words_per_minute: clamp_wpm(i64::from(seed.words_per_minute)),
                running: false,
            },
            status: PlaybackStatus::Idle,
            pending: None,
            throttle: CheckpointThrottle::new(window),
        }
    }

    pub fn document(&self) -> &Arc<ParsedDocument> {
        &self.document
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn word_index(&self) -> usize {
        self.state.word_index
    }

    pub fn words_per_minute(&self) -> u32 {
        self.state.words_per_minute
    }

    /// When the pending tick is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|tick| tick.due)
    }

    pub fn checkpoint(&self) -> ProgressCheckpoint {
        ProgressCheckpoint {
            word_index: self.state.word_index,
            words_per_minute: self.state.words_per_minute,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.document.word(self.state.word_index)
    }

    pub fn focal_split(&self) -> Option<FocalSplit> {
        self.current_word().map(focal::split)
    }

    pub fn current_chapter(&self) -> Option<&ChapterMark> {
        self.document.locate_chapter(self.state.word_index)
    }

    /// Fraction of the document before the current word; 1.0 once completed.
    pub fn progress_fraction(&self) -> f64 {
        if self.status == PlaybackStatus::Completed {
            return 1.0;
        }
        let total = self.document.word_count();
        if total == 0 {
            return 0.0;
        }
        self.state.word_index as f64 / total as f64
    }

    /// Time to read the words from the current one to the end at
    /// `words_per_minute`.
    pub fn eta_for_remaining(&self, words_per_minute: u32) -> Duration {
        let remaining = self
            .document
            .word_count()
            .saturating_sub(self.state.word_index);
        let millis = remaining as u64 * 60_000 / u64::from(words_per_minute.max(1));
        Duration::from_millis(millis)
    }

    pub fn apply(&mut self, command: PlaybackCommand, now: Instant) -> Vec<PlaybackEffect> {
        debug!(action = command.action(), index = self.state.word_index, "Playback command");
        match command {
            PlaybackCommand::Play => self.play(now),
            PlaybackCommand::Pause => self.pause(now),
            PlaybackCommand::Toggle => self.toggle(now),
            PlaybackCommand::SeekBy { words } => self.seek_by(words, now),
            PlaybackCommand::SeekBySeconds { seconds } => self.seek_by_seconds(seconds, now),
            PlaybackCommand::SeekToFraction { fraction } => self.seek_to_fraction(fraction, now),
            PlaybackCommand::SeekToChapter { position } => {
                match self.document.chapters.get(position).cloned() {
                    Some(mark) => self.seek_to_chapter(&mark, now),
                    None => Vec::new(),
                }
            }
            PlaybackCommand::NextChapter => self.seek_to_next_chapter(now),
            PlaybackCommand::PreviousChapter => self.seek_to_previous_chapter(now),
            PlaybackCommand::SetSpeed { delta } => self.set_speed(delta, now),
            PlaybackCommand::Restart => self.restart(now),
        }
    }

    pub fn play(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        if self.status == PlaybackStatus::Completed || self.document.is_empty() {
            return Vec::new();
        }
        if self.state.running {
            return Vec::new();
        }
        self.state.running = true;
        self.status = PlaybackStatus::Playing;
        self.schedule(now);
        Vec::new()
    }

    pub fn pause(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        self.pending = None;
        self.state.running = false;
        if self.status != PlaybackStatus::Completed {
            self.status = PlaybackStatus::Paused;
        }
        if self.document.is_empty() {
            return Vec::new();
        }
        self.throttle.mark(now);
        vec![PlaybackEffect::Checkpoint(self.checkpoint())]
    }

    pub fn toggle(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        if self.state.running {
            self.pause(now)
        } else {
            self.play(now)
        }
    }

    /// Fire the pending tick if it is due.
    pub fn tick(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        let Some(pending) = self.pending else {
            return Vec::new();
        };
        if now < pending.due {
            return Vec::new();
        }
        self.pending = None;

        let Some(last) = self.document.last_index() else {
            return Vec::new();
        };
        self.state.word_index = (self.state.word_index + 1).min(last);
        let mut effects = vec![PlaybackEffect::WordChanged {
            word_index: self.state.word_index,
        }];

        if self.state.word_index == last {
            self.state.running = false;
            self.status = PlaybackStatus::Completed;
            info!(words = last + 1, "Playback completed");
            self.throttle.mark(now);
            effects.push(PlaybackEffect::Checkpoint(self.checkpoint()));
            effects.push(PlaybackEffect::Finished);
            return effects;
        }

        self.schedule(now);
        if self.throttle.try_acquire(now) {
            effects.push(PlaybackEffect::Checkpoint(self.checkpoint()));
        }
        effects
    }

    /// Adjust speed by `delta` words per minute, clamped to the supported range.
    pub fn set_speed(&mut self, delta: i32, now: Instant) -> Vec<PlaybackEffect> {
        let target = i64::from(self.state.words_per_minute) + i64::from(delta);
        self.set_words_per_minute(target, now)
    }

    pub fn set_words_per_minute(&mut self, words_per_minute: i64, now: Instant) -> Vec<PlaybackEffect> {
        let resume = self.cancel_pending();
        self.state.words_per_minute = clamp_wpm(words_per_minute);
        debug!(wpm = self.state.words_per_minute, "Speed changed");
        if resume {
            self.schedule(now);
        }
        Vec::new()
    }

    pub fn seek_by(&mut self, words: i64, now: Instant) -> Vec<PlaybackEffect> {
        let target = (self.state.word_index as i64).saturating_add(words);
        self.seek_to_index(target, now)
    }

    /// Seek by an amount of reading time at the current speed.
    pub fn seek_by_seconds(&mut self, seconds: f64, now: Instant) -> Vec<PlaybackEffect> {
        let words = (seconds * f64::from(self.state.words_per_minute) / 60.0).round();
        let span = self.document.word_count() as f64;
        let words = if words.is_nan() {
            0.0
        } else {
            words.clamp(-span, span)
        };
        self.seek_by(words as i64, now)
    }

    pub fn seek_to_fraction(&mut self, fraction: f64, now: Instant) -> Vec<PlaybackEffect> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = (fraction * self.document.word_count() as f64).floor() as i64;
        self.seek_to_index(target, now)
    }

    pub fn seek_to_chapter(&mut self, mark: &ChapterMark, now: Instant) -> Vec<PlaybackEffect> {
        self.seek_to_index(mark.word_index as i64, now)
    }

    pub fn seek_to_next_chapter(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        let current = self.state.word_index;
        match self
            .document
            .chapters
            .iter()
            .find(|chapter| chapter.word_index > current)
            .map(|chapter| chapter.word_index)
        {
            Some(target) => self.seek_to_index(target as i64, now),
            None => Vec::new(),
        }
    }

    /// Jump to the start of the current chapter, or to the previous chapter
    /// when already at its first word.
    pub fn seek_to_previous_chapter(&mut self, now: Instant) -> Vec<PlaybackEffect> {
        let current = self.state.word_index;
        match self
            .document
            .chapters
            .iter()
            .rev()
            .find(|chapter| chapter.word_index < current)
            .map(|chapter| chapter.word_index)
        {
            Some(target) => self.seek_to_index(target as i64, now),
            None => Vec::new(),
        }
    }

    pub fn restart(&mut self, _now: Instant) -> Vec<PlaybackEffect> {
        self.cancel_pending();
        self.state.running = false;
        self.state.word_index = 0;
        if self.document.is_empty() {
            self.status = PlaybackStatus::Idle;
            return Vec::new();
        }
        self.status = PlaybackStatus::Paused;
        vec![PlaybackEffect::WordChanged { word_index: 0 }]
    }

    fn seek_to_index(&mut self, target: i64, now: Instant) -> Vec<PlaybackEffect> {
        let Some(last) = self.document.last_index() else {
            return Vec::new();
        };
        let resume = self.cancel_pending();
        self.state.word_index = target.clamp(0, last as i64) as usize;
        if self.status == PlaybackStatus::Completed && self.state.word_index < last {
            self.status = PlaybackStatus::Paused;
        }
        if resume {
            self.schedule(now);
        }
        vec![PlaybackEffect::WordChanged {
            word_index: self.state.word_index,
        }]
    }

    /// Drop the pending tick; returns whether one was scheduled.
    fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    fn schedule(&mut self, now: Instant) {
        self.pending = Some(PendingTick {
            due: now + tick_interval(self.state.words_per_minute),
        });
    }
}
