//! Terminal controls: line commands in, one status line out.

use crate::config::AppConfig;
use crate::playback::PlaybackCommand;
use crate::playback::runner::PlaybackFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    Playback(PlaybackCommand),
    Quit,
}

/// Map one line of input to an action using the configured keys.
///
/// Besides the single-key bindings, `g <fraction>` jumps to a position in the
/// book and `c <n>` to the n-th chapter (1-based). An empty line is `enter`.
pub fn parse_command(config: &AppConfig, line: &str) -> Option<ControlAction> {
    let trimmed = line.trim();
    if let Some((verb, arg)) = trimmed.split_once(char::is_whitespace) {
        let arg = arg.trim();
        return match verb {
            "g" => arg
                .parse::<f64>()
                .ok()
                .filter(|fraction| fraction.is_finite())
                .map(|fraction| ControlAction::Playback(PlaybackCommand::SeekToFraction { fraction })),
            "c" => arg
                .parse::<usize>()
                .ok()
                .and_then(|chapter| chapter.checked_sub(1))
                .map(|position| ControlAction::Playback(PlaybackCommand::SeekToChapter { position })),
            _ => None,
        };
    }

    let pressed = if trimmed.is_empty() {
        "enter".to_string()
    } else {
        normalize_key(trimmed, trimmed)
    };
    let step = config.speed_step();
    let bindings = [
        (&config.key_toggle, "p", ControlAction::Playback(PlaybackCommand::Toggle)),
        (&config.key_quit, "q", ControlAction::Quit),
        (
            &config.key_faster,
            "+",
            ControlAction::Playback(PlaybackCommand::SetSpeed { delta: step }),
        ),
        (
            &config.key_slower,
            "-",
            ControlAction::Playback(PlaybackCommand::SetSpeed { delta: -step }),
        ),
        (
            &config.key_seek_forward,
            "f",
            ControlAction::Playback(PlaybackCommand::SeekBySeconds {
                seconds: config.seek_seconds,
            }),
        ),
        (
            &config.key_seek_backward,
            "b",
            ControlAction::Playback(PlaybackCommand::SeekBySeconds {
                seconds: -config.seek_seconds,
            }),
        ),
        (
            &config.key_next_chapter,
            "n",
            ControlAction::Playback(PlaybackCommand::NextChapter),
        ),
        (
            &config.key_prev_chapter,
            "N",
            ControlAction::Playback(PlaybackCommand::PreviousChapter),
        ),
        (
            &config.key_restart,
            "r",
            ControlAction::Playback(PlaybackCommand::Restart),
        ),
    ];

    bindings
        .into_iter()
        .find(|(raw, fallback, _)| normalize_key(raw, fallback) == pressed)
        .map(|(_, _, action)| action)
}

/// Single characters keep their case so `n` and `N` can differ; named keys
/// are matched case-insensitively.
pub(crate) fn normalize_key(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    if trimmed.chars().count() == 1 {
        return trimmed.to_string();
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "spacebar" => "space".to_string(),
        "return" => "enter".to_string(),
        other => other.to_string(),
    }
}

/// `before[focal]after` with chapter, speed and progress.
pub fn render_frame(frame: &PlaybackFrame) -> String {
    let word = frame
        .split
        .as_ref()
        .map(|split| format!("{}[{}]{}", split.before, split.focal, split.after))
        .unwrap_or_default();
    let state = if frame.completed {
        "done"
    } else if frame.running {
        "playing"
    } else {
        "paused"
    };
    let chapter = frame.chapter.as_deref().unwrap_or("-");
    format!(
        "{word:<24} | {chapter} | {wpm} wpm | {percent:.1}% | {state}",
        wpm = frame.words_per_minute,
        percent = frame.progress * 100.0,
    )
}

pub fn help_text(config: &AppConfig) -> String {
    format!(
        "keys: {} play/pause, {}/{} speed, {}/{} seek {}s, {}/{} chapter, {} restart, {} quit, g <0-1> jump, c <n> chapter",
        config.key_toggle,
        config.key_faster,
        config.key_slower,
        config.key_seek_forward,
        config.key_seek_backward,
        config.seek_seconds,
        config.key_next_chapter,
        config.key_prev_chapter,
        config.key_restart,
        config.key_quit,
    )
}
