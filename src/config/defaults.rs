use crate::config::LogLevel;

pub(crate) fn default_wpm() -> u32 {
    crate::playback::DEFAULT_WPM
}

pub(crate) fn default_wpm_step() -> u32 {
    25
}

pub(crate) fn default_seek_seconds() -> f64 {
    5.0
}

pub(crate) fn default_checkpoint_interval_ms() -> u64 {
    2000
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_key_toggle() -> String {
    "p".to_string()
}

pub(crate) fn default_key_faster() -> String {
    "+".to_string()
}

pub(crate) fn default_key_slower() -> String {
    "-".to_string()
}

pub(crate) fn default_key_seek_forward() -> String {
    "f".to_string()
}

pub(crate) fn default_key_seek_backward() -> String {
    "b".to_string()
}

pub(crate) fn default_key_next_chapter() -> String {
    "n".to_string()
}

pub(crate) fn default_key_prev_chapter() -> String {
    "N".to_string()
}

pub(crate) fn default_key_restart() -> String {
    "r".to_string()
}

pub(crate) fn default_key_quit() -> String {
    "q".to_string()
}
