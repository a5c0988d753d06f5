use crate::config::defaults;
use crate::playback;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Flattened reader configuration; the on-disk form is sectioned.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_wpm")]
    pub default_wpm: u32,
    #[serde(default = "crate::config::defaults::default_wpm_step")]
    pub wpm_step: u32,
    #[serde(default = "crate::config::defaults::default_seek_seconds")]
    pub seek_seconds: f64,
    #[serde(default = "crate::config::defaults::default_checkpoint_interval_ms")]
    pub checkpoint_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_key_toggle")]
    pub key_toggle: String,
    #[serde(default = "crate::config::defaults::default_key_faster")]
    pub key_faster: String,
    #[serde(default = "crate::config::defaults::default_key_slower")]
    pub key_slower: String,
    #[serde(default = "crate::config::defaults::default_key_seek_forward")]
    pub key_seek_forward: String,
    #[serde(default = "crate::config::defaults::default_key_seek_backward")]
    pub key_seek_backward: String,
    #[serde(default = "crate::config::defaults::default_key_next_chapter")]
    pub key_next_chapter: String,
    #[serde(default = "crate::config::defaults::default_key_prev_chapter")]
    pub key_prev_chapter: String,
    #[serde(default = "crate::config::defaults::default_key_restart")]
    pub key_restart: String,
    #[serde(default = "crate::config::defaults::default_key_quit")]
    pub key_quit: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_wpm: defaults::default_wpm(),
            wpm_step: defaults::default_wpm_step(),
            seek_seconds: defaults::default_seek_seconds(),
            checkpoint_interval_ms: defaults::default_checkpoint_interval_ms(),
            key_toggle: defaults::default_key_toggle(),
            key_faster: defaults::default_key_faster(),
            key_slower: defaults::default_key_slower(),
            key_seek_forward: defaults::default_key_seek_forward(),
            key_seek_backward: defaults::default_key_seek_backward(),
            key_next_chapter: defaults::default_key_next_chapter(),
            key_prev_chapter: defaults::default_key_prev_chapter(),
            key_restart: defaults::default_key_restart(),
            key_quit: defaults::default_key_quit(),
            log_level: defaults::default_log_level(),
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

impl AppConfig {
    /// Configured starting speed, clamped to the supported range.
    pub fn seed_wpm(&self) -> u32 {
        playback::clamp_wpm(i64::from(self.default_wpm))
    }

    /// Speed step for the faster/slower keys; never zero.
    pub fn speed_step(&self) -> i32 {
        i32::try_from(self.wpm_step).unwrap_or(i32::MAX).max(1)
    }

    pub fn checkpoint_window(&self) -> Duration {
        Duration::from_millis(self.checkpoint_interval_ms)
    }

    pub fn cache_root(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
