use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    controls: ControlsConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    storage: StorageConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            default_wpm: tables.playback.default_wpm,
            wpm_step: tables.playback.wpm_step,
            seek_seconds: tables.playback.seek_seconds,
            checkpoint_interval_ms: tables.playback.checkpoint_interval_ms,
            key_toggle: tables.controls.key_toggle,
            key_faster: tables.controls.key_faster,
            key_slower: tables.controls.key_slower,
            key_seek_forward: tables.controls.key_seek_forward,
            key_seek_backward: tables.controls.key_seek_backward,
            key_next_chapter: tables.controls.key_next_chapter,
            key_prev_chapter: tables.controls.key_prev_chapter,
            key_restart: tables.controls.key_restart,
            key_quit: tables.controls.key_quit,
            log_level: tables.logging.log_level,
            cache_dir: tables.storage.cache_dir,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            playback: PlaybackConfig {
                default_wpm: config.default_wpm,
                wpm_step: config.wpm_step,
                seek_seconds: config.seek_seconds,
                checkpoint_interval_ms: config.checkpoint_interval_ms,
            },
            controls: ControlsConfig {
                key_toggle: config.key_toggle.clone(),
                key_faster: config.key_faster.clone(),
                key_slower: config.key_slower.clone(),
                key_seek_forward: config.key_seek_forward.clone(),
                key_seek_backward: config.key_seek_backward.clone(),
                key_next_chapter: config.key_next_chapter.clone(),
                key_prev_chapter: config.key_prev_chapter.clone(),
                key_restart: config.key_restart.clone(),
                key_quit: config.key_quit.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            storage: StorageConfig {
                cache_dir: config.cache_dir.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackConfig {
    #[serde(default = "defaults::default_wpm")]
    default_wpm: u32,
    #[serde(default = "defaults::default_wpm_step")]
    wpm_step: u32,
    #[serde(default = "defaults::default_seek_seconds")]
    seek_seconds: f64,
    #[serde(default = "defaults::default_checkpoint_interval_ms")]
    checkpoint_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            default_wpm: defaults::default_wpm(),
            wpm_step: defaults::default_wpm_step(),
            seek_seconds: defaults::default_seek_seconds(),
            checkpoint_interval_ms: defaults::default_checkpoint_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ControlsConfig {
    #[serde(default = "defaults::default_key_toggle")]
    key_toggle: String,
    #[serde(default = "defaults::default_key_faster")]
    key_faster: String,
    #[serde(default = "defaults::default_key_slower")]
    key_slower: String,
    #[serde(default = "defaults::default_key_seek_forward")]
    key_seek_forward: String,
    #[serde(default = "defaults::default_key_seek_backward")]
    key_seek_backward: String,
    #[serde(default = "defaults::default_key_next_chapter")]
    key_next_chapter: String,
    #[serde(default = "defaults::default_key_prev_chapter")]
    key_prev_chapter: String,
    #[serde(default = "defaults::default_key_restart")]
    key_restart: String,
    #[serde(default = "defaults::default_key_quit")]
    key_quit: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        ControlsConfig {
            key_toggle: defaults::default_key_toggle(),
            key_faster: defaults::default_key_faster(),
            key_slower: defaults::default_key_slower(),
            key_seek_forward: defaults::default_key_seek_forward(),
            key_seek_backward: defaults::default_key_seek_backward(),
            key_next_chapter: defaults::default_key_next_chapter(),
            key_prev_chapter: defaults::default_key_prev_chapter(),
            key_restart: defaults::default_key_restart(),
            key_quit: defaults::default_key_quit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StorageConfig {
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            cache_dir: defaults::default_cache_dir(),
        }
    }
}
