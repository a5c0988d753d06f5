use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read `path`, falling back to defaults if it is missing or invalid.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!(?cfg, "Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables =
        toml::from_str(contents).context("failed to parse sectioned config")?;
    Ok(tables.into())
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    let tables = ConfigTables::from(config);
    toml::to_string_pretty(&tables).context("failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::{load_config, parse_config, serialize_config};
    use crate::config::{AppConfig, LogLevel};
    use std::path::Path;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = parse_config("").expect("empty config should parse");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.default_wpm, 300);
        assert_eq!(cfg.key_prev_chapter, "N");
        assert_eq!(cfg.cache_dir, ".cache");
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = parse_config(
            r#"
[playback]
default_wpm = 450

[controls]
key_toggle = "space"

[logging]
log_level = "debug"
"#,
        )
        .expect("config should parse");
        assert_eq!(cfg.default_wpm, 450);
        assert_eq!(cfg.wpm_step, 25);
        assert_eq!(cfg.key_toggle, "space");
        assert_eq!(cfg.key_quit, "q");
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(parse_config("[logging]\nlog_level = \"loud\"\n").is_err());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut cfg = AppConfig::default();
        cfg.default_wpm = 620;
        cfg.seek_seconds = 12.5;
        cfg.cache_dir = "/tmp/rsvp".to_string();
        let text = serialize_config(&cfg).expect("config should serialize");
        assert!(text.contains("[playback]"));
        assert!(text.contains("[storage]"));
        assert_eq!(parse_config(&text).expect("round trip"), cfg);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Path::new("/definitely/not/here/config.toml"));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn seed_speed_is_clamped() {
        let mut cfg = AppConfig::default();
        cfg.default_wpm = 5;
        assert_eq!(cfg.seed_wpm(), 100);
        cfg.wpm_step = 0;
        assert_eq!(cfg.speed_step(), 1);
    }
}
