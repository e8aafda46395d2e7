//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where projects are stored.
    pub projects_dir: PathBuf,

    /// Playback, skip, and step tuning.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timing parameters for the playback-control state machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Period of the cut-skip check while media is active.
    pub skip_tick_ms: u64,

    /// Delays after an auto-skip at which playback is re-verified.
    /// The late check absorbs clip-switch latency in multi-file playlists.
    pub resume_check_delays_ms: Vec<u64>,

    /// Two skip targets closer than this are treated as the same jump.
    pub skip_tolerance_secs: f64,

    /// Frame rate assumed when the transport cannot report one.
    pub fallback_fps: f64,

    /// Mirror cuts onto the GPX track when a sync collaborator is attached.
    pub auto_sync_gpx: bool,

    /// Initial step mode: `s`, `m`, `k`, or `f`.
    pub default_step_mode: String,

    /// Initial step multiplier.
    pub default_step_multiplier: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vgsync_edit_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            playback: PlaybackConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skip_tick_ms: 200,
            resume_check_delays_ms: vec![50, 500],
            skip_tolerance_secs: 0.001,
            fallback_fps: 25.0,
            auto_sync_gpx: false,
            default_step_mode: "s".to_string(),
            default_step_multiplier: 1.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vgsync").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("vgsync").join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_defaults() {
        let playback = PlaybackConfig::default();
        assert_eq!(playback.skip_tick_ms, 200);
        assert_eq!(playback.resume_check_delays_ms, vec![50, 500]);
        assert!((playback.fallback_fps - 25.0).abs() < 1e-9);
        assert!(!playback.auto_sync_gpx);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "projects_dir": "/tmp/vg", "playback": { "skip_tick_ms": 100 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.playback.skip_tick_ms, 100);
        assert_eq!(config.playback.resume_check_delays_ms, vec![50, 500]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir()
            .join("vgsync_test_config")
            .join("config.json");
        let _ = std::fs::remove_file(&path);

        let mut config = AppConfig::default();
        config.playback.auto_sync_gpx = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert!(loaded.playback.auto_sync_gpx);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("vgsync_test_bad_config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.playback.skip_tick_ms, 200);

        std::fs::remove_file(&path).ok();
    }
}
