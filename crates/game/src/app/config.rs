use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::playback::PlaybackTuning;
use engine::LoopConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}{}: {source}", at_field(.field_path))]
    Parse {
        path: PathBuf,
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {path}: {field} {message}")]
    Invalid {
        path: PathBuf,
        field: String,
        message: &'static str,
    },
}

fn at_field(field_path: &str) -> String {
    if field_path.is_empty() || field_path == "." {
        String::new()
    } else {
        format!(" at {field_path}")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            title: defaults.window_title,
            width: defaults.window_width,
            height: defaults.window_height,
        }
    }
}

/// Sparse tuning override; absent fields keep the level's value.
/// A `ground_wait_timeout` of 0 disables the timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TuningOverrides {
    pub move_duration: Option<f32>,
    pub move_speed_scale: Option<f32>,
    pub jump_force: Option<f32>,
    pub horizontal_force: Option<f32>,
    pub jump_drift: Option<f32>,
    pub ground_poll_interval: Option<f32>,
    pub settle_duration: Option<f32>,
    pub stall_report_after: Option<f32>,
    pub ground_wait_timeout: Option<f32>,
}

impl TuningOverrides {
    pub(crate) fn apply(&self, base: PlaybackTuning) -> PlaybackTuning {
        let mut tuning = base;
        let fields = [
            (self.move_duration, &mut tuning.move_duration),
            (self.move_speed_scale, &mut tuning.move_speed_scale),
            (self.jump_force, &mut tuning.jump_force),
            (self.horizontal_force, &mut tuning.horizontal_force),
            (self.jump_drift, &mut tuning.jump_drift),
            (self.ground_poll_interval, &mut tuning.ground_poll_interval),
            (self.settle_duration, &mut tuning.settle_duration),
            (self.stall_report_after, &mut tuning.stall_report_after),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(timeout) = self.ground_wait_timeout {
            tuning.ground_wait_timeout = (timeout > 0.0).then_some(timeout);
        }
        tuning
    }

    /// Same ranges the level `<Tuning>` element enforces.
    fn first_invalid(&self) -> Option<(&'static str, &'static str)> {
        [
            ("move_duration", self.move_duration, ValueRange::NonNegative),
            ("move_speed_scale", self.move_speed_scale, ValueRange::Positive),
            ("jump_force", self.jump_force, ValueRange::Any),
            ("horizontal_force", self.horizontal_force, ValueRange::Any),
            ("jump_drift", self.jump_drift, ValueRange::Any),
            ("ground_poll_interval", self.ground_poll_interval, ValueRange::Positive),
            ("settle_duration", self.settle_duration, ValueRange::NonNegative),
            ("stall_report_after", self.stall_report_after, ValueRange::NonNegative),
            ("ground_wait_timeout", self.ground_wait_timeout, ValueRange::NonNegative),
        ]
        .into_iter()
        .find_map(|(name, value, range)| {
            value
                .and_then(|value| range.violation(value))
                .map(|message| (name, message))
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueRange {
    Any,
    NonNegative,
    Positive,
}

impl ValueRange {
    fn violation(self, value: f32) -> Option<&'static str> {
        if !value.is_finite() {
            return Some("must be finite");
        }
        match self {
            Self::NonNegative if value < 0.0 => Some("must be >= 0"),
            Self::Positive if value <= 0.0 => Some("must be > 0"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub window: WindowConfig,
    pub target_tps: u32,
    pub max_render_fps: Option<u32>,
    pub target_aspect: f32,
    /// Relative paths resolve against the project root.
    pub level: Option<PathBuf>,
    pub player_tuning: TuningOverrides,
    pub adversary_tuning: TuningOverrides,
}

impl Default for GameConfig {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            window: WindowConfig::default(),
            target_tps: defaults.target_tps,
            max_render_fps: defaults.max_render_fps,
            target_aspect: defaults.camera.target_aspect,
            level: None,
            player_tuning: TuningOverrides::default(),
            adversary_tuning: TuningOverrides::default(),
        }
    }
}

impl GameConfig {
    pub(crate) fn loop_config(&self) -> LoopConfig {
        let mut config = LoopConfig {
            window_title: self.window.title.clone(),
            window_width: self.window.width,
            window_height: self.window.height,
            target_tps: self.target_tps,
            max_render_fps: self.max_render_fps,
            ..LoopConfig::default()
        };
        config.camera.target_aspect = self.target_aspect;
        config
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |field: &str, message: &'static str| ConfigError::Invalid {
            path: path.to_path_buf(),
            field: field.to_string(),
            message,
        };
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be > 0"));
        }
        if self.target_tps == 0 {
            return Err(invalid("target_tps", "must be > 0"));
        }
        if self.max_render_fps == Some(0) {
            return Err(invalid("max_render_fps", "must be > 0 or null"));
        }
        if !self.target_aspect.is_finite() || self.target_aspect <= 0.0 {
            return Err(invalid("target_aspect", "must be a positive number"));
        }
        let sections = [
            ("player_tuning", &self.player_tuning),
            ("adversary_tuning", &self.adversary_tuning),
        ];
        for (section, overrides) in sections {
            if let Some((field, message)) = overrides.first_invalid() {
                return Err(invalid(&format!("{section}.{field}"), message));
            }
        }
        Ok(())
    }
}

/// A missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    if !path.is_file() {
        info!(path = %path.display(), "config_missing_using_defaults");
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(path, &raw)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

pub(crate) fn parse_config(path: &Path, raw: &str) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(
        |error| {
            let field_path = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                field_path,
                source: error.into_inner(),
            }
        },
    )?;
    config.validate(path)?;
    Ok(config)
}
