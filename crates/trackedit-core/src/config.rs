//! Interaction configuration schema and loader
//!
//! Thresholds are stored as YAML next to the other editor settings.
//! Default location: ~/.config/trackedit/interaction.yaml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Distance (px) from a selection edge that still grabs the edge
pub const EDGE_THRESHOLD: f64 = 6.0;
/// Size (px) of the square corner grab zone
pub const CORNER_SIZE: f64 = 6.0;
/// Horizontal travel (px) before a new time selection materializes
pub const CREATE_DEAD_ZONE: f64 = 5.0;
/// Window after a drag during which clicks are ignored
pub const CLICK_SUPPRESS_MS: u64 = 50;
/// Envelope point grab radius (px)
pub const CLICK_THRESHOLD: f64 = 10.0;
/// Envelope segment grab distance (px)
pub const ENVELOPE_LINE_FAR_THRESHOLD: f64 = 4.0;
/// Pointer travel (px) separating a click from a drag
pub const CLICK_MOVE_THRESHOLD: f64 = 3.0;
/// Envelope point time snap window (seconds)
pub const SNAP_WINDOW_SECS: f64 = 0.05;
/// Times closer than this to zero count as the clip origin (seconds)
pub const ORIGIN_EPSILON_SECS: f64 = 0.001;

/// Tunable interaction constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub edge_threshold: f64,
    pub corner_size: f64,
    pub create_dead_zone: f64,
    pub click_suppress_ms: u64,
    pub point_hit_radius: f64,
    pub segment_hit_distance: f64,
    pub click_move_threshold: f64,
    pub snap_window_secs: f64,
    pub origin_epsilon_secs: f64,
    /// Permanently delete envelope points crossed by a point drag on release.
    /// When false, crossed points reappear once the drag ends.
    pub eat_crossed_points: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            edge_threshold: EDGE_THRESHOLD,
            corner_size: CORNER_SIZE,
            create_dead_zone: CREATE_DEAD_ZONE,
            click_suppress_ms: CLICK_SUPPRESS_MS,
            point_hit_radius: CLICK_THRESHOLD,
            segment_hit_distance: ENVELOPE_LINE_FAR_THRESHOLD,
            click_move_threshold: CLICK_MOVE_THRESHOLD,
            snap_window_secs: SNAP_WINDOW_SECS,
            origin_epsilon_secs: ORIGIN_EPSILON_SECS,
            eat_crossed_points: true,
        }
    }
}

impl InteractionConfig {
    pub fn click_suppress_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.click_suppress_ms)
    }

    /// Replace negative or non-finite distances with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            ("edge_threshold", &mut self.edge_threshold, defaults.edge_threshold),
            ("corner_size", &mut self.corner_size, defaults.corner_size),
            ("create_dead_zone", &mut self.create_dead_zone, defaults.create_dead_zone),
            ("point_hit_radius", &mut self.point_hit_radius, defaults.point_hit_radius),
            ("segment_hit_distance", &mut self.segment_hit_distance, defaults.segment_hit_distance),
            ("click_move_threshold", &mut self.click_move_threshold, defaults.click_move_threshold),
            ("snap_window_secs", &mut self.snap_window_secs, defaults.snap_window_secs),
            ("origin_epsilon_secs", &mut self.origin_epsilon_secs, defaults.origin_epsilon_secs),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("config: {} = {} is out of range, using {}", name, value, default);
                *value = default;
            }
        }
        self
    }
}

/// Get the default interaction config path
pub fn default_interaction_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trackedit")
        .join("interaction.yaml")
}

/// Read the interaction thresholds from `path`
///
/// A missing or unreadable file yields the built-in thresholds. Fields that
/// would make a gesture unreachable (negative or non-finite distances) fall
/// back to their defaults individually.
pub fn load_interaction_config(path: &Path) -> InteractionConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("config: no interaction settings at {:?}, using built-in thresholds", path);
            return InteractionConfig::default();
        }
        Err(e) => {
            log::warn!("config: cannot read {:?} ({}), using built-in thresholds", path, e);
            return InteractionConfig::default();
        }
    };

    match serde_yaml::from_str::<InteractionConfig>(&contents) {
        Ok(config) => {
            let config = config.sanitized();
            log::info!(
                "config: edge grab {}px, point grab {}px, snap {}ms, eat crossed points {}",
                config.edge_threshold,
                config.point_hit_radius,
                config.snap_window_secs * 1000.0,
                config.eat_crossed_points
            );
            config
        }
        Err(e) => {
            log::warn!("config: {:?} is not valid interaction YAML ({}), using built-in thresholds", path, e);
            InteractionConfig::default()
        }
    }
}

/// Write the interaction thresholds to `path`, creating parent directories
pub fn save_interaction_config(config: &InteractionConfig, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating settings directory {:?}", dir))?;
    }
    let yaml = serde_yaml::to_string(config).context("encoding interaction thresholds")?;
    std::fs::write(path, yaml).with_context(|| format!("writing interaction thresholds to {:?}", path))?;

    log::debug!("config: interaction settings written to {:?}", path);
    Ok(())
}
