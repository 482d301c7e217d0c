//! Viewer configuration
//!
//! Every tunable constant of the viewport lives here as a named field with a
//! documented default. Supports JSON and TOML files, selected by extension.
//!
//! Configuration is organized into sections:
//! - Canvas (pixel extent, world domains, margins)
//! - Interaction (drag threshold, jog scaling, zoom factors, default fov)
//! - Buffers (image window capacity)
//! - Axis (tick count, label divisor)
//! - Slot (drawn slot size and corner radius)
//! - Binding (which remote channels to wire)
//! - Logging

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stagekit_core::units::DEFAULT_DIVISOR;
use stagekit_core::{Fov, LogLevel};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "stagekit";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "viewer.toml";

/// Pixel insets between the outer frame and the drawable canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginSettings {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Canvas extent and initial world domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Drawable width in pixels
    pub width: f64,
    /// Drawable height in pixels
    pub height: f64,
    /// Initial world x window
    pub x_domain: [f64; 2],
    /// Initial world y window
    pub y_domain: [f64; 2],
    /// Explicit margins; 10% of the extent per side when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<MarginSettings>,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            x_domain: [-1_000_000.0, 1_000_000.0],
            y_domain: [-1_000_000.0, 1_000_000.0],
            margins: None,
        }
    }
}

/// Gesture and jog policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Accumulated drag distance (px, either axis) that must be exceeded before acting
    pub drag_threshold_px: f64,
    /// Step multiplier while the fine modifier (alt) is held
    pub fine_scale: f64,
    /// Step multiplier while the coarse modifier (shift) is held
    pub coarse_scale: f64,
    /// Span multiplier for one zoom-in step
    pub zoom_in_factor: f64,
    /// Span multiplier for one zoom-out step
    pub zoom_out_factor: f64,
    /// Field of view used until the remote config supplies one
    pub default_fov: Fov,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: 5.0,
            fine_scale: 0.2,
            coarse_scale: 5.0,
            zoom_in_factor: 0.5,
            zoom_out_factor: 2.0,
            default_fov: Fov::default(),
        }
    }
}

/// Buffer capacities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSettings {
    /// Images kept before the oldest is evicted
    pub image_capacity: usize,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            image_capacity: 100,
        }
    }
}

/// Axis tick generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    /// Approximate number of ticks per axis
    pub tick_count: usize,
    /// World units per displayed label unit
    pub tick_divisor: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            tick_count: 8,
            tick_divisor: DEFAULT_DIVISOR,
        }
    }
}

/// Drawn slot geometry, centred on the configured slot centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSettings {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            width: 2_000_000.0,
            height: 1_500_000.0,
            corner_radius: 500_000.0,
        }
    }
}

/// Which remote channels to bind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
    pub position: bool,
    pub tiles: bool,
    pub rois: bool,
    /// Update the local position as soon as a move is sent
    pub optimistic_position: bool,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            position: true,
            tiles: true,
            rois: true,
            optimistic_position: true,
        }
    }
}

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Numeric threshold (CRITICAL=50 ... DEBUG=10)
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            json: false,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub canvas: CanvasSettings,
    pub interaction: InteractionSettings,
    pub buffers: BufferSettings,
    pub axis: AxisSettings,
    pub slot: SlotSettings,
    pub binding: BindingSettings,
    pub logging: LoggingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl ViewerConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for StageKit
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Default config file path
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load the default config file, or defaults when it does not exist
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = format_for(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.width.is_finite()) {
            return Err(ConfigError::out_of_range("canvas.width", canvas.width));
        }
        if !(canvas.height > 0.0 && canvas.height.is_finite()) {
            return Err(ConfigError::out_of_range("canvas.height", canvas.height));
        }
        check_domain("canvas.x_domain", canvas.x_domain)?;
        check_domain("canvas.y_domain", canvas.y_domain)?;
        if let Some(m) = canvas.margins {
            for (side, v) in [
                ("top", m.top),
                ("right", m.right),
                ("bottom", m.bottom),
                ("left", m.left),
            ] {
                if !(v >= 0.0 && v.is_finite()) {
                    return Err(ConfigError::out_of_range(
                        &format!("canvas.margins.{}", side),
                        v,
                    ));
                }
            }
        }

        let interaction = &self.interaction;
        if !(interaction.drag_threshold_px >= 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.drag_threshold_px",
                interaction.drag_threshold_px,
            ));
        }
        for (key, v) in [
            ("interaction.fine_scale", interaction.fine_scale),
            ("interaction.coarse_scale", interaction.coarse_scale),
            ("interaction.zoom_in_factor", interaction.zoom_in_factor),
            ("interaction.zoom_out_factor", interaction.zoom_out_factor),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(ConfigError::out_of_range(key, v));
            }
        }
        let fov = interaction.default_fov;
        if !(fov.width > 0.0 && fov.height > 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.default_fov",
                format!("[{}, {}]", fov.width, fov.height),
            ));
        }

        if self.buffers.image_capacity == 0 {
            return Err(ConfigError::out_of_range("buffers.image_capacity", 0));
        }

        if self.axis.tick_count == 0 {
            return Err(ConfigError::out_of_range("axis.tick_count", 0));
        }
        if !(self.axis.tick_divisor > 0.0 && self.axis.tick_divisor.is_finite()) {
            return Err(ConfigError::out_of_range(
                "axis.tick_divisor",
                self.axis.tick_divisor,
            ));
        }

        for (key, v) in [
            ("slot.width", self.slot.width),
            ("slot.height", self.slot.height),
            ("slot.corner_radius", self.slot.corner_radius),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(ConfigError::out_of_range(key, v));
            }
        }

        Ok(())
    }
}

fn check_domain(key: &str, [start, end]: [f64; 2]) -> ConfigResult<()> {
    let span = end - start;
    if span == 0.0 || !span.is_finite() {
        return Err(ConfigError::DegenerateDomain {
            key: key.to_string(),
            start,
            end,
        });
    }
    Ok(())
}
