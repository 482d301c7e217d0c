//! Settings Controller
//!
//! Validated numeric settings bound to [`ViewerConfig`] fields. Input arrives
//! as text from an operator; anything that does not parse or falls outside
//! the allowed range is rejected by reverting to the last valid value and
//! re-notifying listeners, never by returning an error.

use crate::config::ViewerConfig;
use crate::error::{ConfigError, ConfigResult};

type SettingListener = Box<dyn Fn(&str, f64) + Send + Sync>;

/// Result of writing text into a numeric setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetOutcome {
    /// New value stored.
    Accepted(f64),
    /// Input equalled the current value.
    Unchanged(f64),
    /// Input rejected; the last valid value is kept.
    Reverted(f64),
}

impl SetOutcome {
    /// The value held after the write.
    pub fn value(&self) -> f64 {
        match *self {
            SetOutcome::Accepted(v) | SetOutcome::Unchanged(v) | SetOutcome::Reverted(v) => v,
        }
    }
}

/// A numeric value with inclusive bounds
pub struct NumericSetting {
    id: String,
    value: f64,
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
    listeners: Vec<SettingListener>,
}

impl std::fmt::Debug for NumericSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericSetting")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl NumericSetting {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            min: None,
            max: None,
            integer: false,
            listeners: Vec::new(),
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Only whole numbers are accepted.
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Register a callback notified after every write attempt
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: Fn(&str, f64) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    fn accepts(&self, v: f64) -> bool {
        v.is_finite()
            && self.min.map_or(true, |min| v >= min)
            && self.max.map_or(true, |max| v <= max)
            && (!self.integer || v.fract() == 0.0)
    }

    /// Write a value
    pub fn set(&mut self, v: f64) -> SetOutcome {
        let outcome = if !self.accepts(v) {
            tracing::warn!("Rejected {} = {}; keeping {}", self.id, v, self.value);
            SetOutcome::Reverted(self.value)
        } else if v == self.value {
            SetOutcome::Unchanged(v)
        } else {
            self.value = v;
            SetOutcome::Accepted(v)
        };
        self.notify();
        outcome
    }

    /// Write operator text
    ///
    /// The whole trimmed input must be a number.
    pub fn set_from_str(&mut self, input: &str) -> SetOutcome {
        match input.trim().parse::<f64>() {
            Ok(v) => self.set(v),
            Err(_) => {
                tracing::warn!(
                    "Malformed input for {}: {:?}; keeping {}",
                    self.id,
                    input,
                    self.value
                );
                self.notify();
                SetOutcome::Reverted(self.value)
            }
        }
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.id, self.value);
        }
    }
}

/// Validated editing of the tunable [`ViewerConfig`] fields
#[derive(Debug)]
pub struct SettingsController {
    config: ViewerConfig,
    settings: Vec<NumericSetting>,
}

impl SettingsController {
    /// Create a controller seeded from `config`
    pub fn new(config: ViewerConfig) -> Self {
        let i = &config.interaction;
        let settings = vec![
            NumericSetting::new("interaction.drag_threshold_px", i.drag_threshold_px)
                .with_min(0.0)
                .with_max(500.0),
            NumericSetting::new("interaction.fine_scale", i.fine_scale)
                .with_min(0.001)
                .with_max(1.0),
            NumericSetting::new("interaction.coarse_scale", i.coarse_scale)
                .with_min(1.0)
                .with_max(1000.0),
            NumericSetting::new("interaction.zoom_in_factor", i.zoom_in_factor)
                .with_min(0.01)
                .with_max(1.0),
            NumericSetting::new("interaction.zoom_out_factor", i.zoom_out_factor)
                .with_min(1.0)
                .with_max(100.0),
            NumericSetting::new("axis.tick_count", config.axis.tick_count as f64)
                .with_min(1.0)
                .with_max(50.0)
                .integer(),
            NumericSetting::new("buffers.image_capacity", config.buffers.image_capacity as f64)
                .with_min(1.0)
                .with_max(100_000.0)
                .integer(),
        ];
        Self { config, settings }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Ids of all editable settings
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.settings.iter().map(|s| s.id())
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.settings.iter().find(|s| s.id() == id).map(|s| s.value())
    }

    /// Register a callback to be notified when a setting is written
    pub fn on_setting_changed<F>(&mut self, id: &str, callback: F) -> ConfigResult<()>
    where
        F: Fn(&str, f64) + Send + Sync + 'static,
    {
        self.setting_mut(id)?.on_change(callback);
        Ok(())
    }

    /// Update a setting from operator text
    ///
    /// Only an unknown id is an error; bad input reverts.
    pub fn update_setting(&mut self, id: &str, input: &str) -> ConfigResult<SetOutcome> {
        let outcome = self.setting_mut(id)?.set_from_str(input);
        if let SetOutcome::Accepted(v) = outcome {
            self.write_back(id, v);
        }
        Ok(outcome)
    }

    fn setting_mut(&mut self, id: &str) -> ConfigResult<&mut NumericSetting> {
        self.settings
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| ConfigError::UnknownSetting(id.to_string()))
    }

    fn write_back(&mut self, id: &str, v: f64) {
        let c = &mut self.config;
        match id {
            "interaction.drag_threshold_px" => c.interaction.drag_threshold_px = v,
            "interaction.fine_scale" => c.interaction.fine_scale = v,
            "interaction.coarse_scale" => c.interaction.coarse_scale = v,
            "interaction.zoom_in_factor" => c.interaction.zoom_in_factor = v,
            "interaction.zoom_out_factor" => c.interaction.zoom_out_factor = v,
            "axis.tick_count" => c.axis.tick_count = v as usize,
            "buffers.image_capacity" => c.buffers.image_capacity = v as usize,
            _ => {}
        }
    }
}
