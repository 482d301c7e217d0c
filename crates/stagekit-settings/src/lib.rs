//! StageKit Settings Crate
//!
//! Handles viewer configuration files and validated numeric settings.

pub mod config;
pub mod controller;
pub mod error;

pub use config::{
    AxisSettings, BindingSettings, BufferSettings, CanvasSettings, InteractionSettings,
    LoggingSettings, MarginSettings, SlotSettings, ViewerConfig,
};
pub use controller::{NumericSetting, SetOutcome, SettingsController};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
