//! # StageKit
//!
//! Interactive viewport for motorized stage and montage imaging rigs.
//!
//! ## Architecture
//!
//! StageKit is organized as a workspace with multiple crates:
//!
//! 1. **stagekit-core** - Rectangle model and landmark resolver, world-space data, events, errors
//! 2. **stagekit-settings** - Viewer configuration and validated numeric settings
//! 3. **stagekit-viewport** - Coordinate mapping, gestures, buffers, rendering
//! 4. **stagekit-communication** - Remote channels and the viewport binding
//! 5. **stagekit** - Logging setup, the replay driver, and the `stagekit` binary

pub mod replay;

pub use stagekit_communication::{
    BindSet, BindingOptions, JsonLinesChannel, LoopbackChannel, RemoteBinding, RemoteChannel,
    StageSession,
};
pub use stagekit_core::{
    resolve, Error, Fov, Intent, Landmark, LevelLogger, LogLevel, Rect, Result, RoiHandle,
    WorldPoint,
};
pub use stagekit_settings::{SettingsController, ViewerConfig};
pub use stagekit_viewport::{
    CoordinateMapper, PointerEvent, RenderSurface, StateUpdate, SvgSurface, ViewportController,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Filter for `level`, with any `RUST_LOG` directives layered on top
pub fn log_filter(
    level: LogLevel,
    rust_log: Option<&str>,
) -> anyhow::Result<tracing_subscriber::EnvFilter> {
    use anyhow::Context;

    let directives = match rust_log.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{},{}", level.filter_directive(), extra),
        _ => level.filter_directive().to_string(),
    };
    tracing_subscriber::EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log directives: {}", directives))
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for replay results
/// - `level` as the default, refined per target by RUST_LOG
/// - Pretty formatting, or JSON lines when `json` is set
pub fn init_logging(level: LogLevel, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = log_filter(level, rust_log.as_deref())?;

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
