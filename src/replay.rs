//! Replay driver
//!
//! Feeds a JSON-lines script through a headless [`StageSession`] wired to a
//! [`LoopbackChannel`], so a whole operator session can be reproduced and
//! inspected without a device. One step per line:
//!
//! ```text
//! {"op": "signal", "name": "config_changed", "payload": {...}}
//! {"op": "pointer", "event": {"type": "down", "pos": {"x": 300, "y": 300}, "button": "primary"}}
//! {"op": "key", "event": {"key": "arrow_left", "modifiers": {"shift": true}}}
//! {"op": "resize", "width": 800, "height": 600}
//! {"op": "image", "src": "tile-0.png", "center": {"x": 0, "y": 0}}
//! {"op": "mode", "mode": {"edit_roi": "top_left"}}
//! {"op": "setting", "id": "interaction.fine_scale", "value": "0.1"}
//! {"op": "log", "level": 30, "message": "focus drifted"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use stagekit_communication::{
    BindSet, BindingOptions, LoopbackChannel, RecordedCall, StageSession,
};
use stagekit_core::{Intent, LevelLogger, LogLevel, ViewEvent, ViewerEvent, WorldPoint};
use stagekit_settings::{SetOutcome, SettingsController, ViewerConfig};
use stagekit_viewport::{
    ClickMode, KeyEvent, PointerEvent, ResizeRequest, StateUpdate, SvgSurface,
    ViewportController,
};

/// One script step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Pointer {
        event: PointerEvent,
    },
    Key {
        event: KeyEvent,
    },
    Signal {
        name: String,
        #[serde(default)]
        payload: Value,
    },
    Resize(ResizeRequest),
    Image {
        src: String,
        #[serde(default)]
        center: Option<WorldPoint>,
        #[serde(default)]
        size: Option<[f64; 2]>,
    },
    ClearImages,
    Mode {
        mode: ClickMode,
    },
    Setting {
        id: String,
        value: String,
    },
    Log {
        level: LogLevel,
        message: String,
    },
}

/// What a replay produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub intents: Vec<Intent>,
    pub calls: Vec<RecordedCall>,
    /// Log lines that passed the threshold
    pub log_lines: Vec<String>,
    /// Zooms, pans, and resizes in the order they happened
    pub views: Vec<ViewEvent>,
}

pub struct Replay {
    session: StageSession<SvgSurface>,
    channel: Arc<LoopbackChannel>,
    settings: SettingsController,
    logger: LevelLogger,
    events: broadcast::Receiver<ViewerEvent>,
    summary: ReplaySummary,
}

impl Replay {
    /// Build a session from `config` and bind it to a loopback channel
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let controller = ViewportController::new(&config, SvgSurface::new())
            .context("Invalid canvas configuration")?;
        let events = controller.bus().receiver();
        let mut session = StageSession::new(controller);
        let channel = Arc::new(LoopbackChannel::new());
        session.bind(
            channel.clone(),
            BindSet::from(&config.binding),
            BindingOptions::from(&config.binding),
        )?;
        Ok(Self {
            session,
            channel,
            logger: LevelLogger::new(config.logging.level),
            settings: SettingsController::new(config),
            events,
            summary: ReplaySummary::default(),
        })
    }

    /// Run one parsed step
    pub fn step(&mut self, step: Step) -> anyhow::Result<()> {
        debug!("Replay step: {:?}", step);
        match step {
            Step::Pointer { event } => {
                let intents = self.session.handle_pointer(event);
                self.summary.intents.extend(intents);
            }
            Step::Key { event } => {
                let intents = self.session.handle_key(event);
                self.summary.intents.extend(intents);
            }
            Step::Signal { name, payload } => {
                let channel = self.channel.clone();
                let ran = self.session.receive(|| channel.deliver(&name, payload));
                if ran == 0 {
                    debug!("Signal '{}' had no handlers", name);
                }
            }
            Step::Resize(request) => self.session.resize(request)?,
            Step::Image { src, center, size } => self.session.apply(StateUpdate::ImageAvailable {
                src,
                center,
                size: size.map(|[w, h]| (w, h)),
            }),
            Step::ClearImages => self.session.apply(StateUpdate::ClearImages),
            Step::Mode { mode } => self.session.set_click_mode(mode),
            Step::Setting { id, value } => {
                let outcome = self.settings.update_setting(&id, &value)?;
                match outcome {
                    SetOutcome::Accepted(v) => {
                        info!("Setting {} = {}", id, v);
                        let config = self.settings.config().clone();
                        self.session.controller_mut().configure(&config);
                    }
                    SetOutcome::Unchanged(_) => {}
                    SetOutcome::Reverted(v) => info!("Setting {} reverted to {}", id, v),
                }
            }
            Step::Log { level, message } => {
                if let Some(line) = self.logger.log(level, &message) {
                    self.summary.log_lines.push(line);
                }
            }
        }
        self.collect_views();
        self.summary.steps += 1;
        Ok(())
    }

    fn collect_views(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(ViewerEvent::View(view)) => self.summary.views.push(view),
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Replay missed {} viewer events", missed)
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    /// Parse and run one script line
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        let step: Step = serde_json::from_str(line).context("Malformed replay step")?;
        self.step(step)
    }

    /// Run a whole script
    pub fn run<R: BufRead>(&mut self, reader: R) -> anyhow::Result<()> {
        for (number, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", number + 1))?;
            self.run_line(&line)
                .with_context(|| format!("Replay failed at line {}", number + 1))?;
        }
        Ok(())
    }

    pub fn session(&self) -> &StageSession<SvgSurface> {
        &self.session
    }

    pub fn channel(&self) -> &LoopbackChannel {
        &self.channel
    }

    /// Current SVG rendering of the viewport
    pub fn render_svg(&self) -> String {
        self.session.controller().surface().render()
    }

    /// Everything produced so far
    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            calls: self.channel.calls(),
            ..self.summary.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_drives_session() {
        let script = r#"
# remote config first
{"op": "signal", "name": "config_changed", "payload": {"montage": {"roi": {"left": 0, "top": 0, "width": 10, "height": 10}, "fov": [1000, 1000]}, "slot_center": {"x": 0, "y": 0}}}
{"op": "signal", "name": "new_position", "payload": {"x": 0, "y": 0}}
{"op": "key", "event": {"key": "arrow_right"}}
{"op": "pointer", "event": {"type": "down", "pos": {"x": 300, "y": 300}, "button": "primary"}}
"#;
        let mut replay = Replay::new(ViewerConfig::default()).unwrap();
        replay.run(script.as_bytes()).unwrap();

        let summary = replay.summary();
        assert_eq!(summary.steps, 4);
        assert_eq!(
            summary.intents,
            vec![
                Intent::Move { x: 1000.0, y: 0.0 },
                Intent::Move { x: 0.0, y: 0.0 }
            ]
        );
        let names: Vec<&str> = summary.calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["poll_position", "fetch_config", "move", "move"]);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let mut replay = Replay::new(ViewerConfig::default()).unwrap();
        let err = replay.run("\n{\"op\": \"teleport\"}\n".as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_setting_reverts_on_bad_input() {
        let mut replay = Replay::new(ViewerConfig::default()).unwrap();
        replay
            .run_line(r#"{"op": "setting", "id": "interaction.fine_scale", "value": "abc"}"#)
            .unwrap();
        assert!(replay
            .run_line(r#"{"op": "setting", "id": "no.such", "value": "1"}"#)
            .is_err());
    }

    #[test]
    fn test_log_threshold() {
        let mut replay = Replay::new(ViewerConfig::default()).unwrap();
        replay
            .run_line(r#"{"op": "log", "level": 10, "message": "noise"}"#)
            .unwrap();
        replay
            .run_line(r#"{"op": "log", "level": 30, "message": "drift"}"#)
            .unwrap();
        assert_eq!(replay.summary().log_lines, vec!["WARNING: drift".to_string()]);
    }
}
