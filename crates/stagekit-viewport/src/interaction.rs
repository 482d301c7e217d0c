//! Gesture state machine
//!
//! Turns raw pointer and keyboard input into [`Action`]s. The machine only
//! owns transient gesture state (phase, pressed button, accumulated drag
//! distance); everything it needs from the viewport is passed in through an
//! [`InteractionContext`] so it never touches the snapshot itself.
//!
//! ## Gestures
//!
//! - primary press on the canvas: click (move, jog, or ROI edit)
//! - secondary press, or primary + shift: arm a drag
//! - drag moves accumulate until either axis exceeds the threshold, then act
//! - wheel: zoom, ignored while a drag is armed
//! - arrow keys: jog the last position by one fov

use serde::{Deserialize, Serialize};
use tracing::debug;

use stagekit_core::{Fov, Intent, PixelPoint, RoiHandle, WorldPoint};
use stagekit_settings::InteractionSettings;

use crate::mapper::{CoordinateMapper, PanMode, ZoomDirection};

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Primary,
    Secondary,
    Tertiary,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Axis lock for clicks and drags, coarse step for keys
    pub shift: bool,
    /// Fine step for keys
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            alt: false,
        }
    }

    pub fn alt() -> Self {
        Self {
            shift: false,
            alt: true,
        }
    }
}

/// Pointer input in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        pos: PixelPoint,
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer moved by `(dx, dy)` pixels since the previous move
    Move { pos: PixelPoint, dx: f64, dy: f64 },
    Up { pos: PixelPoint },
    /// Positive delta zooms in
    Wheel { delta: f64 },
}

/// Keys the viewport reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Any key the viewport ignores
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Another element (a text field, say) has keyboard focus
    #[serde(default)]
    pub focus_elsewhere: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            focus_elsewhere: false,
        }
    }
}

/// What a click does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMode {
    /// Move the stage
    #[default]
    Move,
    /// Set one ROI landmark
    EditRoi(RoiHandle),
}

/// Gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Button held, no movement yet
    Armed,
    /// Button held and moving
    Dragging,
}

/// Output of the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Emit(Intent),
    Zoom(ZoomDirection),
    /// Pan by a pixel delta
    Pan { dx: f64, dy: f64, mode: PanMode },
}

/// Read-only view of the viewport handed to the machine per event
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub mapper: &'a CoordinateMapper,
    pub position: Option<WorldPoint>,
    pub fov: Fov,
}

/// Thresholds and step multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePolicy {
    pub drag_threshold_px: f64,
    pub fine_scale: f64,
    pub coarse_scale: f64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self::from(&InteractionSettings::default())
    }
}

impl From<&InteractionSettings> for GesturePolicy {
    fn from(settings: &InteractionSettings) -> Self {
        Self {
            drag_threshold_px: settings.drag_threshold_px,
            fine_scale: settings.fine_scale,
            coarse_scale: settings.coarse_scale,
        }
    }
}

/// The gesture state machine
#[derive(Debug, Clone, Default)]
pub struct InteractionMachine {
    policy: GesturePolicy,
    mode: ClickMode,
    phase: Phase,
    button: Option<Button>,
    accumulated: (f64, f64),
}

impl InteractionMachine {
    pub fn new(policy: GesturePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> GesturePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: GesturePolicy) {
        self.policy = policy;
    }

    pub fn mode(&self) -> ClickMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ClickMode) {
        self.mode = mode;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drag distance not yet acted on
    pub fn accumulated(&self) -> (f64, f64) {
        self.accumulated
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &InteractionContext<'_>) -> Vec<Action> {
        match event {
            PointerEvent::Down {
                pos,
                button,
                modifiers,
            } => self.press(pos, button, modifiers, ctx),
            PointerEvent::Move { pos, dx, dy } => self.drag(pos, dx, dy, ctx),
            PointerEvent::Up { pos } => self.release(pos, ctx),
            PointerEvent::Wheel { delta } => self.wheel(delta),
        }
    }

    fn press(
        &mut self,
        pos: PixelPoint,
        button: Button,
        modifiers: Modifiers,
        ctx: &InteractionContext<'_>,
    ) -> Vec<Action> {
        let mut actions = Vec::new();

        if button == Button::Primary {
            if ctx.mapper.contains_frame_point(pos) {
                actions.extend(self.click(pos, modifiers.shift, ctx));
            } else {
                debug!("Ignoring click outside canvas at ({}, {})", pos.x, pos.y);
            }
        }

        let arms = match button {
            Button::Secondary => true,
            Button::Primary => modifiers.shift,
            Button::Tertiary => false,
        };
        if arms {
            self.phase = Phase::Armed;
            self.button = Some(button);
            self.accumulated = (0.0, 0.0);
            debug!("Drag armed with {:?}", button);
        }

        actions
    }

    fn drag(&mut self, pos: PixelPoint, dx: f64, dy: f64, ctx: &InteractionContext<'_>) -> Vec<Action> {
        let Some(button) = self.button else {
            return Vec::new();
        };
        self.phase = Phase::Dragging;
        self.accumulated.0 += dx;
        self.accumulated.1 += dy;

        let threshold = self.policy.drag_threshold_px;
        let (ax, ay) = self.accumulated;
        if ax.abs() > threshold || ay.abs() > threshold {
            self.accumulated = (0.0, 0.0);
            self.drag_act(button, pos, ax, ay, PanMode::Provisional, ctx)
        } else {
            Vec::new()
        }
    }

    fn release(&mut self, pos: PixelPoint, ctx: &InteractionContext<'_>) -> Vec<Action> {
        let button = self.button.take();
        let (ax, ay) = self.accumulated;
        self.accumulated = (0.0, 0.0);
        self.phase = Phase::Idle;

        match button {
            Some(button) if ax != 0.0 || ay != 0.0 => {
                self.drag_act(button, pos, ax, ay, PanMode::Commit, ctx)
            }
            _ => Vec::new(),
        }
    }

    fn wheel(&mut self, delta: f64) -> Vec<Action> {
        if self.phase != Phase::Idle {
            debug!("Ignoring wheel during drag");
            return Vec::new();
        }
        ZoomDirection::from_wheel_delta(delta)
            .map(Action::Zoom)
            .into_iter()
            .collect()
    }

    fn drag_act(
        &self,
        button: Button,
        pos: PixelPoint,
        dx: f64,
        dy: f64,
        mode: PanMode,
        ctx: &InteractionContext<'_>,
    ) -> Vec<Action> {
        match button {
            Button::Secondary => vec![Action::Pan { dx, dy, mode }],
            Button::Primary if ctx.mapper.contains_frame_point(pos) => {
                self.click(pos, false, ctx).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn click(&self, pos: PixelPoint, jog: bool, ctx: &InteractionContext<'_>) -> Option<Action> {
        let target = ctx.mapper.frame_to_world(pos);
        let intent = match self.mode {
            ClickMode::EditRoi(handle) => Intent::SetRoi {
                handle,
                x: target.x,
                y: target.y,
            },
            ClickMode::Move => {
                let target = match ctx.position {
                    Some(position) if jog => dominant_axis_jog(position, target, ctx.fov),
                    _ => target,
                };
                Intent::Move {
                    x: target.x,
                    y: target.y,
                }
            }
        };
        debug!("Click at ({}, {}) -> {}", pos.x, pos.y, intent.description());
        Some(Action::Emit(intent))
    }

    /// Arrow keys jog the last known position
    pub fn handle_key(&mut self, event: KeyEvent, ctx: &InteractionContext<'_>) -> Vec<Action> {
        if event.focus_elsewhere {
            return Vec::new();
        }
        let Some(position) = ctx.position else {
            debug!("No position to jog from");
            return Vec::new();
        };

        let mut scale = 1.0;
        if event.modifiers.alt {
            scale *= self.policy.fine_scale;
        }
        if event.modifiers.shift {
            scale *= self.policy.coarse_scale;
        }
        let xjog = ctx.fov.width * scale;
        let yjog = ctx.fov.height * scale;

        let (x, y) = match event.key {
            Key::ArrowLeft => (position.x - xjog, position.y),
            Key::ArrowRight => (position.x + xjog, position.y),
            Key::ArrowUp => (position.x, position.y - yjog),
            Key::ArrowDown => (position.x, position.y + yjog),
            Key::Other => return Vec::new(),
        };
        debug!("Key {:?} jogs to ({}, {})", event.key, x, y);
        vec![Action::Emit(Intent::Move { x, y })]
    }
}

/// One fov step from `position` toward `target` along whichever axis has the
/// larger offset; the other axis is held. Ties go to y.
fn dominant_axis_jog(position: WorldPoint, target: WorldPoint, fov: Fov) -> WorldPoint {
    let (dx, dy) = target.delta_from(&position);
    if dx.abs() > dy.abs() {
        let step = if dx > 0.0 { fov.width } else { -fov.width };
        WorldPoint::new(position.x + step, position.y)
    } else {
        let step = if dy > 0.0 { fov.height } else { -fov.height };
        WorldPoint::new(position.x, position.y + step)
    }
}
