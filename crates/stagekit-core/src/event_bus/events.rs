//! Event type definitions for the event bus.
//!
//! This module defines all viewer events organized by category.
//! Events are cloneable and serializable so sessions can be logged and
//! replayed.

use serde::{Deserialize, Serialize};

use crate::geometry::RoiHandle;

/// Root event enum for all viewer events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewerEvent {
    /// Requests produced by the interaction layer
    Intent(Intent),
    /// Mapping changes (zoom, pan, resize)
    View(ViewEvent),
    /// Viewport state changes applied from remote updates
    State(StateEvent),
}

impl ViewerEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            ViewerEvent::Intent(_) => EventCategory::Intent,
            ViewerEvent::View(_) => EventCategory::View,
            ViewerEvent::State(_) => EventCategory::State,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            ViewerEvent::Intent(e) => e.description(),
            ViewerEvent::View(e) => e.description(),
            ViewerEvent::State(e) => e.description(),
        }
    }
}

impl From<Intent> for ViewerEvent {
    fn from(intent: Intent) -> Self {
        ViewerEvent::Intent(intent)
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Outbound requests.
    Intent,
    /// Mapping changes.
    View,
    /// Snapshot changes.
    State,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Intent => write!(f, "Intent"),
            EventCategory::View => write!(f, "View"),
            EventCategory::State => write!(f, "State"),
        }
    }
}

/// A transport-agnostic request for a remote action
///
/// Emitted synchronously by the interaction layer; the remote binding turns
/// each one into a named outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Move the stage to a world position.
    Move {
        /// Target x in world units.
        x: f64,
        /// Target y in world units.
        y: f64,
    },
    /// Set one ROI landmark to a world position.
    SetRoi {
        /// Which edge or corner to set.
        handle: RoiHandle,
        /// Target x in world units.
        x: f64,
        /// Target y in world units.
        y: f64,
    },
}

impl Intent {
    pub fn description(&self) -> String {
        match self {
            Intent::Move { x, y } => format!("Move to ({:.1}, {:.1})", x, y),
            Intent::SetRoi { handle, x, y } => {
                format!("Set ROI {} to ({:.1}, {:.1})", handle, x, y)
            }
        }
    }
}

/// Mapping change events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// Domains were rescaled about their centers.
    Zoomed {
        /// New x domain span in world units.
        x_span: f64,
        /// New y domain span in world units.
        y_span: f64,
    },
    /// Domains were translated by a pixel delta.
    Panned {
        /// Horizontal delta in pixels.
        dx: f64,
        /// Vertical delta in pixels.
        dy: f64,
        /// Image layer was suppressed for this redraw.
        provisional: bool,
    },
    /// Canvas extent changed.
    Resized {
        /// Canvas width in pixels.
        width: f64,
        /// Canvas height in pixels.
        height: f64,
    },
}

impl ViewEvent {
    pub fn description(&self) -> String {
        match self {
            ViewEvent::Zoomed { x_span, y_span } => {
                format!("Zoom: span {:.0} x {:.0}", x_span, y_span)
            }
            ViewEvent::Panned {
                dx,
                dy,
                provisional,
            } => format!(
                "Pan: ({:.1}, {:.1}) px{}",
                dx,
                dy,
                if *provisional { " (provisional)" } else { "" }
            ),
            ViewEvent::Resized { width, height } => {
                format!("Resize: {}x{} px", width, height)
            }
        }
    }
}

/// Snapshot change events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// Last known position changed.
    PositionChanged {
        /// New x in world units.
        x: f64,
        /// New y in world units.
        y: f64,
    },
    /// ROI list replaced.
    RoisChanged {
        /// Number of ROIs now held.
        count: usize,
    },
    /// A tile was appended to the trail.
    TileAppended {
        /// Index assigned to the tile.
        index: u64,
    },
    /// The tile trail was emptied.
    TrailCleared,
    /// An image was appended to the window.
    ImageAppended {
        /// Index assigned to the image.
        index: u64,
        /// Number of entries evicted to stay within capacity.
        evicted: usize,
    },
    /// Field of view replaced.
    FovChanged {
        /// Footprint width in world units.
        width: f64,
        /// Footprint height in world units.
        height: f64,
    },
}

impl StateEvent {
    pub fn description(&self) -> String {
        match self {
            StateEvent::PositionChanged { x, y } => {
                format!("Position: ({:.1}, {:.1})", x, y)
            }
            StateEvent::RoisChanged { count } => format!("ROIs: {}", count),
            StateEvent::TileAppended { index } => format!("Tile #{}", index),
            StateEvent::TrailCleared => "Trail cleared".to_string(),
            StateEvent::ImageAppended { index, evicted } => {
                format!("Image #{} ({} evicted)", index, evicted)
            }
            StateEvent::FovChanged { width, height } => {
                format!("FOV: {} x {}", width, height)
            }
        }
    }
}
