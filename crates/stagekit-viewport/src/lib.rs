//! # StageKit Viewport
//!
//! Coordinate mapping, gesture handling, and rendering for the stage view.
//!
//! The [`ViewportController`] ties the pieces together: a
//! [`CoordinateMapper`] for world/pixel transforms, the [`ViewportState`]
//! snapshot, the [`InteractionMachine`] for gestures, and any
//! [`RenderSurface`] to draw on. Outside this crate the snapshot only
//! changes through an [`InboundQueue`] the controller drains.

pub mod buffers;
pub mod controller;
pub mod inbound;
pub mod interaction;
pub mod mapper;
pub mod render;
pub mod scale;
pub mod state;
pub mod svg;

pub use buffers::{ImagePlacement, ImageWindow, TileTrail, DEFAULT_IMAGE_CAPACITY};
pub use controller::{StateUpdate, ViewportController};
pub use inbound::InboundQueue;
pub use interaction::{
    Action, Button, ClickMode, GesturePolicy, InteractionContext, InteractionMachine, Key,
    KeyEvent, Modifiers, Phase, PointerEvent,
};
pub use mapper::{
    AxisTick, AxisTicks, CoordinateMapper, FrameGeometry, Margins, PanMode, ResizeRequest,
    ZoomDirection,
};
pub use render::{JoinStats, Layer, LayerStore, RenderSurface, Shape, ShapeKind};
pub use scale::LinearScale;
pub use state::ViewportState;
pub use svg::SvgSurface;
