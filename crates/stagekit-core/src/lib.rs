//! # StageKit Core
//!
//! Core types and utilities for StageKit.
//! Provides the rectangle model and landmark resolver, world-space data
//! types, the typed event bus that carries intents, and error types.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod log_level;
pub mod types;
pub mod units;

pub use data::{Fov, ImageEntry, PixelPoint, Tile, TileMeta, TileRecord, WorldPoint};

pub use error::{ChannelError, Error, GeometryError, MapperError, MessageError, Result};

pub use geometry::{resolve, Bounds, Landmark, Rect, RoiHandle};

pub use log_level::{LevelLogger, LogLevel};

pub use event_bus::{
    EventBus, EventCategory, EventFilter, Intent, StateEvent, SubscriptionId, ViewEvent,
    ViewerEvent,
};

// Re-export type aliases for convenience
pub use types::{
    thread_safe, thread_safe_deque, thread_safe_rw_map, thread_safe_vec, DataCallback, ThreadSafe,
    ThreadSafeDeque, ThreadSafeRwMap, ThreadSafeVec,
};
