//! Data models for positions, fields of view, tiles, and thumbnails
//!
//! This module provides:
//! - World-space and pixel-space points
//! - Field-of-view footprint (also the jog step)
//! - Acquired tile records with controller-assigned identity
//! - Thumbnail image entries placed in world space

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in stage (world) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X position in world units
    pub x: f64,
    /// Y position in world units
    pub y: f64,
}

impl WorldPoint {
    /// Create a new world point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`
    pub fn delta_from(&self, other: &WorldPoint) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A point in the outer frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal pixel offset from the frame's left edge
    pub x: f64,
    /// Vertical pixel offset from the frame's top edge
    pub y: f64,
}

impl PixelPoint {
    /// Create a new pixel point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Field of view: the capture footprint in world units
///
/// Serialized as a `[width, height]` pair, matching the montage config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Fov {
    /// Footprint width in world units
    pub width: f64,
    /// Footprint height in world units
    pub height: f64,
}

impl Fov {
    /// Default footprint of the montage camera
    pub const DEFAULT_SIZE: f64 = 15250.0;

    /// Create a new field of view
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Fov {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }
}

impl From<[f64; 2]> for Fov {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Fov> for [f64; 2] {
    fn from(fov: Fov) -> Self {
        [fov.width, fov.height]
    }
}

/// Stage position recorded with an acquired tile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileMeta {
    /// Tile center x in world units
    pub x: f64,
    /// Tile center y in world units
    pub y: f64,
}

/// Payload of a tile-acquired event, before an index is assigned
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileRecord {
    /// Where the tile was taken
    pub meta: TileMeta,
    /// Tile was rejected by quality checks
    #[serde(default)]
    pub vetoed: bool,
    /// Tile needed re-grabs
    #[serde(default)]
    pub regrabs: bool,
}

/// An acquired tile in the trail
///
/// `index` is assigned by the trail on insertion and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Controller-assigned identity
    pub index: u64,
    /// Where the tile was taken
    pub meta: TileMeta,
    /// Tile was rejected by quality checks
    pub vetoed: bool,
    /// Tile needed re-grabs
    pub regrabs: bool,
}

impl Tile {
    /// Outline colour used when drawing the tile
    pub fn stroke(&self) -> &'static str {
        if self.vetoed {
            "red"
        } else if self.regrabs {
            "darkorange"
        } else {
            "black"
        }
    }
}

/// A thumbnail placed in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Window-assigned identity
    pub index: u64,
    /// Opaque renderable reference (URL, data URI, path)
    pub src: String,
    /// Left edge in world units
    pub x: f64,
    /// Top edge in world units
    pub y: f64,
    /// Width in world units
    pub w: f64,
    /// Height in world units
    pub h: f64,
}
