//! Rendering substrate contract.
//!
//! The viewport never draws directly. It describes each layer as an ordered
//! list of keyed [`Shape`]s and hands it to a [`RenderSurface`], which
//! reconciles it against what is already on screen: new keys enter, known
//! keys are updated when asked, and keys no longer present are removed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::mapper::{AxisTicks, FrameGeometry};

/// Drawing layers, listed in paint order (first is painted first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Images,
    Tiles,
    Rois,
    Slot,
    Position,
}

impl Layer {
    /// All layers in paint order
    pub const ALL: [Layer; 5] = [
        Layer::Images,
        Layer::Tiles,
        Layer::Rois,
        Layer::Slot,
        Layer::Position,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Images => "images",
            Layer::Tiles => "tiles",
            Layer::Rois => "rois",
            Layer::Slot => "slot",
            Layer::Position => "position",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry of one visual element, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Corner radii
        rx: f64,
        ry: f64,
        stroke: Option<&'static str>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
    },
}

/// A keyed visual element
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Stable identity within its layer
    pub key: String,
    /// Style class (`roi`, `slot`, `tile`, `position`, `fov`, `image`)
    pub class: &'static str,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(key: impl Into<String>, class: &'static str, kind: ShapeKind) -> Self {
        Self {
            key: key.into(),
            class,
            kind,
        }
    }
}

/// What a join did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Something that can show the viewport
pub trait RenderSurface {
    /// Size the outer frame and place the canvas inside it.
    fn set_frame(&mut self, frame: &FrameGeometry);

    /// Replace both axes.
    fn set_axes(&mut self, ticks: &AxisTicks, frame: &FrameGeometry);

    /// Keyed data join for one layer.
    ///
    /// Items whose key is new are added in order. Items whose key already
    /// exists are updated only when `update_existing` is set. Existing keys
    /// not in `items` are removed.
    fn join(&mut self, layer: Layer, items: Vec<Shape>, update_existing: bool) -> JoinStats;

    /// Remove everything from a layer.
    fn clear_layer(&mut self, layer: Layer) -> JoinStats {
        self.join(layer, Vec::new(), true)
    }
}

/// Ordered keyed store implementing join semantics
///
/// Surfaces can keep one per layer and delegate [`RenderSurface::join`] to
/// [`LayerStore::reconcile`].
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    shapes: Vec<Shape>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, key: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.key == key)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn reconcile(&mut self, items: Vec<Shape>, update_existing: bool) -> JoinStats {
        let mut stats = JoinStats::default();

        let incoming: HashSet<&str> = items.iter().map(|s| s.key.as_str()).collect();
        let before = self.shapes.len();
        self.shapes.retain(|s| incoming.contains(s.key.as_str()));
        stats.removed = before - self.shapes.len();

        let mut positions: HashMap<String, usize> = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key.clone(), i))
            .collect();

        for item in items {
            let existing = positions.get(&item.key).copied();
            match existing {
                Some(i) => {
                    if update_existing {
                        self.shapes[i] = item;
                        stats.updated += 1;
                    }
                }
                None => {
                    positions.insert(item.key.clone(), self.shapes.len());
                    self.shapes.push(item);
                    stats.entered += 1;
                }
            }
        }
        stats
    }
}
