//! Rectangle landmarks and partial-constraint resolution.
//!
//! A [`Rect`] may be specified by any self-consistent subset of its edges,
//! size, and center. [`resolve`] derives a single landmark from whatever is
//! present without ever touching the input.
//!
//! ```
//! use stagekit_core::geometry::{resolve, Landmark, Rect};
//!
//! let roi = Rect::new().with_right(10.0).with_width(10.0);
//! assert_eq!(resolve(Landmark::Left, &roi).unwrap(), Some(0.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::WorldPoint;
use crate::error::GeometryError;

/// Named rectangle attribute that can be supplied or derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Landmark {
    /// Minimum x edge.
    Left,
    /// Maximum x edge.
    Right,
    /// Minimum y edge.
    Top,
    /// Maximum y edge.
    Bottom,
    /// `right - left`.
    Width,
    /// `bottom - top`.
    Height,
    /// Center point.
    Center,
}

impl Landmark {
    /// All landmarks, edges first.
    pub const ALL: [Landmark; 7] = [
        Landmark::Left,
        Landmark::Right,
        Landmark::Top,
        Landmark::Bottom,
        Landmark::Width,
        Landmark::Height,
        Landmark::Center,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Landmark::Left => "left",
            Landmark::Right => "right",
            Landmark::Top => "top",
            Landmark::Bottom => "bottom",
            Landmark::Width => "width",
            Landmark::Height => "height",
            Landmark::Center => "center",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Landmark {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| GeometryError::UnknownLandmark {
                name: s.to_string(),
            })
    }
}

/// The ROI attribute an edit click sets on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiHandle {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl RoiHandle {
    /// All handles in menu order.
    pub const ALL: [RoiHandle; 8] = [
        RoiHandle::Left,
        RoiHandle::Right,
        RoiHandle::Top,
        RoiHandle::Bottom,
        RoiHandle::TopLeft,
        RoiHandle::TopRight,
        RoiHandle::BottomLeft,
        RoiHandle::BottomRight,
    ];

    /// Snake-case wire name sent with `set_roi`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoiHandle::Left => "left",
            RoiHandle::Right => "right",
            RoiHandle::Top => "top",
            RoiHandle::Bottom => "bottom",
            RoiHandle::TopLeft => "top_left",
            RoiHandle::TopRight => "top_right",
            RoiHandle::BottomLeft => "bottom_left",
            RoiHandle::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for RoiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoiHandle {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoiHandle::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| GeometryError::UnknownLandmark {
                name: s.to_string(),
            })
    }
}

/// Axis-aligned rectangle given by any subset of its landmarks.
///
/// Used for both the ROI and the slot. Absent keys are omitted when
/// serialized; `center` travels as a two-element array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
}

/// Resolved drawing bounds of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Empty rectangle with no landmarks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle from its left/top corner and size.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new()
            .with_left(left)
            .with_top(top)
            .with_width(width)
            .with_height(height)
    }

    pub fn with_left(mut self, v: f64) -> Self {
        self.left = Some(v);
        self
    }

    pub fn with_right(mut self, v: f64) -> Self {
        self.right = Some(v);
        self
    }

    pub fn with_top(mut self, v: f64) -> Self {
        self.top = Some(v);
        self
    }

    pub fn with_bottom(mut self, v: f64) -> Self {
        self.bottom = Some(v);
        self
    }

    pub fn with_width(mut self, v: f64) -> Self {
        self.width = Some(v);
        self
    }

    pub fn with_height(mut self, v: f64) -> Self {
        self.height = Some(v);
        self
    }

    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center = Some([x, y]);
        self
    }

    /// Explicitly supplied center, if any.
    pub fn center(&self) -> Option<WorldPoint> {
        self.center.map(|[x, y]| WorldPoint::new(x, y))
    }

    /// Explicit scalar value for a landmark. `Center` is never scalar.
    pub fn explicit(&self, landmark: Landmark) -> Option<f64> {
        match landmark {
            Landmark::Left => self.left,
            Landmark::Right => self.right,
            Landmark::Top => self.top,
            Landmark::Bottom => self.bottom,
            Landmark::Width => self.width,
            Landmark::Height => self.height,
            Landmark::Center => None,
        }
    }

    /// Resolve left/top/width/height for drawing.
    ///
    /// Returns `Ok(None)` when any of the four cannot be derived.
    pub fn resolve_bounds(&self) -> Result<Option<Bounds>, GeometryError> {
        let left = resolve(Landmark::Left, self)?;
        let top = resolve(Landmark::Top, self)?;
        let width = resolve(Landmark::Width, self)?;
        let height = resolve(Landmark::Height, self)?;
        Ok(match (left, top, width, height) {
            (Some(left), Some(top), Some(width), Some(height)) => Some(Bounds {
                left,
                top,
                width,
                height,
            }),
            _ => None,
        })
    }
}

/// Resolve one landmark of `rect` from whichever others are known.
///
/// An explicit value always wins. `Ok(None)` means the supplied subset does
/// not determine the landmark. `Center` has no derivation and always fails
/// with [`GeometryError::NotImplemented`].
pub fn resolve(landmark: Landmark, rect: &Rect) -> Result<Option<f64>, GeometryError> {
    if let Some(v) = rect.explicit(landmark) {
        return Ok(Some(v));
    }

    let center = rect.center;
    let value = match landmark {
        Landmark::Left => rect.width.and_then(|w| {
            rect.right
                .map(|r| r - w)
                .or_else(|| center.map(|[cx, _]| cx - w / 2.0))
        }),
        Landmark::Right => rect.width.and_then(|w| {
            rect.left
                .map(|l| l + w)
                .or_else(|| center.map(|[cx, _]| cx + w / 2.0))
        }),
        Landmark::Top => rect.height.and_then(|h| {
            rect.bottom
                .map(|b| b - h)
                .or_else(|| center.map(|[_, cy]| cy - h / 2.0))
        }),
        Landmark::Bottom => rect.height.and_then(|h| {
            rect.top
                .map(|t| t + h)
                .or_else(|| center.map(|[_, cy]| cy + h / 2.0))
        }),
        Landmark::Width => match (rect.left, rect.right) {
            (Some(l), Some(r)) => Some(r - l),
            _ => None,
        },
        Landmark::Height => match (rect.top, rect.bottom) {
            (Some(t), Some(b)) => Some(b - t),
            _ => None,
        },
        // TODO: derive center from edge pairs once the expected semantics
        // for partially specified slots are confirmed.
        Landmark::Center => return Err(GeometryError::NotImplemented { landmark }),
    };
    Ok(value)
}
