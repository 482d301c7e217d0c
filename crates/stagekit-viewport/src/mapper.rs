//! Coordinate mapper
//!
//! Bidirectional transforms between world (domain) coordinates and canvas
//! pixel (range) coordinates, plus margin bookkeeping, axis ticks, and the
//! domain arithmetic behind zoom and pan.
//!
//! Three pixel spaces are involved:
//! - *frame*: the outer element including margins, origin at its top-left
//! - *canvas*: the drawable area, offset from the frame by the left/top margins
//! - *world*: stage coordinates, mapped onto the canvas by the four scales

use serde::{Deserialize, Serialize};

use stagekit_core::units::{format_world, DEFAULT_DIVISOR};
use stagekit_core::{MapperError, PixelPoint, WorldPoint};
use stagekit_settings::{AxisSettings, CanvasSettings};

use crate::scale::LinearScale;

/// Fraction of the canvas extent used for each default margin.
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.1;

/// Pixel insets between the frame and the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// 10% of the extent on each side.
    pub fn proportional(width: f64, height: f64) -> Self {
        let h = width * DEFAULT_MARGIN_FRACTION;
        let v = height * DEFAULT_MARGIN_FRACTION;
        Self::new(v, h, v, h)
    }

    fn validate(&self) -> Result<(), MapperError> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(MapperError::InvalidMargin { side, value });
            }
        }
        Ok(())
    }
}

impl From<stagekit_settings::MarginSettings> for Margins {
    fn from(m: stagekit_settings::MarginSettings) -> Self {
        Self::new(m.top, m.right, m.bottom, m.left)
    }
}

/// Partial update for [`CoordinateMapper::resize`]; `None` keeps the current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeRequest {
    pub x_domain: Option<[f64; 2]>,
    pub y_domain: Option<[f64; 2]>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margins: Option<Margins>,
}

impl ResizeRequest {
    pub fn domains(x_domain: [f64; 2], y_domain: [f64; 2]) -> Self {
        Self {
            x_domain: Some(x_domain),
            y_domain: Some(y_domain),
            ..Self::default()
        }
    }

    pub fn extent(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }
}

/// One axis tick: world value, canvas position, and label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

/// Ticks for both axes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTicks {
    pub x: Vec<AxisTick>,
    pub y: Vec<AxisTick>,
}

/// Outer frame and canvas placement in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub outer_width: f64,
    pub outer_height: f64,
    /// Canvas offset inside the frame (left, top margins)
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Zoom step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Positive wheel delta zooms in, negative zooms out, zero does nothing.
    pub fn from_wheel_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(ZoomDirection::In)
        } else if delta < 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

/// Whether a pan redraw is mid-gesture or final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanMode {
    /// Skip the image layer for this redraw.
    Provisional,
    /// Redraw everything.
    Commit,
}

fn scale_about_center([a, b]: [f64; 2], factor: f64) -> [f64; 2] {
    let center = (a + b) / 2.0;
    let span = (b - a) * factor;
    [center - span / 2.0, center + span / 2.0]
}

fn shift([a, b]: [f64; 2], delta: f64) -> [f64; 2] {
    let center = (a + b) / 2.0 + delta;
    let span = b - a;
    [center - span / 2.0, center + span / 2.0]
}

fn check_extent(width: f64, height: f64) -> Result<(), MapperError> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(MapperError::InvalidExtent { width, height });
    }
    Ok(())
}

fn check_domain(axis: &'static str, [start, end]: [f64; 2]) -> Result<(), MapperError> {
    let span = end - start;
    if span == 0.0 || !span.is_finite() {
        return Err(MapperError::DegenerateSpan { axis, start, end });
    }
    Ok(())
}

/// World/canvas transforms for one viewport
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    x_domain: [f64; 2],
    y_domain: [f64; 2],
    width: f64,
    height: f64,
    margins: Margins,
    explicit_margins: bool,
    x: LinearScale,
    y: LinearScale,
    ix: LinearScale,
    iy: LinearScale,
    tick_count: usize,
    tick_divisor: f64,
    ticks: AxisTicks,
}

impl CoordinateMapper {
    /// Create a mapper; margins default to 10% of the extent when `None`.
    pub fn new(
        x_domain: [f64; 2],
        y_domain: [f64; 2],
        width: f64,
        height: f64,
        margins: Option<Margins>,
    ) -> Result<Self, MapperError> {
        check_domain("x domain", x_domain)?;
        check_domain("y domain", y_domain)?;
        check_extent(width, height)?;
        let explicit_margins = margins.is_some();
        let margins = margins.unwrap_or_else(|| Margins::proportional(width, height));
        margins.validate()?;

        let x = LinearScale::new(x_domain, [0.0, width])?;
        let y = LinearScale::new(y_domain, [0.0, height])?;
        let mut mapper = Self {
            x_domain,
            y_domain,
            width,
            height,
            margins,
            explicit_margins,
            x,
            y,
            ix: x.inverse(),
            iy: y.inverse(),
            tick_count: 8,
            tick_divisor: DEFAULT_DIVISOR,
            ticks: AxisTicks::default(),
        };
        mapper.rebuild_ticks();
        Ok(mapper)
    }

    /// Create a mapper from configuration sections
    pub fn from_settings(canvas: &CanvasSettings, axis: &AxisSettings) -> Result<Self, MapperError> {
        let mut mapper = Self::new(
            canvas.x_domain,
            canvas.y_domain,
            canvas.width,
            canvas.height,
            canvas.margins.map(Margins::from),
        )?;
        mapper.set_tick_format(axis.tick_count, axis.tick_divisor);
        Ok(mapper)
    }

    /// Change tick density and label divisor
    pub fn set_tick_format(&mut self, tick_count: usize, tick_divisor: f64) {
        self.tick_count = tick_count.max(1);
        if tick_divisor > 0.0 && tick_divisor.is_finite() {
            self.tick_divisor = tick_divisor;
        }
        self.rebuild_ticks();
    }

    /// Apply a partial update
    ///
    /// Omitted fields keep their previous values. Explicit margins, once
    /// given, persist; otherwise margins follow the new extent. Nothing
    /// changes when validation fails.
    pub fn resize(&mut self, request: ResizeRequest) -> Result<(), MapperError> {
        let x_domain = request.x_domain.unwrap_or(self.x_domain);
        let y_domain = request.y_domain.unwrap_or(self.y_domain);
        let width = request.width.unwrap_or(self.width);
        let height = request.height.unwrap_or(self.height);
        check_domain("x domain", x_domain)?;
        check_domain("y domain", y_domain)?;
        check_extent(width, height)?;

        let (margins, explicit) = match request.margins {
            Some(m) => (m, true),
            None if self.explicit_margins => (self.margins, true),
            None => (Margins::proportional(width, height), false),
        };
        margins.validate()?;

        let x = LinearScale::new(x_domain, [0.0, width])?;
        let y = LinearScale::new(y_domain, [0.0, height])?;

        self.x_domain = x_domain;
        self.y_domain = y_domain;
        self.width = width;
        self.height = height;
        self.margins = margins;
        self.explicit_margins = explicit;
        self.x = x;
        self.y = y;
        self.ix = x.inverse();
        self.iy = y.inverse();
        self.rebuild_ticks();
        tracing::debug!(
            "Mapper resized: x {:?} y {:?} {}x{} px",
            x_domain,
            y_domain,
            width,
            height
        );
        Ok(())
    }

    fn rebuild_ticks(&mut self) {
        let divisor = self.tick_divisor;
        let build = |scale: &LinearScale, count: usize| {
            scale
                .ticks(count)
                .into_iter()
                .map(|value| AxisTick {
                    value,
                    position: scale.map(value),
                    label: format_world(value, divisor),
                })
                .collect()
        };
        self.ticks = AxisTicks {
            x: build(&self.x, self.tick_count),
            y: build(&self.y, self.tick_count),
        };
    }

    pub fn x_domain(&self) -> [f64; 2] {
        self.x_domain
    }

    pub fn y_domain(&self) -> [f64; 2] {
        self.y_domain
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn ticks(&self) -> &AxisTicks {
        &self.ticks
    }

    /// World to canvas x scale
    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    /// World to canvas y scale
    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    /// Canvas to world x scale
    pub fn ix_scale(&self) -> &LinearScale {
        &self.ix
    }

    /// Canvas to world y scale
    pub fn iy_scale(&self) -> &LinearScale {
        &self.iy
    }

    pub fn frame(&self) -> FrameGeometry {
        let m = self.margins;
        FrameGeometry {
            outer_width: self.width + m.left + m.right,
            outer_height: self.height + m.top + m.bottom,
            offset_x: m.left,
            offset_y: m.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn world_to_canvas(&self, p: WorldPoint) -> PixelPoint {
        PixelPoint::new(self.x.map(p.x), self.y.map(p.y))
    }

    pub fn canvas_to_world(&self, p: PixelPoint) -> WorldPoint {
        WorldPoint::new(self.ix.map(p.x), self.iy.map(p.y))
    }

    /// Frame pixel (including margins) to world
    pub fn frame_to_world(&self, p: PixelPoint) -> WorldPoint {
        self.canvas_to_world(PixelPoint::new(
            p.x - self.margins.left,
            p.y - self.margins.top,
        ))
    }

    /// Whether a frame pixel lies on the canvas (edges inclusive)
    pub fn contains_frame_point(&self, p: PixelPoint) -> bool {
        let m = self.margins;
        p.x >= m.left && p.x <= m.left + self.width && p.y >= m.top && p.y <= m.top + self.height
    }

    /// Canvas length of a world distance along x
    pub fn length_x(&self, distance: f64) -> f64 {
        self.x.length(distance)
    }

    /// Canvas length of a world distance along y
    pub fn length_y(&self, distance: f64) -> f64 {
        self.y.length(distance)
    }

    /// Both domains scaled by `factor` about their centers
    pub fn zoomed_domains(&self, factor: f64) -> ([f64; 2], [f64; 2]) {
        (
            scale_about_center(self.x_domain, factor),
            scale_about_center(self.y_domain, factor),
        )
    }

    /// Both domains translated by the world equivalent of a pixel drag
    ///
    /// Dragging right by `dx` moves the view left, so the content follows
    /// the pointer.
    pub fn panned_domains(&self, dx: f64, dy: f64) -> ([f64; 2], [f64; 2]) {
        (
            shift(self.x_domain, self.ix.map(0.0) - self.ix.map(dx)),
            shift(self.y_domain, self.iy.map(0.0) - self.iy.map(dy)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_mapper() -> CoordinateMapper {
        CoordinateMapper::new(
            [-1_000_000.0, 1_000_000.0],
            [-1_000_000.0, 1_000_000.0],
            500.0,
            500.0,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_default_geometry() {
        let mapper = default_mapper();
        assert_eq!(mapper.margins(), Margins::new(50.0, 50.0, 50.0, 50.0));
        let frame = mapper.frame();
        assert_eq!(frame.outer_width, 600.0);
        assert_eq!(frame.offset_x, 50.0);
        assert_eq!(
            mapper.world_to_canvas(WorldPoint::new(0.0, 0.0)),
            PixelPoint::new(250.0, 250.0)
        );
    }

    #[test]
    fn test_frame_to_world() {
        let mapper = default_mapper();
        let p = mapper.frame_to_world(PixelPoint::new(50.0, 550.0));
        assert_eq!(p, WorldPoint::new(-1_000_000.0, 1_000_000.0));
    }

    #[test]
    fn test_contains_frame_point() {
        let mapper = default_mapper();
        assert!(mapper.contains_frame_point(PixelPoint::new(50.0, 50.0)));
        assert!(mapper.contains_frame_point(PixelPoint::new(550.0, 550.0)));
        assert!(!mapper.contains_frame_point(PixelPoint::new(49.9, 100.0)));
        assert!(!mapper.contains_frame_point(PixelPoint::new(100.0, 551.0)));
    }

    #[test]
    fn test_resize_keeps_omitted_fields() {
        let mut mapper = default_mapper();
        mapper.resize(ResizeRequest::extent(800.0, 400.0)).unwrap();
        assert_eq!(mapper.x_domain(), [-1_000_000.0, 1_000_000.0]);
        assert_eq!(mapper.width(), 800.0);
        assert_eq!(mapper.margins(), Margins::new(40.0, 80.0, 40.0, 80.0));
    }

    #[test]
    fn test_explicit_margins_persist() {
        let mut mapper = default_mapper();
        let margins = Margins::new(1.0, 2.0, 3.0, 4.0);
        mapper
            .resize(ResizeRequest::default().with_margins(margins))
            .unwrap();
        mapper.resize(ResizeRequest::extent(300.0, 300.0)).unwrap();
        assert_eq!(mapper.margins(), margins);
    }

    #[test]
    fn test_invalid_resize_changes_nothing() {
        let mut mapper = default_mapper();
        let before = mapper.x_domain();
        let err = mapper
            .resize(ResizeRequest::domains([5.0, 5.0], [0.0, 1.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            MapperError::DegenerateSpan {
                axis: "x domain",
                ..
            }
        ));
        assert_eq!(mapper.x_domain(), before);

        assert!(matches!(
            mapper.resize(ResizeRequest::extent(0.0, 100.0)),
            Err(MapperError::InvalidExtent { .. })
        ));
        assert!(matches!(
            mapper.resize(ResizeRequest::default().with_margins(Margins::new(-1.0, 0.0, 0.0, 0.0))),
            Err(MapperError::InvalidMargin { side: "top", .. })
        ));
    }

    #[test]
    fn test_tick_labels() {
        let mapper = default_mapper();
        let labels: Vec<&str> = mapper.ticks().x.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"-1"));
        assert!(labels.contains(&"0"));
        assert!(labels.contains(&"0.4"));
        assert_eq!(labels.last(), Some(&"1"));
        assert_eq!(mapper.ticks().x[5].position, 250.0);
    }

    #[test]
    fn test_zoom_domains() {
        let mapper = CoordinateMapper::new([0.0, 100.0], [-50.0, 50.0], 500.0, 500.0, None).unwrap();
        let (x, y) = mapper.zoomed_domains(0.5);
        assert_eq!(x, [25.0, 75.0]);
        assert_eq!(y, [-25.0, 25.0]);
        let (x, _) = mapper.zoomed_domains(2.0);
        assert_eq!(x, [-50.0, 150.0]);
    }

    #[test]
    fn test_pan_domains_follow_pointer() {
        let mapper = default_mapper();
        // 1 px = 4000 world units
        let (x, y) = mapper.panned_domains(10.0, -5.0);
        assert_eq!(x, [-1_040_000.0, 960_000.0]);
        assert_eq!(y, [-980_000.0, 1_020_000.0]);
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(-1.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
    }
}
