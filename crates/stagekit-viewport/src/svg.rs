//! SVG surface.
//!
//! Keeps every layer in a [`LayerStore`] and can serialise the whole
//! picture as a standalone SVG document. Useful headless, for snapshots, and
//! as the recording surface in tests.

use std::fmt::Write as _;

use crate::mapper::{AxisTicks, FrameGeometry};
use crate::render::{JoinStats, Layer, LayerStore, RenderSurface, Shape, ShapeKind};

/// A recording surface that renders to SVG
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    frame: Option<FrameGeometry>,
    axes: AxisTicks,
    layers: [LayerStore; 5],
    joins: usize,
}

fn slot(layer: Layer) -> usize {
    match layer {
        Layer::Images => 0,
        Layer::Tiles => 1,
        Layer::Rois => 2,
        Layer::Slot => 3,
        Layer::Position => 4,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<&FrameGeometry> {
        self.frame.as_ref()
    }

    pub fn axes(&self) -> &AxisTicks {
        &self.axes
    }

    /// Shapes currently in a layer, in document order
    pub fn layer(&self, layer: Layer) -> &[Shape] {
        self.layers[slot(layer)].shapes()
    }

    pub fn shape(&self, layer: Layer, key: &str) -> Option<&Shape> {
        self.layers[slot(layer)].get(key)
    }

    /// Number of joins performed so far
    pub fn join_count(&self) -> usize {
        self.joins
    }

    /// Serialise the current picture
    pub fn render(&self) -> String {
        let frame = self.frame.unwrap_or(FrameGeometry {
            outer_width: 0.0,
            outer_height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
        });

        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             width=\"{}\" height=\"{}\" style=\"background: gray\">",
            frame.outer_width, frame.outer_height
        );
        let _ = writeln!(
            out,
            "<g class=\"canvas\" transform=\"translate({}, {})\">",
            frame.offset_x, frame.offset_y
        );

        let _ = writeln!(
            out,
            "<g class=\"yaxis axis\" transform=\"translate({}, 0)\">",
            frame.width
        );
        for tick in &self.axes.y {
            let _ = writeln!(
                out,
                "<g class=\"tick\" transform=\"translate(0, {})\"><line x2=\"{}\"/><text x=\"3\">{}</text></g>",
                tick.position,
                -frame.width,
                escape(&tick.label)
            );
        }
        out.push_str("</g>\n");

        let _ = writeln!(
            out,
            "<g class=\"xaxis axis\" transform=\"translate(0, {})\">",
            frame.height
        );
        for tick in &self.axes.x {
            let _ = writeln!(
                out,
                "<g class=\"tick\" transform=\"translate({}, 0)\"><line y2=\"{}\"/><text y=\"12\">{}</text></g>",
                tick.position,
                -frame.height,
                escape(&tick.label)
            );
        }
        out.push_str("</g>\n");

        for layer in Layer::ALL {
            let _ = writeln!(out, "<g class=\"{}\">", layer);
            for shape in self.layer(layer) {
                write_shape(&mut out, shape);
            }
            out.push_str("</g>\n");
        }

        out.push_str("</g>\n</svg>\n");
        out
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    let key = escape(&shape.key);
    match &shape.kind {
        ShapeKind::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
            stroke,
        } => {
            let _ = write!(
                out,
                "<rect class=\"{}\" data-key=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                shape.class, key, x, y, width, height
            );
            if *rx != 0.0 || *ry != 0.0 {
                let _ = write!(out, " rx=\"{}\" ry=\"{}\"", rx, ry);
            }
            if let Some(stroke) = stroke {
                let _ = write!(out, " stroke=\"{}\"", stroke);
            }
            out.push_str("/>\n");
        }
        ShapeKind::Circle { cx, cy, r } => {
            let _ = writeln!(
                out,
                "<circle class=\"{}\" data-key=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                shape.class, key, cx, cy, r
            );
        }
        ShapeKind::Image {
            x,
            y,
            width,
            height,
            href,
        } => {
            let _ = writeln!(
                out,
                "<image class=\"{}\" data-key=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" xlink:href=\"{}\"/>",
                shape.class,
                key,
                x,
                y,
                width,
                height,
                escape(href)
            );
        }
    }
}

impl RenderSurface for SvgSurface {
    fn set_frame(&mut self, frame: &FrameGeometry) {
        self.frame = Some(*frame);
    }

    fn set_axes(&mut self, ticks: &AxisTicks, _frame: &FrameGeometry) {
        self.axes = ticks.clone();
    }

    fn join(&mut self, layer: Layer, items: Vec<Shape>, update_existing: bool) -> JoinStats {
        self.joins += 1;
        self.layers[slot(layer)].reconcile(items, update_existing)
    }
}
