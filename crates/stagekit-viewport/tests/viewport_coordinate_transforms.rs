//! Tests for world/pixel coordinate transformations

use proptest::prelude::*;
use stagekit_core::{PixelPoint, WorldPoint};
use stagekit_viewport::{CoordinateMapper, LinearScale, Margins, ResizeRequest};

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
fn test_world_canvas_corners() {
    let mapper = default_mapper();
    let top_left = mapper.world_to_canvas(WorldPoint::new(-1_000_000.0, -1_000_000.0));
    assert_eq!(top_left, PixelPoint::new(0.0, 0.0));
    let bottom_right = mapper.world_to_canvas(WorldPoint::new(1_000_000.0, 1_000_000.0));
    assert_eq!(bottom_right, PixelPoint::new(500.0, 500.0));
}

#[test]
fn test_frame_point_includes_margins() {
    let mapper = default_mapper();
    assert_eq!(
        mapper.frame_to_world(PixelPoint::new(50.0, 50.0)),
        WorldPoint::new(-1_000_000.0, -1_000_000.0)
    );
    assert!(mapper.contains_frame_point(PixelPoint::new(50.0, 550.0)));
    assert!(!mapper.contains_frame_point(PixelPoint::new(49.9, 300.0)));
    assert!(!mapper.contains_frame_point(PixelPoint::new(300.0, 550.1)));
}

#[test]
fn test_zoom_halves_and_doubles_about_center() {
    let mapper = CoordinateMapper::new([0.0, 100.0], [-40.0, 40.0], 500.0, 500.0, None).unwrap();

    let (x, y) = mapper.zoomed_domains(0.5);
    assert_eq!(x, [25.0, 75.0]);
    assert_eq!(y, [-20.0, 20.0]);

    let (x, y) = mapper.zoomed_domains(2.0);
    assert_eq!(x, [-50.0, 150.0]);
    assert_eq!(y, [-80.0, 80.0]);
}

#[test]
fn test_zoom_in_in_does_not_restore() {
    let mut mapper = default_mapper();
    for _ in 0..2 {
        let (x, y) = mapper.zoomed_domains(0.5);
        mapper.resize(ResizeRequest::domains(x, y)).unwrap();
    }
    assert_eq!(mapper.x_domain(), [-250_000.0, 250_000.0]);

    let (x, y) = mapper.zoomed_domains(2.0);
    mapper.resize(ResizeRequest::domains(x, y)).unwrap();
    assert_ne!(mapper.x_domain(), [-1_000_000.0, 1_000_000.0]);
}

#[test]
fn test_pan_follows_pointer() {
    let mapper = default_mapper();
    // Dragging right by 50px (200,000 world units) moves the view left
    let (x, y) = mapper.panned_domains(50.0, 0.0);
    assert_eq!(x, [-1_200_000.0, 800_000.0]);
    assert_eq!(y, [-1_000_000.0, 1_000_000.0]);
}

#[test]
fn test_explicit_margins_persist() {
    let mut mapper = default_mapper();
    mapper
        .resize(ResizeRequest::extent(400.0, 400.0).with_margins(Margins::new(1.0, 2.0, 3.0, 4.0)))
        .unwrap();
    mapper.resize(ResizeRequest::extent(800.0, 600.0)).unwrap();
    assert_eq!(mapper.margins(), Margins::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(mapper.frame().outer_width, 806.0);
}

#[test]
fn test_failed_resize_changes_nothing() {
    let mut mapper = default_mapper();
    assert!(mapper
        .resize(ResizeRequest::domains([5.0, 5.0], [0.0, 1.0]))
        .is_err());
    assert!(mapper.resize(ResizeRequest::extent(0.0, 100.0)).is_err());
    assert_eq!(mapper.x_domain(), [-1_000_000.0, 1_000_000.0]);
    assert_eq!(mapper.width(), 500.0);
}

#[test]
fn test_tick_labels_in_display_units() {
    let mapper = default_mapper();
    let labels: Vec<&str> = mapper.ticks().x.iter().map(|t| t.label.as_str()).collect();
    assert!(labels.contains(&"0"));
    assert!(labels.contains(&"-1"));
    assert!(labels.contains(&"1"));
}

proptest! {
    #[test]
    fn prop_invert_map_round_trip(
        d0 in -1.0e7f64..1.0e7,
        span in 1.0f64..1.0e7,
        r1 in 1.0f64..4000.0,
        v in -1.0e7f64..1.0e7,
    ) {
        let scale = LinearScale::new([d0, d0 + span], [0.0, r1]).unwrap();
        let back = scale.invert(scale.map(v));
        prop_assert!((back - v).abs() <= 1e-6 * (1.0 + v.abs().max(span)));
    }

    #[test]
    fn prop_canvas_world_round_trip(px in 0.0f64..500.0, py in 0.0f64..500.0) {
        let mapper = default_mapper();
        let world = mapper.canvas_to_world(PixelPoint::new(px, py));
        let back = mapper.world_to_canvas(world);
        prop_assert!((back.x - px).abs() < 1e-6);
        prop_assert!((back.y - py).abs() < 1e-6);
    }

    #[test]
    fn prop_zoom_in_out_restores_span(lo in -1.0e6f64..0.0, span in 1.0f64..1.0e6) {
        let mut mapper = CoordinateMapper::new([lo, lo + span], [lo, lo + span], 500.0, 500.0, None).unwrap();
        let (x, y) = mapper.zoomed_domains(0.5);
        mapper.resize(ResizeRequest::domains(x, y)).unwrap();
        let (x, y) = mapper.zoomed_domains(2.0);
        mapper.resize(ResizeRequest::domains(x, y)).unwrap();
        let [a, b] = mapper.x_domain();
        prop_assert!(((b - a) - span).abs() < 1e-6 * span.max(1.0));
        prop_assert!((((a + b) / 2.0) - (lo + span / 2.0)).abs() < 1e-6 * (1.0 + lo.abs()));
    }
}
