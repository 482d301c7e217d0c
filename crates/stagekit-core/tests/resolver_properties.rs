//! Property tests for the landmark resolver

use proptest::prelude::*;
use stagekit_core::geometry::{resolve, Landmark, Rect};
use stagekit_core::GeometryError;

fn coord() -> impl Strategy<Value = f64> {
    (-1_000_000i64..1_000_000).prop_map(|v| v as f64)
}

fn span() -> impl Strategy<Value = f64> {
    (1i64..500_000).prop_map(|v| v as f64)
}

proptest! {
    #[test]
    fn edge_pair_and_edge_size_agree(left in coord(), width in span()) {
        let right = left + width;

        let by_edges = Rect::new().with_left(left).with_right(right);
        prop_assert_eq!(resolve(Landmark::Width, &by_edges), Ok(Some(width)));

        let by_right = Rect::new().with_right(right).with_width(width);
        prop_assert_eq!(resolve(Landmark::Left, &by_right), Ok(Some(left)));

        let by_left = Rect::new().with_left(left).with_width(width);
        prop_assert_eq!(resolve(Landmark::Right, &by_left), Ok(Some(right)));
    }

    #[test]
    fn center_and_size_agree_with_edges(cy in coord(), half in span()) {
        let height = half * 2.0;
        let rect = Rect::new().with_center(0.0, cy).with_height(height);
        prop_assert_eq!(resolve(Landmark::Top, &rect), Ok(Some(cy - half)));
        prop_assert_eq!(resolve(Landmark::Bottom, &rect), Ok(Some(cy + half)));
    }

    #[test]
    fn center_always_fails(
        left in proptest::option::of(coord()),
        right in proptest::option::of(coord()),
        width in proptest::option::of(span()),
        center in proptest::option::of((coord(), coord())),
    ) {
        let rect = Rect {
            left,
            right,
            width,
            center: center.map(|(x, y)| [x, y]),
            ..Rect::default()
        };
        prop_assert_eq!(
            resolve(Landmark::Center, &rect),
            Err(GeometryError::NotImplemented { landmark: Landmark::Center })
        );
    }

    #[test]
    fn resolution_never_mutates(left in coord(), width in span(), cx in coord()) {
        let rect = Rect::new().with_left(left).with_width(width).with_center(cx, 0.0);
        let before = rect;
        for landmark in Landmark::ALL {
            let _ = resolve(landmark, &rect);
        }
        prop_assert_eq!(rect, before);
    }
}
