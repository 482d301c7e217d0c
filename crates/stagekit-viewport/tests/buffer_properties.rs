//! Property tests for the tile trail and image window

use proptest::prelude::*;
use stagekit_core::{TileMeta, TileRecord};
use stagekit_viewport::{ImagePlacement, ImageWindow, TileTrail};

fn placement(i: usize) -> ImagePlacement {
    ImagePlacement {
        x: i as f64,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    }
}

proptest! {
    #[test]
    fn prop_window_keeps_last_n(capacity in 1usize..50, extra in 0usize..80) {
        let mut window = ImageWindow::with_capacity(capacity);
        let total = capacity + extra;
        let mut evicted_total = 0;
        for i in 0..total {
            let (index, evicted) = window.append(format!("img-{}", i), placement(i));
            prop_assert_eq!(index, i as u64);
            prop_assert!(window.len() <= capacity);
            evicted_total += evicted.len();
        }
        prop_assert_eq!(evicted_total, extra);

        let kept: Vec<u64> = window.iter().map(|e| e.index).collect();
        let expected: Vec<u64> = (extra as u64..total as u64).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn prop_tile_indices_strictly_increase(batches in proptest::collection::vec(1usize..10, 1..6)) {
        let mut trail = TileTrail::new();
        let mut last: Option<u64> = None;
        for batch in batches {
            for _ in 0..batch {
                let index = trail.append(TileRecord {
                    meta: TileMeta { x: 0.0, y: 0.0 },
                    ..TileRecord::default()
                });
                if let Some(prev) = last {
                    prop_assert!(index > prev);
                }
                last = Some(index);
            }
            trail.clear();
            prop_assert!(trail.is_empty());
        }
    }
}

#[test]
fn test_tile_indices_across_clear() {
    let mut trail = TileTrail::new();
    let indices: Vec<u64> = (0..3).map(|_| trail.append(TileRecord::default())).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    trail.clear();
    assert_eq!(trail.append(TileRecord::default()), 3);
    assert_eq!(trail.len(), 1);
}

#[test]
fn test_window_clear_keeps_counter() {
    let mut window = ImageWindow::with_capacity(2);
    window.append("a".to_string(), placement(0));
    window.append("b".to_string(), placement(1));
    window.clear();
    assert!(window.is_empty());
    let (index, evicted) = window.append("c".to_string(), placement(2));
    assert_eq!(index, 2);
    assert!(evicted.is_empty());
}
