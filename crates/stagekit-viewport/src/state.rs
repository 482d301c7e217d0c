//! Viewport state: the last known snapshot used to redraw without asking
//! the remote side again.
//!
//! Readers get shared references. All mutators are crate-private; outside
//! this crate the only way to change the snapshot is an
//! [`InboundQueue`](crate::inbound::InboundQueue) drained by
//! [`ViewportController::drain`](crate::controller::ViewportController::drain).

use stagekit_core::{Fov, ImageEntry, Rect, TileRecord, WorldPoint};

use crate::buffers::{ImagePlacement, ImageWindow, TileTrail};

#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    position: Option<WorldPoint>,
    rois: Vec<Rect>,
    slot: Option<WorldPoint>,
    tiles: TileTrail,
    images: ImageWindow,
    fov: Fov,
}

impl ViewportState {
    pub(crate) fn new(fov: Fov, image_capacity: usize) -> Self {
        Self {
            fov,
            images: ImageWindow::with_capacity(image_capacity),
            ..Self::default()
        }
    }

    pub fn position(&self) -> Option<WorldPoint> {
        self.position
    }

    pub fn rois(&self) -> &[Rect] {
        &self.rois
    }

    /// Slot centre
    pub fn slot(&self) -> Option<WorldPoint> {
        self.slot
    }

    pub fn tiles(&self) -> &TileTrail {
        &self.tiles
    }

    pub fn images(&self) -> &ImageWindow {
        &self.images
    }

    pub fn fov(&self) -> Fov {
        self.fov
    }

    pub(crate) fn set_position(&mut self, p: WorldPoint) {
        self.position = Some(p);
    }

    pub(crate) fn set_rois(&mut self, rois: Vec<Rect>) {
        self.rois = rois;
    }

    pub(crate) fn set_slot(&mut self, center: WorldPoint) {
        self.slot = Some(center);
    }

    pub(crate) fn set_fov(&mut self, fov: Fov) {
        self.fov = fov;
    }

    /// Append a tile; the position follows the newest tile.
    pub(crate) fn push_tile(&mut self, record: TileRecord) -> u64 {
        let index = self.tiles.append(record);
        self.position = Some(WorldPoint::new(record.meta.x, record.meta.y));
        index
    }

    pub(crate) fn clear_tiles(&mut self) {
        self.tiles.clear();
    }

    /// Place a thumbnail by its centre and size.
    ///
    /// A missing centre falls back to the last position, a missing size to
    /// the fov. Returns `None` when there is no centre to use.
    pub(crate) fn push_image(
        &mut self,
        src: String,
        center: Option<WorldPoint>,
        size: Option<(f64, f64)>,
    ) -> Option<(u64, Vec<ImageEntry>)> {
        let center = center.or(self.position)?;
        let (w, h) = size.unwrap_or((self.fov.width, self.fov.height));
        let placement = ImagePlacement {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        };
        Some(self.images.append(src, placement))
    }

    pub(crate) fn set_image_capacity(&mut self, capacity: usize) -> Vec<ImageEntry> {
        self.images.set_capacity(capacity)
    }

    pub(crate) fn clear_images(&mut self) {
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagekit_core::TileMeta;

    #[test]
    fn test_tile_moves_position() {
        let mut state = ViewportState::new(Fov::default(), 10);
        state.push_tile(TileRecord {
            meta: TileMeta { x: 7.0, y: -3.0 },
            ..TileRecord::default()
        });
        assert_eq!(state.position(), Some(WorldPoint::new(7.0, -3.0)));
        assert_eq!(state.tiles().last().map(|t| t.index), Some(0));
    }

    #[test]
    fn test_image_defaults_to_position_and_fov() {
        let mut state = ViewportState::new(Fov::new(100.0, 50.0), 10);
        assert!(state.push_image("a".into(), None, None).is_none());

        state.set_position(WorldPoint::new(1000.0, 2000.0));
        let (index, evicted) = state.push_image("a".into(), None, None).unwrap();
        assert_eq!(index, 0);
        assert!(evicted.is_empty());
        let entry = state.images().iter().next().unwrap();
        assert_eq!((entry.x, entry.y, entry.w, entry.h), (950.0, 1975.0, 100.0, 50.0));
    }

    #[test]
    fn test_image_explicit_center_and_size() {
        let mut state = ViewportState::new(Fov::default(), 10);
        state
            .push_image("b".into(), Some(WorldPoint::new(0.0, 0.0)), Some((10.0, 20.0)))
            .unwrap();
        let entry = state.images().iter().next().unwrap();
        assert_eq!((entry.x, entry.y), (-5.0, -10.0));
    }
}
