//! Bounded buffers for acquired tiles and thumbnails.
//!
//! Both buffers hand out indices from a counter that survives `clear()`, so
//! an index identifies one item for the lifetime of the viewport and keyed
//! redraws never confuse a new item with an old one.

use std::collections::VecDeque;

use stagekit_core::{ImageEntry, Tile, TileRecord};

/// Default number of thumbnails kept.
pub const DEFAULT_IMAGE_CAPACITY: usize = 100;

/// Append-only trail of acquired tiles
#[derive(Debug, Clone, Default)]
pub struct TileTrail {
    tiles: Vec<Tile>,
    next_index: u64,
}

impl TileTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tile, returning its assigned index.
    pub fn append(&mut self, record: TileRecord) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        self.tiles.push(Tile {
            index,
            meta: record.meta,
            vetoed: record.vetoed,
            regrabs: record.regrabs,
        });
        index
    }

    /// Drop every tile; the index counter keeps counting.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn last(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Index the next tile will receive.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }
}

/// World placement of a thumbnail (top-left corner and size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// FIFO window of thumbnails, oldest evicted first
#[derive(Debug, Clone)]
pub struct ImageWindow {
    entries: VecDeque<ImageEntry>,
    capacity: usize,
    next_index: u64,
}

impl Default for ImageWindow {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_IMAGE_CAPACITY)
    }
}

impl ImageWindow {
    /// Create a window holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_index: 0,
        }
    }

    /// Append an image and evict from the front while over capacity.
    ///
    /// Returns the new index and whatever was evicted, oldest first.
    pub fn append(
        &mut self,
        src: impl Into<String>,
        placement: ImagePlacement,
    ) -> (u64, Vec<ImageEntry>) {
        let index = self.next_index;
        self.next_index += 1;
        self.entries.push_back(ImageEntry {
            index,
            src: src.into(),
            x: placement.x,
            y: placement.y,
            w: placement.w,
            h: placement.h,
        });

        (index, self.evict())
    }

    /// Change the capacity (at least one), evicting the oldest entries that
    /// no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<ImageEntry> {
        self.capacity = capacity.max(1);
        self.evict()
    }

    fn evict(&mut self) -> Vec<ImageEntry> {
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(entry) = self.entries.pop_front() {
                evicted.push(entry);
            }
        }
        evicted
    }

    /// Drop every entry; the index counter keeps counting.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn next_index(&self) -> u64 {
        self.next_index
    }
}
