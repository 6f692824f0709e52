//! Spatial hash for particle neighbour queries.
//!
//! Index-based buckets: `heads[cell]` holds the first particle slot in a
//! cell and `next[slot]` chains to the following one. Only touched cells are
//! reset on [`SpatialHash::clear`], so a rebuild costs O(live particles).
//! Each hash cell spans two world units, so the 512×512 grid covers the
//! whole 1024×1024 world.

use arrayvec::ArrayVec;

use crate::types::{HASH_SIZE, WORLD_SIZE};

const NONE: u32 = u32::MAX;
const CELL_SHIFT: u32 = (WORLD_SIZE / HASH_SIZE).trailing_zeros();

/// Hash cell coordinates.
pub type CellKey = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialHash {
    heads: Vec<u32>,
    next: Vec<u32>,
    touched: Vec<u32>,
}

impl SpatialHash {
    /// Hash sized for `capacity` particle slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            heads: vec![NONE; HASH_SIZE * HASH_SIZE],
            next: vec![NONE; capacity],
            touched: Vec::with_capacity(capacity),
        }
    }

    /// Cell for a world position, or `None` outside the world.
    #[inline]
    pub fn cell_of(x: f32, y: f32) -> Option<CellKey> {
        let (fx, fy) = (x.floor(), y.floor());
        let world = WORLD_SIZE as f32;
        if !(0.0..world).contains(&fx) || !(0.0..world).contains(&fy) {
            return None;
        }
        Some(((fx as i32) >> CELL_SHIFT, (fy as i32) >> CELL_SHIFT))
    }

    #[inline]
    fn key(cell: CellKey) -> Option<usize> {
        let (cx, cy) = cell;
        let n = HASH_SIZE as i32;
        if cx < 0 || cy < 0 || cx >= n || cy >= n {
            return None;
        }
        Some(cy as usize * HASH_SIZE + cx as usize)
    }

    /// Empty every bucket touched since the last clear.
    pub fn clear(&mut self) {
        for key in self.touched.drain(..) {
            self.heads[key as usize] = NONE;
        }
        self.next.fill(NONE);
    }

    /// Prepend `slot` to the bucket of `cell`.
    pub fn insert(&mut self, slot: usize, cell: CellKey) {
        let Some(key) = Self::key(cell) else {
            return;
        };
        let head = self.heads[key];
        if head == NONE {
            self.touched.push(key as u32);
        }
        self.next[slot] = head;
        self.heads[key] = slot as u32;
    }

    /// Drop any chain link held by `slot`.
    pub fn unlink(&mut self, slot: usize) {
        if let Some(n) = self.next.get_mut(slot) {
            *n = NONE;
        }
    }

    /// The in-range cells of the 3×3 block around `cell`.
    pub fn neighborhood(cell: CellKey) -> ArrayVec<CellKey, 9> {
        let mut out = ArrayVec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                let c = (cell.0 + dx, cell.1 + dy);
                if Self::key(c).is_some() {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Slots bucketed in `cell`, most recently inserted first.
    pub fn chain(&self, cell: CellKey) -> Chain<'_> {
        let cur = Self::key(cell).map_or(NONE, |k| self.heads[k]);
        Chain { hash: self, cur }
    }

    /// Number of non-empty buckets.
    pub fn occupied(&self) -> usize {
        self.touched.len()
    }
}

/// Iterator over one bucket's chain.
pub struct Chain<'a> {
    hash: &'a SpatialHash,
    cur: u32,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cur == NONE {
            return None;
        }
        let slot = self.cur as usize;
        self.cur = self.hash.next[slot];
        Some(slot)
    }
}
