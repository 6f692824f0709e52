//! Level descriptors and terrain construction.
//!
//! A level is a 64×64 grid of [`LevelCell`]s plus a start cell. Each level
//! cell covers a 16×16 block of world cells. Rock cells are filled with
//! randomly placed rock stamps; the start and goal areas are carved clear
//! with subtractive stamps; the speckle field is seeded last.
//!
//! Levels come either from JSON:
//!
//! ```json
//! { "start": [32, 4], "rows": ["0000…", "0110…", …] }
//! ```
//!
//! (64 rows of 64 digits `0`–`3`), or from [`LevelDesc::generated`].

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::atlas::Atlas;
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::terrain::Terrain;
use crate::types::{LevelCell, SpriteDesc, LEVEL_CELL, LEVEL_GRID, ROCKS};

/// Base height of stamped rocks.
pub const ROCK_BASE_HEIGHT: i32 = 128;

/// Rock stamps scattered inside each rock cell.
pub const ROCK_STAMPS_PER_CELL: u32 = 6;

/// Largest rock mask, reused as the carving brush.
pub const CARVE_BRUSH: SpriteDesc = ROCKS[2];

/// First row of solid ground in generated levels.
pub const GROUND_ROW: usize = 52;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level needs {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("level row {row} needs {expected} cells, got {actual}")]
    RowWidth { row: usize, expected: usize, actual: usize },
    #[error("level row {row} column {col}: unknown cell {ch:?}")]
    BadCell { row: usize, col: usize, ch: char },
    #[error("start cell ({x}, {y}) is outside the level")]
    StartOutOfRange { x: i32, y: i32 },
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    start: [i32; 2],
    rows: Vec<String>,
}

/// Parsed level grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDesc {
    cells: Grid<LevelCell>,
    start: (i32, i32),
}

impl LevelDesc {
    /// Parse the JSON level format.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        let rows: Vec<&str> = file.rows.iter().map(String::as_str).collect();
        Self::from_rows(&rows, (file.start[0], file.start[1]))
    }

    /// Build from 64 rows of 64 digit characters.
    pub fn from_rows(rows: &[&str], start: (i32, i32)) -> Result<Self, LevelError> {
        if rows.len() != LEVEL_GRID {
            return Err(LevelError::RowCount {
                expected: LEVEL_GRID,
                actual: rows.len(),
            });
        }
        let mut cells = Grid::new(LEVEL_GRID, LEVEL_GRID, LevelCell::Empty);
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != LEVEL_GRID {
                return Err(LevelError::RowWidth {
                    row: y,
                    expected: LEVEL_GRID,
                    actual: width,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = ch
                    .to_digit(10)
                    .and_then(|d| LevelCell::from_code(d as u8))
                    .ok_or(LevelError::BadCell { row: y, col: x, ch })?;
                cells.set(x as i32, y as i32, cell);
            }
        }
        if !cells.contains(start.0, start.1) {
            return Err(LevelError::StartOutOfRange {
                x: start.0,
                y: start.1,
            });
        }
        Ok(Self { cells, start })
    }

    /// Deterministic rocky level: scattered rock cells above solid ground,
    /// a clear start near the top, one goal on the ground and two depots.
    pub fn generated(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut cells = Grid::new(LEVEL_GRID, LEVEL_GRID, LevelCell::Empty);
        for y in 0..LEVEL_GRID as i32 {
            for x in 0..LEVEL_GRID as i32 {
                if y as usize >= GROUND_ROW || rng.next_range(100) < 22 {
                    cells.set(x, y, LevelCell::Rock);
                }
            }
        }

        let last = LEVEL_GRID as i32 - 5;
        let start = (rng.range_inclusive(4, last), 3);
        for dy in -2..=2 {
            for dx in -2..=2 {
                cells.set(start.0 + dx, start.1 + dy, LevelCell::Empty);
            }
        }

        let goal_x = rng.range_inclusive(4, last);
        let goal_y = GROUND_ROW as i32 - 1;
        for dy in -2..=0 {
            for dx in -1..=1 {
                cells.set(goal_x + dx, goal_y + dy, LevelCell::Empty);
            }
        }
        cells.set(goal_x, goal_y, LevelCell::Goal);

        let mut depots = 0;
        while depots < 2 {
            let x = rng.range_inclusive(2, LEVEL_GRID as i32 - 3);
            let y = rng.range_inclusive(8, GROUND_ROW as i32 - 2);
            if cells.get(x, y) == Some(LevelCell::Empty) {
                cells.set(x, y, LevelCell::Depot);
                depots += 1;
            }
        }

        Self { cells, start }
    }

    pub fn cell(&self, x: i32, y: i32) -> LevelCell {
        self.cells.get(x, y).unwrap_or_default()
    }

    /// Start position in level cells.
    pub fn start(&self) -> (i32, i32) {
        self.start
    }

    pub fn count(&self, kind: LevelCell) -> usize {
        self.cells.as_slice().iter().filter(|&&c| c == kind).count()
    }
}

/// Where things ended up after a level was built, in world coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelLayout {
    pub level: u32,
    pub start: (f32, f32),
    pub goals: Vec<(i32, i32)>,
    pub depots: Vec<(i32, i32)>,
}

/// World-space centre of a level cell.
pub fn cell_center(x: i32, y: i32) -> (i32, i32) {
    let half = LEVEL_CELL as i32 / 2;
    (x * LEVEL_CELL as i32 + half, y * LEVEL_CELL as i32 + half)
}

/// Carve empty space around `(cx, cy)` with a 3×3 pattern of subtractive stamps.
pub fn carve(terrain: &mut Terrain, atlas: &Atlas, cx: i32, cy: i32) {
    for oy in [-8, 0, 8] {
        for ox in [-8, 0, 8] {
            terrain.stamp(atlas, CARVE_BRUSH, cx + ox, cy + oy, 0, 0);
        }
    }
}

/// Rebuild `terrain` for `desc` and return the resulting layout.
pub fn build_level(desc: &LevelDesc, level: u32, atlas: &Atlas, terrain: &mut Terrain, rng: &mut SimpleRng) -> LevelLayout {
    terrain.clear();
    let mut layout = LevelLayout {
        level,
        ..LevelLayout::default()
    };
    let block = LEVEL_CELL as u32;
    let mut stamps = 0usize;

    for y in 0..LEVEL_GRID as i32 {
        for x in 0..LEVEL_GRID as i32 {
            match desc.cell(x, y) {
                LevelCell::Rock => {
                    for _ in 0..ROCK_STAMPS_PER_CELL {
                        let rock = ROCKS[rng.next_range(ROCKS.len() as u32) as usize];
                        let px = x * block as i32 + rng.next_range(block) as i32;
                        let py = y * block as i32 + rng.next_range(block) as i32;
                        terrain.stamp(atlas, rock, px, py, ROCK_BASE_HEIGHT, 100);
                        stamps += 1;
                    }
                }
                LevelCell::Goal => layout.goals.push(cell_center(x, y)),
                LevelCell::Depot => layout.depots.push(cell_center(x, y)),
                LevelCell::Empty => {}
            }
        }
    }

    let (sx, sy) = cell_center(desc.start.0, desc.start.1);
    carve(terrain, atlas, sx, sy);
    for &(gx, gy) in &layout.goals {
        carve(terrain, atlas, gx, gy - LEVEL_CELL as i32 / 2);
    }
    layout.start = (sx as f32, sy as f32);

    terrain.speckle(level);
    debug!(
        level,
        stamps,
        goals = layout.goals.len(),
        depots = layout.depots.len(),
        "level built"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_rows() -> Vec<String> {
        vec!["0".repeat(LEVEL_GRID); LEVEL_GRID]
    }

    fn refs(rows: &[String]) -> Vec<&str> {
        rows.iter().map(String::as_str).collect()
    }

    #[test]
    fn parses_json_levels() {
        let mut rows = empty_rows();
        rows[10].replace_range(5..6, "2");
        rows[20].replace_range(0..3, "113");
        let json = serde_json::json!({ "start": [1, 2], "rows": rows }).to_string();
        let desc = LevelDesc::from_json(&json).unwrap();
        assert_eq!(desc.start(), (1, 2));
        assert_eq!(desc.cell(5, 10), LevelCell::Goal);
        assert_eq!(desc.cell(2, 20), LevelCell::Depot);
        assert_eq!(desc.count(LevelCell::Rock), 2);
    }

    #[test]
    fn rejects_short_levels() {
        let rows = vec!["0".repeat(LEVEL_GRID); 3];
        let err = LevelDesc::from_rows(&refs(&rows), (0, 0)).unwrap_err();
        assert!(matches!(err, LevelError::RowCount { actual: 3, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut rows = empty_rows();
        rows[7].push('0');
        let err = LevelDesc::from_rows(&refs(&rows), (0, 0)).unwrap_err();
        assert!(matches!(err, LevelError::RowWidth { row: 7, actual: 65, .. }));
    }

    #[test]
    fn rejects_unknown_cells() {
        let mut rows = empty_rows();
        rows[1].replace_range(4..5, "x");
        let err = LevelDesc::from_rows(&refs(&rows), (0, 0)).unwrap_err();
        assert!(matches!(err, LevelError::BadCell { row: 1, col: 4, ch: 'x' }));
    }

    #[test]
    fn rejects_start_outside_grid() {
        let rows = empty_rows();
        let err = LevelDesc::from_rows(&refs(&rows), (64, 0)).unwrap_err();
        assert!(matches!(err, LevelError::StartOutOfRange { x: 64, y: 0 }));
    }

    #[test]
    fn generated_levels_are_deterministic() {
        assert_eq!(LevelDesc::generated(5), LevelDesc::generated(5));
        assert_ne!(LevelDesc::generated(5), LevelDesc::generated(6));
    }

    #[test]
    fn generated_levels_have_goal_depots_and_clear_start() {
        let desc = LevelDesc::generated(11);
        assert_eq!(desc.count(LevelCell::Goal), 1);
        assert_eq!(desc.count(LevelCell::Depot), 2);
        let (sx, sy) = desc.start();
        assert_eq!(desc.cell(sx, sy), LevelCell::Empty);
        assert_eq!(desc.cell(sx, GROUND_ROW as i32), LevelCell::Rock);
    }
}
