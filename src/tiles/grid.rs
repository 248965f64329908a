//! Tile grid planning
//!
//! [`TileGrid`] walks outward from the tile under the map center and yields
//! every tile needed to cover a canvas, together with its pixel placement.
//! The walk is lazy and has no side effects so the traversal can be checked
//! on its own, away from fetching and deduplication.
//!
//! Order: the anchor tile, then columns to the right starting with the
//! anchor column, then columns to the left starting again with the anchor
//! column. Inside each column the walk goes down from the anchor row and
//! then up from the anchor row. The anchor row and column are therefore
//! yielded more than once; every repeat carries the same placement.

use crate::core::{
    constants::{HALF_TILE, TILE_SIZE},
    geo::TilePoint,
};

/// One tile of the walk and the pixel position of its top-left corner
/// relative to the canvas origin. Placements may lie partly or fully
/// outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridTile {
    pub x: i64,
    pub y: i64,
    pub left: i64,
    pub top: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    column: Direction,
    x: i64,
    left: i64,
    row: Direction,
    y: i64,
    top: i64,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Anchor,
    Walk(Cursor),
    Done,
}

/// Lazy iterator over the tiles covering a `width × height` canvas centered
/// on `anchor`.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i64,
    height: i64,
    anchor_x: i64,
    anchor_y: i64,
    left0: i64,
    top0: i64,
    stage: Stage,
}

/// `Math.round` semantics: halves go towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl TileGrid {
    pub fn new(anchor: TilePoint, width: i64, height: i64) -> Self {
        let (anchor_x, anchor_y) = anchor.tile();
        let (fx, fy) = anchor.fract();
        let size = TILE_SIZE as f64;
        let (offset_x, offset_y) = (fx * size, fy * size);

        let left0 = round_half_up(width as f64 / 2.0 - HALF_TILE) + round_half_up(HALF_TILE - offset_x);
        let top0 = round_half_up(height as f64 / 2.0 - HALF_TILE) + round_half_up(HALF_TILE - offset_y);

        Self {
            width,
            height,
            anchor_x,
            anchor_y,
            left0,
            top0,
            stage: Stage::Anchor,
        }
    }

    /// Placement of the anchor tile.
    pub fn anchor(&self) -> GridTile {
        GridTile {
            x: self.anchor_x,
            y: self.anchor_y,
            left: self.left0,
            top: self.top0,
        }
    }

    fn column_start(&self, column: Direction) -> Cursor {
        Cursor {
            column,
            x: self.anchor_x,
            left: self.left0,
            row: Direction::Forward,
            y: self.anchor_y,
            top: self.top0,
        }
    }

    fn column_open(&self, cursor: &Cursor) -> bool {
        match cursor.column {
            Direction::Forward => cursor.left < self.width,
            Direction::Backward => cursor.left > -TILE_SIZE,
        }
    }

    fn row_open(&self, cursor: &Cursor) -> bool {
        match cursor.row {
            Direction::Forward => cursor.top < self.height,
            Direction::Backward => cursor.top > -TILE_SIZE,
        }
    }
}

impl Iterator for TileGrid {
    type Item = GridTile;

    fn next(&mut self) -> Option<GridTile> {
        loop {
            let mut cursor = match self.stage {
                Stage::Anchor => {
                    self.stage = Stage::Walk(self.column_start(Direction::Forward));
                    return Some(self.anchor());
                }
                Stage::Walk(cursor) => cursor,
                Stage::Done => return None,
            };

            if !self.column_open(&cursor) {
                self.stage = match cursor.column {
                    Direction::Forward => Stage::Walk(self.column_start(Direction::Backward)),
                    Direction::Backward => Stage::Done,
                };
                continue;
            }

            if !self.row_open(&cursor) {
                match cursor.row {
                    Direction::Forward => cursor.row = Direction::Backward,
                    Direction::Backward => {
                        cursor.row = Direction::Forward;
                        cursor.x = cursor.x.wrapping_add(cursor.column.step());
                        cursor.left += cursor.column.step() * TILE_SIZE;
                    }
                }
                cursor.y = self.anchor_y;
                cursor.top = self.top0;
                self.stage = Stage::Walk(cursor);
                continue;
            }

            let tile = GridTile {
                x: cursor.x,
                y: cursor.y,
                left: cursor.left,
                top: cursor.top,
            };
            cursor.y = cursor.y.wrapping_add(cursor.row.step());
            cursor.top += cursor.row.step() * TILE_SIZE;
            self.stage = Stage::Walk(cursor);
            return Some(tile);
        }
    }
}
