use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// Complete game state of a single grid position.
///
/// A cell only stores flags, it never looks at its neighbors. The owning
/// [`Board`](crate::Board) computes the neighbor-mine count after mines are placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    covered: bool,
    mined: bool,
    clicked: bool,
    neighbor_mines: u8,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self {
            row,
            col,
            covered: true,
            mined: false,
            clicked: false,
            neighbor_mines: 0,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_covered(&self) -> bool {
        self.covered
    }

    pub const fn is_mined(&self) -> bool {
        self.mined
    }

    /// Whether the player targeted this cell directly, as opposed to it being
    /// opened by a flood fill.
    pub const fn has_been_clicked(&self) -> bool {
        self.clicked
    }

    pub const fn neighbor_mine_count(&self) -> u8 {
        self.neighbor_mines
    }

    pub const fn is_blank(&self) -> bool {
        self.neighbor_mines == 0
    }

    pub fn reveal(&mut self) {
        self.covered = false;
    }

    pub fn mark_mined(&mut self) {
        self.mined = true;
    }

    pub fn mark_clicked(&mut self) {
        self.clicked = true;
    }

    pub(crate) fn set_neighbor_mine_count(&mut self, count: u8) {
        debug_assert!(count <= 8);
        self.neighbor_mines = count;
    }
}
