#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use placement::*;
pub use reveal::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod placement;
mod reveal;
mod session;
mod types;

/// Board dimensions and mine count of a game.
///
/// Always holds at least one cell and leaves at least one safe cell, both when built with
/// [`GameConfig::new`] and when deserialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    height: Coord,
    width: Coord,
    mines: CellCount,
    placement: PlacementStrategy,
}

impl GameConfig {
    const fn new_unchecked(height: Coord, width: Coord, mines: CellCount) -> Self {
        Self {
            height,
            width,
            mines,
            placement: PlacementStrategy::RejectionSampling,
        }
    }

    pub fn new(height: Coord, width: Coord, mines: CellCount) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }

        let cells = mult(height, width);
        if mines >= cells {
            return Err(ConfigIssue::TooManyMines { mines, cells }.into());
        }

        Ok(Self::new_unchecked(height, width, mines))
    }

    /// 9x9 with 10 mines.
    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    /// 16x16 with 40 mines.
    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    /// 16 rows by 30 columns with 99 mines.
    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    pub const fn with_placement(self, placement: PlacementStrategy) -> Self {
        Self { placement, ..self }
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    /// `(height, width)`
    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn placement(&self) -> PlacementStrategy {
        self.placement
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

#[derive(Deserialize)]
struct RawGameConfig {
    height: Coord,
    width: Coord,
    mines: CellCount,
    #[serde(default)]
    placement: PlacementStrategy,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Ok(Self::new(raw.height, raw.width, raw.mines)?.with_placement(raw.placement))
    }
}
