use alloc::vec::Vec;

use crate::*;

/// Opens the clear zone around a blank cell.
///
/// The fill spreads only through cells with no neighboring mines. Their non-blank neighbors are
/// uncovered as the border of the zone but never expanded, and mined cells are never touched.
/// Work is kept on an explicit stack so the depth is bounded by the board, not the call stack.
#[derive(Clone, Debug, Default)]
pub struct RevealEngine {
    stack: Vec<Coord2>,
}

impl RevealEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flood fills from `start`, returning how many cells were uncovered.
    ///
    /// Does nothing when `start` is mined or has mined neighbors. `start` itself is left for
    /// the caller to uncover.
    pub fn flood_fill(&mut self, board: &mut Board, start: Coord2) -> Result<CellCount> {
        let cell = board.get(start)?;
        if cell.is_mined() || !cell.is_blank() {
            return Ok(0);
        }

        let mut uncovered: CellCount = 0;
        self.stack.clear();
        self.stack.push(start);

        while let Some(coords) = self.stack.pop() {
            for neighbor in board.neighbors(coords)? {
                let cell = board.get(neighbor)?;
                if !cell.is_covered() || cell.is_mined() {
                    continue;
                }

                let blank = cell.is_blank();
                board.uncover(neighbor)?;
                uncovered += 1;

                if blank {
                    self.stack.push(neighbor);
                }
            }
        }

        log::trace!("Flood fill from {:?} uncovered {} cells", start, uncovered);
        Ok(uncovered)
    }
}
