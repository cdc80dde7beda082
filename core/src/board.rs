use ndarray::Array2;
use rand::Rng;

use crate::*;

/// The grid of cells for one game, together with its step counter.
///
/// Mines are not part of a fresh board: [`Board::place_mines`] adds them once the first cell is
/// known, so every cell starts covered and safe.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    step_count: CellCount,
    mines_placed: bool,
}

impl Board {
    pub fn new(config: GameConfig) -> Self {
        let cells = Array2::from_shape_fn(config.size().to_nd_index(), |(row, col)| {
            Cell::new(row as Coord, col as Coord)
        });
        Self {
            config,
            cells,
            step_count: 0,
            mines_placed: false,
        }
    }

    /// Builds a board with a fixed mine layout instead of a random one.
    ///
    /// Duplicate coordinates count once, and the distinct mines must leave at least one safe cell.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(GameConfig::new(size.0, size.1, 0)?);

        for &coords in mine_coords {
            board.cell_mut(coords)?.mark_mined();
        }

        let mine_count = board.iter().filter(|cell| cell.is_mined()).count() as CellCount;
        board.config = GameConfig::new(size.0, size.1, mine_count)?;
        board.finish_placement();
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn height(&self) -> Coord {
        self.config.height()
    }

    pub fn width(&self) -> Coord {
        self.config.width()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn step_count(&self) -> CellCount {
        self.step_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (height, width) = self.size();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    fn cell_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[coords.to_nd_index()])
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn neighbors(&self, coords: Coord2) -> Result<Neighbors> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords).collect())
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Randomly mines `mine_count` cells, skipping `exclude` and every uncovered cell, then
    /// computes the neighbor-mine counts.
    ///
    /// Placement happens once per board; later calls leave the layout untouched.
    pub fn place_mines<R: Rng + ?Sized>(&mut self, exclude: Coord2, rng: &mut R) -> Result<()> {
        let exclude = self.validate_coords(exclude)?;

        if self.mines_placed {
            log::warn!("Mines already placed, ignoring placement around {:?}", exclude);
            return Ok(());
        }

        let mut eligible = self.cells.map(|cell| cell.is_covered());
        eligible[exclude.to_nd_index()] = false;

        let strategy = self.config.placement();
        for coords in strategy.choose(&eligible, self.mine_count(), rng) {
            self.cells[coords.to_nd_index()].mark_mined();
        }

        self.finish_placement();
        log::debug!(
            "Placed {} mines on a {:?} board with {:?}, excluding {:?}",
            self.mine_count(),
            self.size(),
            strategy,
            exclude
        );
        Ok(())
    }

    fn finish_placement(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.adjacent_mine_count((row as Coord, col as Coord))
        });
        for (cell, &count) in self.cells.iter_mut().zip(counts.iter()) {
            cell.set_neighbor_mine_count(count);
        }
        self.mines_placed = true;
    }

    fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_mined())
            .count() as u8
    }

    /// Uncovers a single cell, returning whether it was covered before.
    pub fn uncover(&mut self, coords: Coord2) -> Result<bool> {
        let cell = self.cell_mut(coords)?;
        let was_covered = cell.is_covered();
        cell.reveal();
        Ok(was_covered)
    }

    /// Records a direct click, returning `false` when the cell had already been clicked.
    pub fn register_click(&mut self, coords: Coord2) -> Result<bool> {
        let cell = self.cell_mut(coords)?;
        if cell.has_been_clicked() {
            return Ok(false);
        }

        cell.mark_clicked();
        self.step_count += 1;
        Ok(true)
    }

    /// Whether every safe cell is uncovered, mined cells may be in any state.
    pub fn is_finished(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_mined() || !cell.is_covered())
    }

    /// Number of safe cells that are still covered.
    pub fn covered_safe_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| !cell.is_mined() && cell.is_covered())
            .count() as CellCount
    }

    pub fn uncover_all(&mut self) {
        self.cells.iter_mut().for_each(Cell::reveal);
    }

    pub fn uncover_mines(&mut self) {
        self.cells
            .iter_mut()
            .filter(|cell| cell.is_mined())
            .for_each(Cell::reveal);
    }
}
