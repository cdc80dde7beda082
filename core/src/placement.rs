use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Sampling algorithm used by [`Board::place_mines`].
///
/// Both strategies pick uniformly among the eligible cells and never pick the same cell twice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Draw random `(row, col)` pairs and retry whenever the cell is taken or ineligible.
    #[default]
    RejectionSampling,
    /// Shuffle every eligible cell and keep a prefix, bounded work regardless of density.
    Shuffle,
}

impl PlacementStrategy {
    /// Picks `mines` distinct positions among the cells marked `true` in `eligible`.
    ///
    /// When fewer eligible cells exist than requested, every eligible cell is returned instead.
    pub fn choose<R: Rng + ?Sized>(
        self,
        eligible: &Array2<bool>,
        mines: CellCount,
        rng: &mut R,
    ) -> Vec<Coord2> {
        let free_cells = eligible.iter().filter(|&&is_free| is_free).count();
        let mut mines = usize::from(mines);
        if mines > free_cells {
            log::warn!(
                "Not enough free cells for mines, requested {} but only {} are eligible",
                mines,
                free_cells
            );
            mines = free_cells;
        }

        match self {
            Self::RejectionSampling => sample_rejecting(eligible, mines, rng),
            Self::Shuffle => sample_shuffled(eligible, mines, rng),
        }
    }
}

fn sample_rejecting<R: Rng + ?Sized>(
    eligible: &Array2<bool>,
    mines: usize,
    rng: &mut R,
) -> Vec<Coord2> {
    let (height, width) = eligible.dim();
    let mut free = eligible.clone();
    let mut chosen = Vec::with_capacity(mines);
    let mut rejected: usize = 0;

    while chosen.len() < mines {
        let row = rng.random_range(0..height);
        let col = rng.random_range(0..width);
        let slot = &mut free[[row, col]];
        if *slot {
            *slot = false;
            chosen.push((row as Coord, col as Coord));
        } else {
            rejected += 1;
        }
    }

    log::debug!(
        "Rejection sampling placed {} mines after {} rejected draws",
        chosen.len(),
        rejected
    );
    chosen
}

fn sample_shuffled<R: Rng + ?Sized>(
    eligible: &Array2<bool>,
    mines: usize,
    rng: &mut R,
) -> Vec<Coord2> {
    let mut candidates: Vec<Coord2> = eligible
        .indexed_iter()
        .filter(|&(_, &is_free)| is_free)
        .map(|((row, col), _)| (row as Coord, col as Coord))
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(mines);
    log::debug!("Shuffle placement picked {} mines", candidates.len());
    candidates
}
