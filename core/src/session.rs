use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Playing, through [`GameSession::reset`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Playing,
    Lost,
    Won,
}

impl GameState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves are accepted until a reset.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Outcome of a single [`GameSession::play_cell`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl PlayOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use PlayOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// One game from the first click to a win or a loss, and any number of restarts.
///
/// Mines are placed when the first cell is played, so that cell is always safe. The session owns
/// its random generator, seeding it explicitly makes every game reproducible.
#[derive(Clone, Debug)]
pub struct GameSession<R = SmallRng> {
    board: Board,
    rng: R,
    reveal: RevealEngine,
    first_click_pending: bool,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl GameSession<SmallRng> {
    /// Starts a session with a generator seeded by the operating system.
    #[cfg(feature = "std")]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            board: Board::new(config),
            rng,
            reveal: RevealEngine::new(),
            first_click_pending: true,
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    /// Plays the cell at `coords`, as if the player clicked it.
    ///
    /// Clicking an already clicked cell, or playing after the game ended, changes nothing.
    pub fn play_cell(&mut self, coords: Coord2) -> Result<PlayOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_terminal() {
            log::debug!("Ignoring {:?}, game already ended as {:?}", coords, self.state);
            return Ok(PlayOutcome::NoChange);
        }

        if !self.board.register_click(coords)? {
            return Ok(PlayOutcome::NoChange);
        }
        log::debug!("Step {} at {:?}", self.board.step_count(), coords);

        if self.first_click_pending {
            self.board.place_mines(coords, &mut self.rng)?;
            self.first_click_pending = false;
            self.open(coords)
        } else if self.board.get(coords)?.is_mined() {
            self.board.uncover_mines();
            self.triggered_mine = Some(coords);
            self.end_game(GameState::Lost);
            Ok(PlayOutcome::HitMine)
        } else {
            self.open(coords)
        }
    }

    fn open(&mut self, coords: Coord2) -> Result<PlayOutcome> {
        self.board.uncover(coords)?;
        self.reveal.flood_fill(&mut self.board, coords)?;

        if self.board.is_finished() {
            self.end_game(GameState::Won);
            Ok(PlayOutcome::Won)
        } else {
            Ok(PlayOutcome::Revealed)
        }
    }

    fn end_game(&mut self, state: GameState) {
        debug_assert!(state.is_terminal());
        self.state = state;
        log::debug!(
            "Game ended as {:?} after {} steps",
            state,
            self.board.step_count()
        );
    }

    /// Starts over on a fresh board of the same configuration.
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.config());
        self.first_click_pending = true;
        self.state = GameState::Playing;
        self.triggered_mine = None;
        log::debug!("Session reset");
    }
}

impl<R> GameSession<R> {
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn step_count(&self) -> CellCount {
        self.board.step_count()
    }

    pub fn height(&self) -> Coord {
        self.board.height()
    }

    pub fn width(&self) -> Coord {
        self.board.width()
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn is_first_click_pending(&self) -> bool {
        self.first_click_pending
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        self.board.get(coords)
    }

    pub fn is_covered(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(coords)?.is_covered())
    }

    pub fn is_mined(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(coords)?.is_mined())
    }

    pub fn has_been_clicked(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(coords)?.has_been_clicked())
    }

    pub fn neighbor_mine_count(&self, coords: Coord2) -> Result<u8> {
        Ok(self.cell(coords)?.neighbor_mine_count())
    }

    pub fn is_blank(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(coords)?.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(height: Coord, width: Coord, mines: CellCount) -> GameConfig {
        GameConfig::new(height, width, mines).unwrap()
    }

    /// Finds a seed whose first click at `start` puts a mine on `mine`.
    fn session_with_mine_at(
        config: GameConfig,
        start: Coord2,
        mine: Coord2,
    ) -> (GameSession, PlayOutcome) {
        (0..1000)
            .map(|seed| {
                let mut session = GameSession::with_seed(config, seed);
                let outcome = session.play_cell(start).unwrap();
                (session, outcome)
            })
            .find(|(session, _)| session.is_mined(mine).unwrap())
            .unwrap()
    }

    #[test]
    fn single_row_without_mines_is_won_in_one_step() {
        let mut session = GameSession::with_seed(config(1, 2, 0), 0);

        assert_eq!(session.play_cell((0, 0)).unwrap(), PlayOutcome::Won);
        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.step_count(), 1);
        assert!(!session.is_covered((0, 1)).unwrap());
        assert!(!session.has_been_clicked((0, 1)).unwrap());
        assert!(session.board().is_finished());
    }

    #[test]
    fn numbered_first_click_stays_alone() {
        let (session, outcome) = session_with_mine_at(config(3, 3, 1), (1, 1), (0, 0));

        assert_eq!(outcome, PlayOutcome::Revealed);
        assert_eq!(session.neighbor_mine_count((1, 1)).unwrap(), 1);
        assert!(!session.is_covered((1, 1)).unwrap());
        let covered = session.board().iter().filter(|c| c.is_covered()).count();
        assert_eq!(covered, 8);
    }

    #[test]
    fn first_click_is_never_a_mine() {
        for seed in 0..64 {
            let mut session = GameSession::with_seed(config(4, 4, 15), seed);

            assert_eq!(session.play_cell((2, 1)).unwrap(), PlayOutcome::Won);
            assert!(!session.is_mined((2, 1)).unwrap());
            assert!(!session.is_first_click_pending());
        }
    }

    #[test]
    fn hitting_a_mine_uncovers_only_mines() {
        let (mut session, _) = session_with_mine_at(config(3, 3, 1), (1, 1), (0, 0));

        assert_eq!(session.play_cell((0, 0)).unwrap(), PlayOutcome::HitMine);

        assert_eq!(session.state(), GameState::Lost);
        assert_eq!(session.triggered_mine(), Some((0, 0)));
        assert_eq!(session.step_count(), 2);
        assert!(!session.is_covered((0, 0)).unwrap());
        assert!(session.is_covered((2, 2)).unwrap());
    }

    #[test]
    fn duplicate_click_changes_nothing() {
        let (mut session, _) = session_with_mine_at(config(3, 3, 1), (1, 1), (0, 0));
        let before = session.board().clone();

        assert_eq!(session.play_cell((1, 1)).unwrap(), PlayOutcome::NoChange);

        assert_eq!(session.board(), &before);
        assert_eq!(session.step_count(), 1);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn flood_filled_cell_can_still_be_clicked() {
        // . . 1 * 1
        let (mut session, outcome) = session_with_mine_at(config(1, 5, 1), (0, 0), (0, 3));

        assert_eq!(outcome, PlayOutcome::Revealed);
        assert!(session.is_covered((0, 4)).unwrap());
        assert!(!session.is_covered((0, 1)).unwrap());
        assert!(!session.has_been_clicked((0, 1)).unwrap());

        assert_eq!(session.play_cell((0, 1)).unwrap(), PlayOutcome::Revealed);
        assert_eq!(session.step_count(), 2);
        assert!(session.has_been_clicked((0, 1)).unwrap());
    }

    #[test]
    fn terminal_state_ignores_clicks() {
        let (mut session, _) = session_with_mine_at(config(3, 3, 1), (1, 1), (0, 0));
        session.play_cell((0, 0)).unwrap();
        let before = session.board().clone();

        assert_eq!(session.play_cell((2, 2)).unwrap(), PlayOutcome::NoChange);

        assert_eq!(session.board(), &before);
        assert_eq!(session.state(), GameState::Lost);
    }

    #[test]
    fn out_of_bounds_play_is_an_error() {
        let mut session = GameSession::with_seed(config(2, 2, 1), 0);

        assert_eq!(
            session.play_cell((2, 0)),
            Err(GameError::OutOfBounds { row: 2, col: 0 })
        );
        assert!(session.is_first_click_pending());
        assert_eq!(session.step_count(), 0);
        assert!(session.is_mined((0, 5)).is_err());
    }

    #[test]
    fn reset_restores_initial_state() {
        let (mut session, _) = session_with_mine_at(config(3, 3, 1), (1, 1), (0, 0));
        session.play_cell((0, 0)).unwrap();

        session.reset();

        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.step_count(), 0);
        assert_eq!(session.triggered_mine(), None);
        assert!(session.is_first_click_pending());
        assert!(!session.board().mines_placed());
        assert!(
            session
                .board()
                .iter()
                .all(|cell| cell.is_covered() && !cell.is_mined() && !cell.has_been_clicked())
        );
        assert_eq!(session.config(), config(3, 3, 1));
    }

    #[test]
    fn outcome_update_flags() {
        assert!(!PlayOutcome::NoChange.has_update());
        assert!(PlayOutcome::Revealed.has_update());
        assert!(PlayOutcome::HitMine.has_update());
        assert!(PlayOutcome::Won.has_update());
        assert!(GameState::Won.is_terminal());
        assert!(!GameState::Playing.is_terminal());
    }
}
