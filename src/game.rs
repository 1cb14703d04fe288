//! Game engine: setup, the flood-capture move, turn order and termination.
//!
//! [`GameCore`] is the single owner of the board and the players. Callers get
//! shared references for observation and mutate the game only through
//! [`GameCore::change_color`] (or [`GameCore::play_turn`], which asks the
//! current player's strategy for the color first).
//!
//! A move repaints the mover's whole territory with the chosen color and
//! annexes every unowned cell of that color reachable from it through
//! orthogonal steps over unowned cells of the same color.

use std::collections::{BTreeSet, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::board::{Board, ColorCell, ColorIndex, PlayerIndex};
use crate::constants::*;
use crate::coord::Coord;
use crate::player::{AiStrategy, ColorStrategy, HumanStrategy, Player};

/// Errors reported by the engine.
///
/// Configuration errors are returned from construction. `GameOver`,
/// `ColorOutOfRange` and `InvalidPlayerIndex` indicate a host calling the
/// engine out of protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("{0} players requested, at most {} are supported", MAX_PLAYERS)]
    TooManyPlayers(usize),
    #[error("invalid board size {height}x{width}")]
    InvalidBoardSize { height: usize, width: usize },
    #[error("invalid colors count {0}, expected 1..={}", MAX_ASCII_COLORS)]
    InvalidColorsCount(usize),
    #[error("{humans} human players requested for a {players} player game")]
    TooManyHumans { humans: usize, players: usize },
    #[error("start player index {index} out of range for {players} players")]
    InvalidStartPlayer { index: usize, players: usize },
    #[error("board cell {coord} has color {color}, outside the {colors_count} color palette")]
    BoardMismatch {
        coord: Coord,
        color: ColorIndex,
        colors_count: usize,
    },
    #[error("the game is over")]
    GameOver,
    #[error("color {color} outside the {colors_count} color palette")]
    ColorOutOfRange { color: ColorIndex, colors_count: usize },
    #[error("player index {0} out of range")]
    InvalidPlayerIndex(PlayerIndex),
}

/// Game configuration, fixed for the lifetime of a [`GameCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub board_width: usize,
    pub board_height: usize,
    pub colors_count: usize,
    pub players_count: usize,
    pub human_players_count: usize,
    pub ai_strength: u32,
    /// Move limit checked against player 0. `None` means unlimited.
    pub max_moves: Option<u32>,
    /// Board generation seed. `None` derives one from the clock.
    pub seed: Option<u64>,
    pub start_player_index: PlayerIndex,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            colors_count: DEFAULT_COLORS_COUNT,
            players_count: DEFAULT_PLAYERS_COUNT,
            human_players_count: DEFAULT_HUMAN_PLAYERS_COUNT,
            ai_strength: DEFAULT_AI_STRENGTH,
            max_moves: None,
            seed: None,
            start_player_index: 0,
        }
    }
}

impl Options {
    /// Check the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.players_count == 0 {
            return Err(GameError::NoPlayers);
        }
        if self.players_count > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers(self.players_count));
        }
        if self.board_height == 0 || self.board_width == 0 {
            return Err(GameError::InvalidBoardSize {
                height: self.board_height,
                width: self.board_width,
            });
        }
        if self.colors_count == 0 || self.colors_count > MAX_ASCII_COLORS {
            return Err(GameError::InvalidColorsCount(self.colors_count));
        }
        if self.human_players_count > self.players_count {
            return Err(GameError::TooManyHumans {
                humans: self.human_players_count,
                players: self.players_count,
            });
        }
        if self.start_player_index >= self.players_count {
            return Err(GameError::InvalidStartPlayer {
                index: self.start_player_index,
                players: self.players_count,
            });
        }
        Ok(())
    }
}

/// Starting corner for a player: top-left, bottom-right, top-right, bottom-left.
pub fn start_coord(index: PlayerIndex, height: usize, width: usize) -> Coord {
    let (last_row, last_col) = (height as i32 - 1, width as i32 - 1);
    match index {
        0 => Coord::new(0, 0),
        1 => Coord::new(last_row, last_col),
        2 => Coord::new(0, last_col),
        3 => Coord::new(last_row, 0),
        _ => panic!("no starting corner for player {index}"),
    }
}

/// Cells a territory would annex by switching to `color`.
///
/// Expands from `owned` through orthogonal neighbors that are on the board,
/// unowned and of `color`, until no new cell is added. The owned cells
/// themselves are not part of the result.
pub fn affected_coords(board: &Board, owned: &BTreeSet<Coord>, color: ColorIndex) -> Vec<Coord> {
    let mut result: Vec<Coord> = owned.iter().copied().collect();
    let mut seen: HashSet<Coord> = owned.iter().copied().collect();
    let seeds = result.len();

    let mut i = 0;
    while i < result.len() {
        for n in result[i].orthogonal() {
            if seen.contains(&n) {
                continue;
            }
            let Some(cell) = board.get(n) else {
                continue;
            };
            if cell.color() != color || cell.is_owned() {
                continue;
            }
            seen.insert(n);
            result.push(n);
        }
        i += 1;
    }

    result.split_off(seeds)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// The authoritative game state.
pub struct GameCore {
    options: Options,
    seed: u64,
    board: Board,
    players: Vec<Player>,
    current: PlayerIndex,
    winner: Option<PlayerIndex>,
}

impl GameCore {
    /// Build a game with a board generated from `options.seed` (or the clock).
    pub fn new(options: Options) -> Result<Self, GameError> {
        let seed = options.seed.unwrap_or_else(clock_seed);
        Self::with_rng(options, fastrand::Rng::with_seed(seed))
    }

    /// Build a game with a board generated from `rng`.
    pub fn with_rng(mut options: Options, mut rng: fastrand::Rng) -> Result<Self, GameError> {
        options.validate()?;
        let seed = rng.get_seed();
        options.seed = Some(seed);
        let board = Board::random(
            options.board_height,
            options.board_width,
            options.colors_count,
            &mut rng,
        );
        Ok(Self::setup(options, seed, board))
    }

    /// Build a game over a prepared board. Board dimensions override the ones
    /// in `options`.
    pub fn from_board(mut options: Options, board: Board) -> Result<Self, GameError> {
        options.board_height = board.height();
        options.board_width = board.width();
        options.validate()?;
        if let Some(coord) = board.coords().find(|&c| board.cell(c).color() >= options.colors_count) {
            return Err(GameError::BoardMismatch {
                coord,
                color: board.cell(coord).color(),
                colors_count: options.colors_count,
            });
        }
        let seed = options.seed.unwrap_or_default();
        Ok(Self::setup(options, seed, board))
    }

    fn setup(options: Options, seed: u64, board: Board) -> Self {
        let mut game = Self {
            current: options.start_player_index,
            players: Vec::with_capacity(options.players_count),
            winner: None,
            seed,
            board,
            options,
        };

        for index in 0..game.options.players_count {
            let strategy: Box<dyn ColorStrategy> =
                if index == 0 || index < game.options.human_players_count {
                    Box::new(HumanStrategy)
                } else {
                    Box::new(AiStrategy::new(game.options.ai_strength))
                };
            game.players.push(Player::new(index, strategy));
            game.claim_start(index);
        }

        game.current = game.options.start_player_index;
        game.check_status();

        tracing::info!(
            seed,
            height = game.board.height(),
            width = game.board.width(),
            colors = game.options.colors_count,
            players = game.options.players_count,
            "game initialized"
        );
        game
    }

    /// Give player `index` its corner and flood from it with the corner's color.
    /// Setup captures do not count as moves.
    fn claim_start(&mut self, index: PlayerIndex) {
        let start = start_coord(index, self.board.height(), self.board.width());
        let cell = *self.board.cell(start);
        if let Some(owner) = cell.owner() {
            tracing::debug!(player = index, owner, %start, "starting corner already owned");
            return;
        }
        self.players[index].add_owned(start);
        let captured = self.capture(index, cell.color());
        self.players[index].reset_moves();
        tracing::debug!(player = index, %start, captured = captured.len(), "player placed");
    }

    /// Flood from `index`'s territory with `color`, repaint the territory and
    /// count the move. Returns the newly annexed cells.
    fn capture(&mut self, index: PlayerIndex, color: ColorIndex) -> Vec<Coord> {
        let captured = affected_coords(&self.board, self.players[index].owned(), color);
        let player = &mut self.players[index];
        for &c in &captured {
            player.add_owned(c);
        }
        for &c in player.owned() {
            self.board.cell_mut(c).claim(color, index);
        }
        player.set_current_color(color);
        player.increment_moves();
        captured
    }

    /// Play `color` for the current player.
    ///
    /// Choosing the color the player already wears is a no-op: nothing changes
    /// and the turn does not pass. Otherwise the move is counted even if it
    /// captures nothing, termination is evaluated and, if the game goes on,
    /// the turn passes to the next player.
    pub fn change_color(&mut self, color: ColorIndex) -> Result<Vec<Coord>, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if color >= self.options.colors_count {
            return Err(GameError::ColorOutOfRange {
                color,
                colors_count: self.options.colors_count,
            });
        }
        let index = self.current;
        if self.players[index].current_color() == Some(color) {
            return Ok(Vec::new());
        }

        let captured = self.capture(index, color);
        tracing::debug!(
            player = index,
            color,
            captured = captured.len(),
            owned = self.players[index].owned_count(),
            moves = self.players[index].moves_count(),
            "color changed"
        );

        self.check_status();
        if !self.is_game_over() {
            self.advance_turn();
        }
        Ok(captured)
    }

    /// Ask the current player's strategy for a color and play it.
    ///
    /// Returns `Ok(None)` when the strategy has no color to offer, which for
    /// human seats means the host has to call [`GameCore::change_color`].
    pub fn play_turn(&mut self) -> Result<Option<Vec<Coord>>, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        match self
            .current_player()
            .choose_color(&self.board, self.options.colors_count)
        {
            Some(color) => self.change_color(color).map(Some),
            None => Ok(None),
        }
    }

    fn check_status(&mut self) {
        let mut total = 0;
        let mut best = 0;
        let mut best_count = 0;
        for (i, p) in self.players.iter().enumerate() {
            let count = p.owned_count();
            total += count;
            if count > best_count {
                best = i;
                best_count = count;
            }
        }

        let board_full = total == self.board.len();
        let out_of_moves = self
            .options
            .max_moves
            .is_some_and(|limit| self.players[0].moves_count() >= limit);

        self.winner = (board_full || out_of_moves).then_some(best);
        if let Some(winner) = self.winner {
            tracing::info!(winner, owned = best_count, board_full, "game over");
        }
    }

    fn advance_turn(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    /// Replace the strategy of player `index`, e.g. to attach an input
    /// provider or let the AI drive player 0.
    pub fn set_strategy(
        &mut self,
        index: PlayerIndex,
        strategy: Box<dyn ColorStrategy>,
    ) -> Result<(), GameError> {
        self.players
            .get_mut(index)
            .ok_or(GameError::InvalidPlayerIndex(index))?
            .set_strategy(strategy);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The cell at `c`. Panics if `c` is off the board.
    pub fn cell_at(&self, c: Coord) -> &ColorCell {
        self.board.cell(c)
    }

    pub fn is_valid_coord(&self, c: Coord) -> bool {
        self.board.is_valid(c)
    }

    pub fn current_player_index(&self) -> PlayerIndex {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn player(&self, index: PlayerIndex) -> Result<&Player, GameError> {
        self.players
            .get(index)
            .ok_or(GameError::InvalidPlayerIndex(index))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn players_count(&self) -> usize {
        self.options.players_count
    }

    pub fn human_players_count(&self) -> usize {
        self.options.human_players_count
    }

    pub fn ai_strength(&self) -> u32 {
        self.options.ai_strength
    }

    pub fn max_moves(&self) -> Option<u32> {
        self.options.max_moves
    }

    pub fn colors_count(&self) -> usize {
        self.options.colors_count
    }

    /// Seed the board was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Owned cell counts in player order.
    pub fn scores(&self) -> Vec<usize> {
        self.players.iter().map(Player::owned_count).collect()
    }

    /// Colors the current player may switch to.
    pub fn available_colors(&self) -> Vec<ColorIndex> {
        let current = self.current_player().current_color();
        (0..self.options.colors_count)
            .filter(|&c| Some(c) != current)
            .collect()
    }

    /// Cells `owned` would annex with `color` on the current board.
    pub fn affected_coords(&self, owned: &BTreeSet<Coord>, color: ColorIndex) -> Vec<Coord> {
        affected_coords(&self.board, owned, color)
    }

    /// Color indices as text, one character per cell.
    pub fn ascii(&self) -> String {
        self.board.ascii()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(players: usize) -> Options {
        Options {
            players_count: players,
            human_players_count: 1,
            colors_count: 4,
            ..Options::default()
        }
    }

    #[test]
    fn test_validate_defaults() {
        assert_eq!(Options::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_errors() {
        assert_eq!(options(0).validate(), Err(GameError::NoPlayers));
        assert_eq!(options(5).validate(), Err(GameError::TooManyPlayers(5)));

        let o = Options { board_width: 0, ..options(2) };
        assert!(matches!(o.validate(), Err(GameError::InvalidBoardSize { .. })));

        let o = Options { colors_count: 0, ..options(2) };
        assert_eq!(o.validate(), Err(GameError::InvalidColorsCount(0)));

        let o = Options { human_players_count: 3, ..options(2) };
        assert!(matches!(o.validate(), Err(GameError::TooManyHumans { .. })));

        let o = Options { start_player_index: 2, ..options(2) };
        assert!(matches!(o.validate(), Err(GameError::InvalidStartPlayer { .. })));
    }

    #[test]
    fn test_new_rejects_bad_options() {
        assert!(GameCore::new(options(5)).is_err());
    }

    #[test]
    fn test_start_coords() {
        assert_eq!(start_coord(0, 5, 7), Coord::new(0, 0));
        assert_eq!(start_coord(1, 5, 7), Coord::new(4, 6));
        assert_eq!(start_coord(2, 5, 7), Coord::new(0, 6));
        assert_eq!(start_coord(3, 5, 7), Coord::new(4, 0));
    }

    #[test]
    fn test_affected_coords_transitive() {
        // A snake of 1s reachable only through other 1s.
        let board = Board::from_rows(&[
            [0usize, 1, 1, 1],
            [2, 2, 2, 1],
            [1, 1, 1, 1],
        ])
        .unwrap();
        let owned = BTreeSet::from([Coord::new(0, 0)]);
        let captured = affected_coords(&board, &owned, 1);
        assert_eq!(captured.len(), 8);
        assert!(!captured.contains(&Coord::new(0, 0)));
        assert!(captured.contains(&Coord::new(2, 0)));
    }

    #[test]
    fn test_affected_coords_skips_owned() {
        let mut board = Board::from_rows(&[[0usize, 1, 1]]).unwrap();
        board.cell_mut(Coord::new(0, 2)).claim(1, 1);
        let owned = BTreeSet::from([Coord::new(0, 0)]);
        assert_eq!(affected_coords(&board, &owned, 1), vec![Coord::new(0, 1)]);
    }

    #[test]
    fn test_setup_claims_corners() {
        let board = Board::from_rows(&[
            [0usize, 0, 1],
            [2, 3, 1],
            [2, 3, 3],
        ])
        .unwrap();
        let game = GameCore::from_board(options(2), board).unwrap();
        let p0 = game.player(0).unwrap();
        let p1 = game.player(1).unwrap();
        assert_eq!(p0.owned_count(), 2);
        assert_eq!(p0.current_color(), Some(0));
        assert_eq!(p0.moves_count(), 0);
        // (2,2) floods to (2,1) and (1,1), all 3s.
        assert_eq!(p1.owned_count(), 3);
        assert_eq!(p1.current_color(), Some(3));
        assert_eq!(p1.moves_count(), 0);
        assert_eq!(game.cell_at(Coord::new(1, 1)).owner(), Some(1));
        assert_eq!(game.current_player_index(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_setup_strategies() {
        let o = Options {
            players_count: 4,
            human_players_count: 2,
            ai_strength: 3,
            seed: Some(5),
            ..Options::default()
        };
        let game = GameCore::new(o).unwrap();
        let ai: Vec<bool> = game.players().iter().map(Player::is_ai).collect();
        assert_eq!(ai, vec![false, false, true, true]);
        assert_eq!(game.player(3).unwrap().ai_strength(), Some(3));

        let o = Options {
            human_players_count: 0,
            ..Options::default()
        };
        let game = GameCore::new(o).unwrap();
        assert!(!game.player(0).unwrap().is_ai());
        assert!(game.player(1).unwrap().is_ai());
    }

    #[test]
    fn test_change_color_rejects_out_of_palette() {
        let board = Board::from_rows(&[[0usize, 1], [1, 2]]).unwrap();
        let mut game = GameCore::from_board(options(2), board).unwrap();
        assert_eq!(
            game.change_color(4),
            Err(GameError::ColorOutOfRange {
                color: 4,
                colors_count: 4
            })
        );
    }

    #[test]
    fn test_from_board_rejects_colors_outside_palette() {
        let board = Board::from_rows(&[[0usize, 7]]).unwrap();
        assert!(matches!(
            GameCore::from_board(options(2), board),
            Err(GameError::BoardMismatch { color: 7, .. })
        ));
    }

    #[test]
    fn test_set_strategy_invalid_index() {
        let mut game = GameCore::new(Options {
            seed: Some(1),
            ..Options::default()
        })
        .unwrap();
        assert_eq!(
            game.set_strategy(9, Box::new(HumanStrategy)).err(),
            Some(GameError::InvalidPlayerIndex(9))
        );
        assert!(game.player(9).is_err());
    }
}
