//! Players and their color-choice strategies.
//!
//! A [`Player`] owns a territory and a [`ColorStrategy`]. The strategy is the
//! only thing that differs between a human seat and an AI seat: humans wait for
//! a color supplied by the host, AIs pick one from the board.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

use crate::board::{Board, ColorIndex, PlayerIndex};
use crate::constants::AI_MAX_STRENGTH;
use crate::coord::Coord;
use crate::game::affected_coords;

/// Read-only view handed to a strategy when it is asked for a color.
pub struct ChoiceContext<'a> {
    pub board: &'a Board,
    pub player: &'a Player,
    pub colors_count: usize,
}

impl ChoiceContext<'_> {
    /// Palette colors other than the player's current color.
    pub fn available_colors(&self) -> Vec<ColorIndex> {
        (0..self.colors_count)
            .filter(|&c| Some(c) != self.player.current_color())
            .collect()
    }

    /// Number of cells the player would capture by switching to `color`.
    pub fn gain(&self, color: ColorIndex) -> usize {
        affected_coords(self.board, self.player.owned(), color).len()
    }
}

/// Chooses the next color for a player.
pub trait ColorStrategy {
    /// Pick a color, or `None` if the choice is coming from outside the engine
    /// (or no color other than the current one exists).
    fn choose_color(&self, ctx: &ChoiceContext<'_>) -> Option<ColorIndex>;

    fn is_ai(&self) -> bool {
        false
    }

    /// Strength parameter for AI strategies.
    fn ai_strength(&self) -> Option<u32> {
        None
    }
}

/// A human seat. The host supplies the color through `GameCore::change_color`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HumanStrategy;

impl ColorStrategy for HumanStrategy {
    fn choose_color(&self, _ctx: &ChoiceContext<'_>) -> Option<ColorIndex> {
        None
    }
}

/// A human seat backed by an input provider (a prompt, a UI callback, a script).
pub struct InputStrategy<F> {
    input: F,
}

impl<F> InputStrategy<F>
where
    F: Fn(&ChoiceContext<'_>) -> Option<ColorIndex>,
{
    pub fn new(input: F) -> Self {
        Self { input }
    }
}

impl<F> ColorStrategy for InputStrategy<F>
where
    F: Fn(&ChoiceContext<'_>) -> Option<ColorIndex>,
{
    fn choose_color(&self, ctx: &ChoiceContext<'_>) -> Option<ColorIndex> {
        (self.input)(ctx)
    }
}

/// Greedy AI with strength-dependent noise.
///
/// Strength 0 plays a random available color. Higher strengths play the color
/// with the largest immediate capture with probability
/// `strength / AI_MAX_STRENGTH`, and a random available color otherwise.
pub struct AiStrategy {
    strength: u32,
    rng: RefCell<fastrand::Rng>,
}

impl AiStrategy {
    pub fn new(strength: u32) -> Self {
        Self::with_rng(strength, fastrand::Rng::new())
    }

    pub fn with_rng(strength: u32, rng: fastrand::Rng) -> Self {
        Self {
            strength,
            rng: RefCell::new(rng),
        }
    }

    /// Available color with the largest capture; lowest index on ties.
    fn greediest(ctx: &ChoiceContext<'_>, available: &[ColorIndex]) -> Option<ColorIndex> {
        let mut best: Option<(ColorIndex, usize)> = None;
        for &color in available {
            let gain = ctx.gain(color);
            if best.is_none_or(|(_, g)| gain > g) {
                best = Some((color, gain));
            }
        }
        best.map(|(color, _)| color)
    }
}

impl ColorStrategy for AiStrategy {
    fn choose_color(&self, ctx: &ChoiceContext<'_>) -> Option<ColorIndex> {
        let available = ctx.available_colors();
        if available.is_empty() {
            return None;
        }
        let mut rng = self.rng.borrow_mut();
        let greedy = self.strength >= AI_MAX_STRENGTH
            || (self.strength > 0 && rng.u32(..AI_MAX_STRENGTH) < self.strength);
        let choice = if greedy {
            Self::greediest(ctx, &available)
        } else {
            available.get(rng.usize(..available.len())).copied()
        };
        tracing::trace!(
            player = ctx.player.index(),
            strength = self.strength,
            greedy,
            ?choice,
            "ai chose color"
        );
        choice
    }

    fn is_ai(&self) -> bool {
        true
    }

    fn ai_strength(&self) -> Option<u32> {
        Some(self.strength)
    }
}

/// A seat in the game: territory, current color, move count and strategy.
pub struct Player {
    index: PlayerIndex,
    owned: BTreeSet<Coord>,
    current_color: Option<ColorIndex>,
    moves: u32,
    strategy: Box<dyn ColorStrategy>,
}

impl Player {
    pub fn new(index: PlayerIndex, strategy: Box<dyn ColorStrategy>) -> Self {
        Self {
            index,
            owned: BTreeSet::new(),
            current_color: None,
            moves: 0,
            strategy,
        }
    }

    pub fn human(index: PlayerIndex) -> Self {
        Self::new(index, Box::new(HumanStrategy))
    }

    pub fn ai(index: PlayerIndex, strength: u32) -> Self {
        Self::new(index, Box::new(AiStrategy::new(strength)))
    }

    pub fn index(&self) -> PlayerIndex {
        self.index
    }

    /// The player's territory.
    pub fn owned(&self) -> &BTreeSet<Coord> {
        &self.owned
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    pub fn owns(&self, c: Coord) -> bool {
        self.owned.contains(&c)
    }

    /// Add `c` to the territory. Returns false if it was already owned.
    pub fn add_owned(&mut self, c: Coord) -> bool {
        self.owned.insert(c)
    }

    pub fn current_color(&self) -> Option<ColorIndex> {
        self.current_color
    }

    pub(crate) fn set_current_color(&mut self, color: ColorIndex) {
        self.current_color = Some(color);
    }

    pub fn moves_count(&self) -> u32 {
        self.moves
    }

    pub fn increment_moves(&mut self) {
        self.moves += 1;
    }

    pub(crate) fn reset_moves(&mut self) {
        self.moves = 0;
    }

    pub fn is_ai(&self) -> bool {
        self.strategy.is_ai()
    }

    pub fn ai_strength(&self) -> Option<u32> {
        self.strategy.ai_strength()
    }

    pub(crate) fn set_strategy(&mut self, strategy: Box<dyn ColorStrategy>) {
        self.strategy = strategy;
    }

    /// Ask the strategy for this player's next color.
    pub fn choose_color(&self, board: &Board, colors_count: usize) -> Option<ColorIndex> {
        let ctx = ChoiceContext {
            board,
            player: self,
            colors_count,
        };
        self.strategy.choose_color(&ctx)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("index", &self.index)
            .field("owned", &self.owned.len())
            .field("current_color", &self.current_color)
            .field("moves", &self.moves)
            .field("ai_strength", &self.ai_strength())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_owned_is_idempotent() {
        let mut p = Player::human(0);
        assert!(p.add_owned(Coord::new(0, 0)));
        assert!(!p.add_owned(Coord::new(0, 0)));
        assert_eq!(p.owned_count(), 1);
        assert!(p.owns(Coord::new(0, 0)));
    }

    #[test]
    fn test_moves_count() {
        let mut p = Player::human(1);
        assert_eq!(p.moves_count(), 0);
        p.increment_moves();
        p.increment_moves();
        assert_eq!(p.moves_count(), 2);
        p.reset_moves();
        assert_eq!(p.moves_count(), 0);
    }

    #[test]
    fn test_human_waits_for_input() {
        let board = Board::from_rows(&[[0usize, 1], [1, 0]]).unwrap();
        let p = Player::human(0);
        assert!(!p.is_ai());
        assert_eq!(p.ai_strength(), None);
        assert_eq!(p.choose_color(&board, 2), None);
    }

    #[test]
    fn test_input_strategy() {
        let board = Board::from_rows(&[[0usize, 1], [1, 0]]).unwrap();
        let p = Player::new(0, Box::new(InputStrategy::new(|_: &ChoiceContext<'_>| Some(1))));
        assert_eq!(p.choose_color(&board, 2), Some(1));
    }

    #[test]
    fn test_ai_picks_greediest_color() {
        // Player owns (0,0) colored 0; color 2 captures three cells, color 1 one.
        let board = Board::from_rows(&[[0usize, 2, 2], [1, 2, 0]]).unwrap();
        let mut p = Player::new(1, Box::new(AiStrategy::with_rng(AI_MAX_STRENGTH, fastrand::Rng::with_seed(1))));
        p.add_owned(Coord::new(0, 0));
        p.set_current_color(0);
        assert!(p.is_ai());
        assert_eq!(p.choose_color(&board, 3), Some(2));
    }

    #[test]
    fn test_ai_never_repeats_current_color() {
        let board = Board::from_rows(&[[0usize, 0], [0, 0]]).unwrap();
        for strength in 0..=AI_MAX_STRENGTH {
            let mut p = Player::new(0, Box::new(AiStrategy::with_rng(strength, fastrand::Rng::with_seed(9))));
            p.add_owned(Coord::new(0, 0));
            p.set_current_color(0);
            for _ in 0..20 {
                let c = p.choose_color(&board, 3).unwrap();
                assert_ne!(c, 0);
                assert!(c < 3);
            }
        }
    }

    #[test]
    fn test_ai_single_color_palette() {
        let board = Board::from_rows(&[[0usize]]).unwrap();
        let mut p = Player::ai(0, 2);
        p.set_current_color(0);
        assert_eq!(p.choose_color(&board, 1), None);
    }
}
