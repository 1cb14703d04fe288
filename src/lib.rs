//! Colorgrid: state engine for a flood-fill color conquest game.
//!
//! Players start in the board corners and take turns picking a color. The
//! mover's territory is repainted in that color and annexes every unowned,
//! orthogonally connected cell of the same color. The game ends when every
//! cell is owned or player 0 has used up the move limit.
//!
//! ## Modules
//!
//! - [`constants`] - Default options and engine limits
//! - [`coord`] - Board coordinates
//! - [`board`] - Colored cells and the board grid
//! - [`player`] - Players and color-choice strategies (human, AI)
//! - [`game`] - The game engine (setup, moves, turn order, termination)
//!
//! ## Example
//!
//! ```
//! use colorgrid::game::{GameCore, Options};
//!
//! let mut game = GameCore::new(Options {
//!     seed: Some(42),
//!     ..Options::default()
//! })
//! .unwrap();
//!
//! let color = game.available_colors()[0];
//! let captured = game.change_color(color).unwrap();
//! println!("captured {} cells", captured.len());
//! println!("{}", game.ascii());
//! ```

pub mod board;
pub mod constants;
pub mod coord;
pub mod game;
pub mod player;
