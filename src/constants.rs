//! Constants for default game options and engine limits.
//!
//! This module contains the configuration defaults used by [`Options::default`]
//! and the fixed limits of the engine.
//!
//! [`Options::default`]: crate::game::Options

// =============================================================================
// Default Options
// =============================================================================

/// Default board width (columns).
pub const DEFAULT_BOARD_WIDTH: usize = 12;

/// Default board height (rows).
pub const DEFAULT_BOARD_HEIGHT: usize = 12;

/// Default palette size.
pub const DEFAULT_COLORS_COUNT: usize = 6;

/// Default number of players.
pub const DEFAULT_PLAYERS_COUNT: usize = 2;

/// Default number of human players (player 0).
pub const DEFAULT_HUMAN_PLAYERS_COUNT: usize = 1;

/// Default AI strength.
pub const DEFAULT_AI_STRENGTH: u32 = 1;

// =============================================================================
// Engine Limits
// =============================================================================

/// Maximum number of players, one per board corner.
pub const MAX_PLAYERS: usize = 4;

/// AI strength at (and above) which the AI always plays the greediest color.
pub const AI_MAX_STRENGTH: u32 = 4;

/// Largest palette the ascii dump can render with one character per cell
/// (digits 0-9, then letters a-z).
pub const MAX_ASCII_COLORS: usize = 36;
