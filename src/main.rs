//! Colorgrid: a flood-fill color conquest game.
//!
//! ## Usage
//!
//! - `colorgrid` - Run an all-AI demo game
//! - `colorgrid play` - Play against the AI on the terminal
//! - `colorgrid simulate --games 100` - Play many AI games and report wins

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use colorgrid::constants::*;
use colorgrid::game::{GameCore, Options};
use colorgrid::player::{AiStrategy, ChoiceContext, InputStrategy};

/// Colorgrid: flood-fill color conquest
#[derive(Parser)]
#[command(name = "colorgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    game: GameArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one game with every seat played by the AI
    Demo,
    /// Play on the terminal; human seats type a color per turn
    Play,
    /// Play many all-AI games and report how often each seat wins
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value_t = 100)]
        games: u64,
    },
}

#[derive(Args)]
struct GameArgs {
    /// Board width
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH, env = "COLORGRID_WIDTH", global = true)]
    width: usize,
    /// Board height
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT, env = "COLORGRID_HEIGHT", global = true)]
    height: usize,
    /// Number of colors
    #[arg(long, default_value_t = DEFAULT_COLORS_COUNT, env = "COLORGRID_COLORS", global = true)]
    colors: usize,
    /// Number of players (1-4)
    #[arg(long, default_value_t = DEFAULT_PLAYERS_COUNT, env = "COLORGRID_PLAYERS", global = true)]
    players: usize,
    /// Number of human players
    #[arg(long, default_value_t = DEFAULT_HUMAN_PLAYERS_COUNT, env = "COLORGRID_HUMANS", global = true)]
    humans: usize,
    /// AI strength (0 = random)
    #[arg(long, default_value_t = DEFAULT_AI_STRENGTH, env = "COLORGRID_AI_STRENGTH", global = true)]
    ai_strength: u32,
    /// Move limit for player 0 (unlimited if omitted)
    #[arg(long, env = "COLORGRID_MAX_MOVES", global = true)]
    max_moves: Option<u32>,
    /// Board seed (random if omitted)
    #[arg(long, env = "COLORGRID_SEED", global = true)]
    seed: Option<u64>,
    /// Index of the player who moves first
    #[arg(long, default_value_t = 0, env = "COLORGRID_START_PLAYER", global = true)]
    start_player: usize,
}

impl GameArgs {
    fn options(&self) -> Options {
        Options {
            board_width: self.width,
            board_height: self.height,
            colors_count: self.colors,
            players_count: self.players,
            human_players_count: self.humans,
            ai_strength: self.ai_strength,
            max_moves: self.max_moves,
            seed: self.seed,
            start_player_index: self.start_player,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let options = cli.game.options();

    match cli.command {
        Some(Commands::Play) => run_play(options),
        Some(Commands::Simulate { games }) => run_simulate(options, games),
        Some(Commands::Demo) | None => run_demo(options),
    }
}

/// Let the AI drive every seat, including the human ones.
fn all_ai(options: Options) -> Result<GameCore> {
    let strength = options.ai_strength;
    let mut game = GameCore::new(options).context("invalid game options")?;
    for i in 0..game.players_count() {
        game.set_strategy(i, Box::new(AiStrategy::new(strength)))?;
    }
    Ok(game)
}

/// Play until the game ends. Fails if a seat stops providing colors.
fn play_out(game: &mut GameCore, verbose: bool) -> Result<()> {
    while !game.is_game_over() {
        let player = game.current_player_index();
        match game.play_turn()? {
            Some(captured) => {
                if verbose {
                    let color = game.player(player)?.current_color().unwrap_or_default();
                    println!("Player {player} -> color {color}: +{} cells", captured.len());
                }
            }
            None => bail!("player {player} has no color to play"),
        }
    }
    Ok(())
}

fn print_result(game: &GameCore) {
    for p in game.players() {
        println!(
            "Player {}: {} cells in {} moves",
            p.index(),
            p.owned_count(),
            p.moves_count()
        );
    }
    if let Some(winner) = game.winner() {
        println!("Winner: player {}", winner.index());
    }
}

fn run_demo(options: Options) -> Result<()> {
    println!("Colorgrid: flood-fill color conquest\n");
    let mut game = all_ai(options)?;
    println!("Seed: {}", game.seed());
    println!("{}", game.ascii());

    play_out(&mut game, true)?;

    println!("\n{}", game.ascii());
    print_result(&game);
    Ok(())
}

/// Read a color from stdin. `None` on end of input.
fn prompt_color(ctx: &ChoiceContext<'_>) -> Option<usize> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let available = ctx.available_colors();
    loop {
        print!("Player {} color {:?}: ", ctx.player.index(), available);
        stdout.flush().ok()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).ok()? == 0 {
            return None;
        }
        let parsed = line
            .trim()
            .chars()
            .next()
            .and_then(|ch| ch.to_digit(36))
            .map(|d| d as usize);
        match parsed {
            Some(color) if available.contains(&color) => return Some(color),
            _ => println!("Pick one of {available:?}"),
        }
    }
}

fn run_play(options: Options) -> Result<()> {
    let mut game = GameCore::new(options).context("invalid game options")?;
    for i in 0..game.players_count() {
        if !game.player(i)?.is_ai() {
            game.set_strategy(i, Box::new(InputStrategy::new(prompt_color)))?;
        }
    }

    while !game.is_game_over() {
        println!("\n{}", game.ascii());
        println!("Scores: {:?}", game.scores());
        let player = game.current_player_index();
        match game.play_turn()? {
            Some(captured) => println!("Player {player} captured {} cells", captured.len()),
            None => {
                println!("Bye.");
                return Ok(());
            }
        }
    }

    println!("\n{}", game.ascii());
    print_result(&game);
    Ok(())
}

fn run_simulate(options: Options, games: u64) -> Result<()> {
    let first_seed = options.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut wins = vec![0u64; options.players_count];

    for g in 0..games {
        let mut game = all_ai(Options {
            seed: Some(first_seed.wrapping_add(g)),
            ..options.clone()
        })?;
        play_out(&mut game, false)?;
        if let Some(winner) = game.winner() {
            wins[winner.index()] += 1;
        }
    }

    println!("{games} games from seed {first_seed}");
    for (i, w) in wins.iter().enumerate() {
        println!("Player {i}: {w} wins");
    }
    Ok(())
}
