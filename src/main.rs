use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use chess_engine::perft::{divide, Perft};
use chess_engine::{
    Board, Color, Game, Player, RandomPlayer, SearchConfig, SearchPlayer, STARTING_FEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Search,
    Random,
}

/// Self-play between two computer players.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = PlayerKind::Search)]
    white: PlayerKind,

    #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
    black: PlayerKind,

    /// Nominal search depth in plies.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..))]
    depth: i32,

    /// Remaining depth at which capture and check extensions stop.
    #[arg(long, default_value_t = -4, allow_hyphen_values = true)]
    floor: i32,

    /// Time budget per search, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    time_ms: u64,

    /// Plies before the game is declared drawn.
    #[arg(long, default_value_t = chess_engine::game::DEFAULT_MAX_MOVES)]
    max_moves: u32,

    #[arg(long, default_value = STARTING_FEN)]
    fen: String,

    /// Seed for random players; each side derives its own.
    #[arg(long)]
    seed: Option<u64>,

    /// Count move paths to this depth instead of playing.
    #[arg(long)]
    perft: Option<u32>,
}

fn make_player(kind: PlayerKind, color: Color, args: &Args) -> Box<dyn Player> {
    match kind {
        PlayerKind::Search => {
            let config = SearchConfig::default()
                .with_depth(args.depth)
                .with_depth_floor(args.floor)
                .with_time_budget(Duration::from_millis(args.time_ms));
            Box::new(SearchPlayer::new(color, config))
        }
        PlayerKind::Random => match args.seed {
            Some(seed) => Box::new(RandomPlayer::seeded(color, seed.wrapping_add(color as u64))),
            None => Box::new(RandomPlayer::new(color)),
        },
    }
}

fn run_perft(fen: &str, depth: u32) -> anyhow::Result<()> {
    let (board, color) = Board::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))?;
    for (mv, count) in divide(&board, color, depth) {
        println!("{mv}: {count}");
    }
    let mut perft = Perft::new();
    let nodes = perft.run(&board, color, depth);
    println!();
    println!("nodes:      {nodes}");
    println!("captures:   {}", perft.captures);
    println!("en passant: {}", perft.en_passants);
    println!("castles:    {}", perft.castles);
    println!("promotions: {}", perft.promotions);
    println!("checks:     {}", perft.checks);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(
        args.floor < args.depth,
        "--floor ({}) must be below --depth ({})",
        args.floor,
        args.depth
    );

    if let Some(depth) = args.perft {
        return run_perft(&args.fen, depth);
    }

    let white = make_player(args.white, Color::White, &args);
    let black = make_player(args.black, Color::Black, &args);
    let mut game = Game::from_fen(&args.fen, white, black)
        .with_context(|| format!("invalid FEN: {}", args.fen))?
        .with_max_moves(args.max_moves);

    println!("{}", game.board());
    let outcome = game.run();
    println!("{}", game.board());
    println!("{outcome}");
    println!("{} total moves.", game.ply());
    Ok(())
}
