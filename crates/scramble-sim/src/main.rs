//! Memory Scramble simulation harness.
//!
//! Drives one shared board with any number of concurrent random
//! players. Each player plays turns of two random flips, occasionally
//! peeking with `look`, waiting on `watch`, or running a case-swapping
//! `map`. The harness tallies per-player outcomes and prints a table or
//! a JSON document.
//!
//! A first flip can wait forever on a card whose holder has already
//! stopped playing, so every first flip runs under a timeout; a timed
//! out flip is dropped (exercising waiter cancellation) and counted.
//!
//! Logging is controlled by `RUST_LOG`, e.g.
//! `RUST_LOG=scramble_board=debug scramble-sim --players 8`.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use scramble_board::{Board, FlipError, SharedBoard};
use scramble_types::{PlayerId, Position};
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// How long a first flip may wait on a contested card before the
/// simulation gives up on it.
const FLIP_DEADLINE: Duration = Duration::from_secs(2);

/// How long a watch call is allowed to wait for a change.
const WATCH_DEADLINE: Duration = Duration::from_millis(200);

/// Concurrent random-player simulation for the Memory Scramble board.
#[derive(Parser, Debug)]
#[command(name = "scramble-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Board height
    #[arg(long, default_value_t = 4)]
    rows: usize,

    /// Board width
    #[arg(long, default_value_t = 4)]
    cols: usize,

    /// Number of concurrent players
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Turns (pairs of flips) each player attempts
    #[arg(long, default_value_t = 20)]
    turns: usize,

    /// Seed for reproducible runs (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit a JSON summary instead of the human table
    #[arg(long)]
    json: bool,
}

/// Per-player tally of flip outcomes.
#[derive(Debug, Default, Serialize)]
struct PlayerStats {
    player: String,
    turns: usize,
    matches: usize,
    mismatches: usize,
    no_card: usize,
    controlled: usize,
    timeouts: usize,
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    rows: usize,
    cols: usize,
    players: &'a [PlayerStats],
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    ensure!(args.players > 0, "need at least one player");
    ensure!(
        args.rows * args.cols % 2 == 0,
        "board must have an even number of cells for pairs"
    );

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        rows = args.rows,
        cols = args.cols,
        players = args.players,
        turns = args.turns,
        seed,
        "starting simulation"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let values = deal_values(args.rows, args.cols, &mut rng);
    let board = Board::from_values(args.rows, args.cols, values)
        .context("failed to build board")?
        .into_shared();

    let mut tasks = Vec::new();
    for i in 0..args.players {
        let player = PlayerId::new(format!("player-{i}"));
        let rng = StdRng::seed_from_u64(seed.wrapping_add(1 + i as u64));
        tasks.push(tokio::spawn(play(board.clone(), player, args.turns, rng)));
    }

    let mut stats = Vec::new();
    for task in tasks {
        stats.push(task.await.context("player task panicked")?);
    }

    if args.json {
        let summary = Summary {
            seed,
            rows: args.rows,
            cols: args.cols,
            players: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_table(&stats);
        println!("\nfinal board:\n{}", board.look(&PlayerId::new("observer")));
    }
    Ok(())
}

/// Plays `turns` turns of two random flips each.
async fn play(board: SharedBoard, player: PlayerId, turns: usize, mut rng: StdRng) -> PlayerStats {
    let mut stats = PlayerStats {
        player: player.to_string(),
        ..PlayerStats::default()
    };
    let rows = board.rows();
    let cols = board.cols();

    for turn in 0..turns {
        stats.turns += 1;

        let first = random_pos(&mut rng, rows, cols);
        match timeout(FLIP_DEADLINE, board.flip(&player, first)).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                record_error(&mut stats, &err);
                continue;
            }
            Err(_) => {
                debug!(player = %player, pos = %first, "gave up waiting on contested card");
                stats.timeouts += 1;
                continue;
            }
        }

        let second = random_pos(&mut rng, rows, cols);
        match board.flip(&player, second).await {
            Ok(snap) => {
                if spot(&snap, second, cols).starts_with("my ") {
                    stats.matches += 1;
                } else {
                    stats.mismatches += 1;
                }
            }
            Err(err) => record_error(&mut stats, &err),
        }

        // Sprinkle in the observation operations.
        if turn % 5 == 4 {
            let _ = board.look(&player);
        }
        if turn % 7 == 6 {
            let _ = timeout(WATCH_DEADLINE, board.watch(&player)).await;
        }
        if turn % 11 == 10 {
            let _ = board
                .map(&player, |v| async move { Ok::<_, Infallible>(swap_case(&v)) })
                .await;
        }
    }
    stats
}

fn record_error(stats: &mut PlayerStats, err: &FlipError) {
    match err {
        FlipError::NoCard(_) => stats.no_card += 1,
        FlipError::Controlled(_) => stats.controlled += 1,
        FlipError::OutOfRange { .. } => {
            debug!(%err, "simulation generated an out-of-range flip");
        }
    }
}

/// Builds a shuffled sequence of value pairs covering the board.
fn deal_values(rows: usize, cols: usize, rng: &mut StdRng) -> Vec<String> {
    let pairs = rows * cols / 2;
    let mut values = Vec::with_capacity(rows * cols);
    for i in 0..pairs {
        let value = format!("C{i}");
        values.push(value.clone());
        values.push(value);
    }
    values.shuffle(rng);
    values
}

fn random_pos(rng: &mut StdRng, rows: usize, cols: usize) -> Position {
    Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols))
}

/// Returns the snapshot line for `pos`, or `""` if malformed.
fn spot(snapshot: &str, pos: Position, cols: usize) -> &str {
    snapshot
        .lines()
        .nth(1 + pos.row * cols + pos.col)
        .unwrap_or("")
}

/// Swaps the ASCII case of every character; its own inverse, so values
/// that were equal stay equal and repeated maps cycle.
fn swap_case(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

fn print_table(stats: &[PlayerStats]) {
    println!(
        "{:<12} {:>6} {:>8} {:>11} {:>8} {:>11} {:>9}",
        "player", "turns", "matches", "mismatches", "no-card", "controlled", "timeouts"
    );
    for s in stats {
        println!(
            "{:<12} {:>6} {:>8} {:>11} {:>8} {:>11} {:>9}",
            s.player, s.turns, s.matches, s.mismatches, s.no_card, s.controlled, s.timeouts
        );
    }
}
