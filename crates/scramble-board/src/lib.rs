//! Board concurrency engine for Memory Scramble.
//!
//! Memory Scramble is a multiplayer variant of the Memory card game in
//! which any number of players flip cards on one shared board
//! concurrently, with no turn-taking between players. This crate is the
//! engine behind that board: the per-card state, the per-player turn
//! state machine, fair first-come-first-served waiting on contested
//! cards, and change notification for observers.
//!
//! # Architecture
//!
//! ```text
//!                    look / flip / map / watch
//!                              │
//!                              ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Board                             │
//! │  one mutex over all shared state, released while waiting  │
//! │                                                           │
//! │  ┌──────────┐ ┌────────────────┐ ┌─────────────────────┐  │
//! │  │   Grid   │ │ PlayerRegistry │ │    WaiterQueues     │  │
//! │  │ Card per │ │ TurnState per  │ │ FIFO of wake handles│  │
//! │  │   cell   │ │    player      │ │      per cell       │  │
//! │  └──────────┘ └────────────────┘ └─────────────────────┘  │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │ ChangeBroadcast - one-shot watcher set, drained on  │  │
//! │  │ every observable change                             │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Game Rules
//!
//! A player's turn is a pair of flips:
//!
//! 1. **First card**: take control of a card, turning it face up if
//!    needed. A card controlled by someone else makes the flip wait in
//!    line until the card is released or removed.
//! 2. **Second card**: must be an uncontrolled, present card (the
//!    player's own first card does not qualify). If the values match,
//!    the player keeps control of both; if not, both are released and
//!    stay face up.
//! 3. The *next* flip by the same player settles the aftermath before
//!    starting a new turn: a matched pair is removed from the board,
//!    unmatched leftovers turn face down if nobody has taken them.
//!
//! # Snapshot Format
//!
//! Every operation returns the board as text: a `<rows>x<cols>` header
//! line, then one line per cell in row-major order (`none`, `down`,
//! `up V`, or `my V`). See [`Board::look`].
//!
//! # Concurrency Model
//!
//! All operations are async but only three points actually suspend:
//! waiting for a controlled card, waiting for a change in
//! [`Board::watch`], and the transform calls inside [`Board::map`]. The
//! board mutex is never held across any of them. See the notes on
//! [`Board`].
//!
//! # Example
//!
//! ```no_run
//! use scramble_board::Board;
//! use scramble_types::{PlayerId, Position};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let board = Board::from_values(2, 2, ["A", "B", "B", "A"])
//!     .unwrap()
//!     .into_shared();
//!
//! let alice = PlayerId::new("alice");
//! board.flip(&alice, Position::new(0, 0)).await.unwrap();
//! let snap = board.flip(&alice, Position::new(1, 1)).await.unwrap();
//!
//! // Both cards show as alice's: "A" at (0,0) matches "A" at (1,1).
//! assert_eq!(snap, "2x2\nmy A\ndown\ndown\nmy A\n");
//! # }
//! ```

mod board;
mod cell;
mod error;
mod grid;
mod player;
mod waiter;
mod watch;

pub use board::{Board, SharedBoard};
pub use cell::Card;
pub use error::{BoardSetupError, FlipError};
pub use grid::Grid;
pub use player::{PlayerRegistry, TurnPhase, TurnState};

// Re-export from scramble_types for convenience
pub use scramble_types::{PlayerId, Position};
