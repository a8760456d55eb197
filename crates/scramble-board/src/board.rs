//! The shared board and its four operations.
//!
//! # Locking Discipline
//!
//! All mutable state (grid, player registry, waiter queues, watcher set)
//! lives behind a single [`parking_lot::Mutex`]. Invariants span
//! components (a held first card constrains both the registry and the
//! grid), so finer-grained locks are not an option. The lock is never
//! held across an await: an operation that must suspend registers a
//! one-shot wake handle under the lock, releases the lock, awaits the
//! handle, then re-acquires the lock and re-reads the state it depends
//! on. The cell it waited for may have been removed or re-taken in the
//! meantime.
//!
//! There are exactly three suspension points:
//!
//! 1. a flip whose target card is controlled by another player,
//! 2. a `watch` call awaiting the next change,
//! 3. a `map` call awaiting its transform between group applications.
//!
//! Everything else, including `look` and the whole of second-card
//! resolution, runs synchronously inside one critical section.

use crate::cell::Card;
use crate::error::{BoardSetupError, FlipError};
use crate::grid::Grid;
use crate::player::{PlayerRegistry, TurnPhase};
use crate::waiter::WaiterQueues;
use crate::watch::ChangeBroadcast;
use parking_lot::Mutex;
use scramble_types::{PlayerId, Position};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::{debug, trace};

/// Thread-safe shared board handle.
pub type SharedBoard = Arc<Board>;

/// Outcome of one attempt to take a first card.
enum Acquire {
    /// Control taken; the player now holds the card.
    Taken,
    /// The cell is removed; the flip fails.
    Gone,
    /// The cell is controlled by another player; await this handle and
    /// try again.
    Busy(oneshot::Receiver<()>),
}

/// Everything the board lock protects.
struct BoardState {
    grid: Grid,
    players: PlayerRegistry,
    waiters: WaiterQueues,
    watchers: ChangeBroadcast,
}

/// The shared, mutable Memory Scramble board.
///
/// Any number of players interact with one board concurrently; there
/// are no turns taken between players. A board is created once from its
/// dimensions and card values and lives as long as the process.
///
/// Concurrent calls for *different* players are the point of this type.
/// Concurrent calls for the *same* player are not meaningful (a player
/// is one person); front ends are expected to serialize per player.
///
/// # Example
///
/// ```no_run
/// use scramble_board::Board;
/// use scramble_types::{PlayerId, Position};
///
/// # #[tokio::main]
/// # async fn main() {
/// let board = Board::from_values(1, 2, ["A", "A"]).unwrap().into_shared();
/// let alice = PlayerId::new("alice");
///
/// let snap = board.flip(&alice, Position::new(0, 0)).await.unwrap();
/// assert_eq!(snap, "1x2\nmy A\ndown\n");
/// # }
/// ```
pub struct Board {
    rows: usize,
    cols: usize,
    state: Mutex<BoardState>,
    /// Serializes whole `map` calls so overlapping transforms cannot
    /// split a value-equality class.
    map_serial: AsyncMutex<()>,
}

impl Board {
    /// Creates a board with every card face down and uncontrolled.
    ///
    /// `values` is consumed in row-major order.
    ///
    /// # Errors
    ///
    /// See [`BoardSetupError`].
    ///
    /// # Example
    ///
    /// ```
    /// use scramble_board::Board;
    /// use scramble_types::PlayerId;
    ///
    /// let board = Board::from_values(2, 2, ["A", "B", "B", "A"]).unwrap();
    /// assert_eq!(board.look(&PlayerId::new("alice")), "2x2\ndown\ndown\ndown\ndown\n");
    /// ```
    pub fn from_values<I, S>(rows: usize, cols: usize, values: I) -> Result<Self, BoardSetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let grid = Grid::from_values(rows, cols, values)?;
        Ok(Self {
            rows: grid.rows(),
            cols: grid.cols(),
            state: Mutex::new(BoardState {
                grid,
                players: PlayerRegistry::new(),
                waiters: WaiterQueues::new(),
                watchers: ChangeBroadcast::new(),
            }),
            map_serial: AsyncMutex::new(()),
        })
    }

    /// Wraps the board for sharing across tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedBoard {
        Arc::new(self)
    }

    /// Board height.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Board width.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns a consistent snapshot of the board as seen by `player`.
    ///
    /// Pure read: never blocks on other players, never changes state,
    /// and does not create registry state for unknown players.
    #[must_use]
    pub fn look(&self, player: &PlayerId) -> String {
        self.state.lock().grid.render(player)
    }

    /// Flips a card for `player` and returns the resulting snapshot.
    ///
    /// What one call does depends on the player's turn phase:
    ///
    /// - **No card held**: the previous turn's leftovers are cleaned up
    ///   (a matched pair is removed, unmatched face-up cards turn back
    ///   down), then the player tries to take the target as their first
    ///   card. If the target is controlled by someone else the call
    ///   suspends until the card is released, re-checking on every wake;
    ///   queued flips for a cell are woken strictly first-come
    ///   first-served.
    /// - **First card held**: the target becomes the second card of the
    ///   pair. A removed or controlled target (the player's own first
    ///   card included) aborts the turn: the first card is released and
    ///   the call fails without suspending. On a value match the player
    ///   keeps control of both cards until their next turn removes
    ///   them; otherwise both cards are left face up for anyone to take.
    /// - **Matched pair still held**: same as holding no card; cleanup
    ///   removes the pair first.
    ///
    /// # Errors
    ///
    /// [`FlipError::NoCard`], [`FlipError::Controlled`],
    /// [`FlipError::OutOfRange`]. Every error path resets the player's
    /// turn state and releases anything they held, so a failed call may
    /// simply be retried.
    pub async fn flip(&self, player: &PlayerId, pos: Position) -> Result<String, FlipError> {
        let mut pending = {
            let mut state = self.state.lock();
            let phase = state.players.state_mut(player).phase();
            trace!(player = %player, %pos, ?phase, "flip");
            match phase {
                TurnPhase::FirstHeld(first_pos) => {
                    if !state.grid.contains(pos) {
                        state.relinquish_first(player, first_pos);
                        return Err(self.out_of_range(pos));
                    }
                    state.resolve_second(player, first_pos, pos)?;
                    return Ok(state.grid.render(player));
                }
                TurnPhase::Ready | TurnPhase::PairHeld => {
                    // A new turn settles the previous one before the
                    // requested coordinate is even validated; a held
                    // matched pair must not outlive a bad flip.
                    state.cleanup_previous(player);
                    if !state.grid.contains(pos) {
                        return Err(self.out_of_range(pos));
                    }
                    match state.try_acquire(player, pos) {
                        Acquire::Taken => return Ok(state.grid.render(player)),
                        Acquire::Gone => return Err(FlipError::NoCard(pos)),
                        Acquire::Busy(rx) => rx,
                    }
                }
            }
        };

        // The target is controlled by someone else. Wait our turn in the
        // cell's queue, then re-read: the card may be free, removed, or
        // taken again by a newer flip that beat us to the lock.
        loop {
            let _ = pending.await;
            let mut state = self.state.lock();
            match state.try_acquire(player, pos) {
                Acquire::Taken => return Ok(state.grid.render(player)),
                Acquire::Gone => return Err(FlipError::NoCard(pos)),
                Acquire::Busy(rx) => pending = rx,
            }
        }
    }

    /// Applies an async value transform uniformly across the board and
    /// returns the resulting snapshot.
    ///
    /// Present cells are grouped by current value in one atomic
    /// snapshot; `f` is then invoked once per distinct value with the
    /// board unlocked, and each result is written back to the whole
    /// group atomically (skipping cells removed in the meantime). Cards
    /// that were equal stay equal at every observable moment, so pairs
    /// keep matching across a `map`. Face-up flags and controllers are
    /// untouched; mapping controlled cards is fine.
    ///
    /// Whole calls are serialized: a second `map` waits for the first
    /// to finish. Flips, looks and watches proceed while `f` runs.
    ///
    /// # Errors
    ///
    /// An error from `f` is returned unchanged. Groups already written
    /// back stay written; the failing and remaining groups are left
    /// untouched.
    pub async fn map<F, Fut, E>(&self, player: &PlayerId, mut f: F) -> Result<String, E>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let _serial = self.map_serial.lock().await;

        let groups = self.state.lock().grid.value_groups();
        debug!(player = %player, groups = groups.len(), "map");

        for (value, positions) in groups {
            let new_value = f(value.clone()).await?;
            if new_value == value {
                continue;
            }
            let mut state = self.state.lock();
            let mut changed = false;
            for pos in positions {
                if let Card::Present { value: current, .. } = &mut state.grid[pos] {
                    if *current == value {
                        *current = new_value.clone();
                        changed = true;
                    }
                }
            }
            if changed {
                state.watchers.signal();
            }
        }

        Ok(self.look(player))
    }

    /// Suspends until the board changes, then returns the new snapshot.
    ///
    /// A change is any card turning face up or face down, a matched
    /// pair being removed, or a `map` actually rewriting a value. Pure
    /// control handoffs (a card being taken or released) are not
    /// changes. Every watcher registered at the moment of a change is
    /// woken by it; a watcher registered afterwards only sees later
    /// changes.
    pub async fn watch(&self, player: &PlayerId) -> String {
        let rx = self.state.lock().watchers.subscribe();
        let _ = rx.await;
        self.look(player)
    }

    fn out_of_range(&self, pos: Position) -> FlipError {
        FlipError::OutOfRange {
            pos,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl BoardState {
    /// Applies the previous turn's aftermath at the start of a new one:
    /// a matched pair is removed from the board, an unmatched pair (or
    /// a single aborted first card) turns face down where nobody else
    /// has taken it.
    fn cleanup_previous(&mut self, player: &PlayerId) {
        let (previous, matched) = self.players.state_mut(player).begin_turn();
        if previous.is_empty() {
            return;
        }
        if matched {
            debug_assert_eq!(previous.len(), 2, "matched lineage must be a pair");
            for &pos in &previous {
                self.grid[pos] = Card::Removed;
                let woken = self.waiters.wake_all(pos);
                debug!(player = %player, %pos, woken, "removed matched card");
            }
            self.watchers.signal();
        } else {
            let mut changed = false;
            for &pos in &previous {
                if let Card::Present {
                    face_up,
                    controller: None,
                    ..
                } = &mut self.grid[pos]
                {
                    if *face_up {
                        *face_up = false;
                        changed = true;
                    }
                }
            }
            if changed {
                self.watchers.signal();
            }
        }
    }

    /// One attempt to take `pos` as the player's first card. Must be
    /// called with no card held and the previous turn cleaned up.
    fn try_acquire(&mut self, player: &PlayerId, pos: Position) -> Acquire {
        let turned_up = match &mut self.grid[pos] {
            Card::Removed => return Acquire::Gone,
            Card::Present {
                controller: Some(holder),
                ..
            } if holder != player => {
                trace!(player = %player, %pos, holder = %holder, "queued on controlled card");
                return Acquire::Busy(self.waiters.enqueue(pos));
            }
            Card::Present {
                face_up,
                controller,
                ..
            } => {
                *controller = Some(player.clone());
                let turned_up = !*face_up;
                *face_up = true;
                turned_up
            }
        };
        self.players.state_mut(player).hold_first(pos);
        if turned_up {
            self.watchers.signal();
        }
        Acquire::Taken
    }

    /// Resolves the target as the second card of the player's pair.
    fn resolve_second(
        &mut self,
        player: &PlayerId,
        first_pos: Position,
        pos: Position,
    ) -> Result<(), FlipError> {
        // A removed or controlled target aborts the turn. The player's
        // own first card is controlled, so it is rejected here too; the
        // target's holder, if any, keeps it.
        match &self.grid[pos] {
            Card::Removed => {
                self.relinquish_first(player, first_pos);
                return Err(FlipError::NoCard(pos));
            }
            Card::Present {
                controller: Some(_),
                ..
            } => {
                self.relinquish_first(player, first_pos);
                return Err(FlipError::Controlled(pos));
            }
            Card::Present { .. } => {}
        }

        let first_value = match &self.grid[first_pos] {
            Card::Present { value, .. } => value.clone(),
            Card::Removed => unreachable!("held first card at {first_pos} is removed"),
        };

        // Reveal the target if it was face down.
        let (matched, revealed) = match &mut self.grid[pos] {
            Card::Present { value, face_up, .. } => {
                let revealed = !*face_up;
                *face_up = true;
                (*value == first_value, revealed)
            }
            Card::Removed => unreachable!("target at {pos} vanished inside the critical section"),
        };
        if revealed {
            self.watchers.signal();
        }

        self.players.state_mut(player).hold_second(pos);
        if matched {
            // Take the second card too; both stay held and controlled
            // until the player's next turn removes them.
            if let Card::Present { controller, .. } = &mut self.grid[pos] {
                *controller = Some(player.clone());
            }
            self.players.state_mut(player).finish_matched();
            debug!(player = %player, first = %first_pos, second = %pos, "matched pair");
        } else {
            // Both cards are given up; they stay face up until the
            // player's next turn turns them down.
            self.players.state_mut(player).finish_unmatched();
            self.release(first_pos);
            debug!(player = %player, first = %first_pos, second = %pos, "pair did not match");
        }
        Ok(())
    }

    /// Gives up a held first card after a failed second flip.
    fn relinquish_first(&mut self, player: &PlayerId, first_pos: Position) {
        self.players.state_mut(player).abort_first();
        self.release(first_pos);
    }

    /// Clears the controller of `pos` and wakes the longest-queued
    /// waiter, if any.
    fn release(&mut self, pos: Position) {
        if let Card::Present { controller, .. } = &mut self.grid[pos] {
            *controller = None;
        }
        let woken = self.waiters.wake_one(pos);
        trace!(%pos, woken, "released control");
    }
}
