//! Per-player turn state.
//!
//! A turn pairs two flips. Between the completion of one pair (or an
//! aborted first flip) and the start of the next turn, the cards of the
//! finished pair are remembered so the next turn can clean them up:
//! remove them if they matched, turn them face down if they did not.
//!
//! # State Machine
//!
//! ```text
//!              hold_first()             hold_second() + finish_matched()
//!   ┌───────┐ ───────────────► ┌───────────┐ ─────────────► ┌──────────┐
//!   │ Ready │                  │ FirstHeld │                │ PairHeld │
//!   └───────┘ ◄─────────────── └───────────┘                └──────────┘
//!       ▲       abort_first()        │                           │
//!       │                            │ hold_second() +           │
//!       └────────────────────────────┘ finish_unmatched()        │
//!       ▲                                                        │
//!       └────────────────────────────────────────────────────────┘
//!                            begin_turn()
//! ```
//!
//! `begin_turn` also runs from `Ready` (it is a no-op on the slots then)
//! and hands back the remembered pair for cleanup.

use scramble_types::{PlayerId, Position};
use std::collections::HashMap;

/// Where a player is in the two-flip turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No card held; the next flip starts a new turn.
    Ready,
    /// Holding the first card of a pair at this position.
    FirstHeld(Position),
    /// A matched pair is still held; the next flip starts a new turn.
    PairHeld,
}

/// Turn state of a single player.
///
/// `PairHeld` is only reachable through
/// [`finish_matched`](Self::finish_matched): a non-matching second flip
/// relinquishes both
/// cards immediately, so a held pair always means the player still
/// controls both cells.
#[derive(Debug, Clone, Default)]
pub struct TurnState {
    first: Option<Position>,
    second: Option<Position>,
    previous: Vec<Position>,
    previous_matched: bool,
}

impl TurnState {
    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match (self.first, self.second) {
            (None, second) => {
                debug_assert!(second.is_none(), "second card held without a first");
                TurnPhase::Ready
            }
            (Some(first), None) => TurnPhase::FirstHeld(first),
            (Some(_), Some(_)) => TurnPhase::PairHeld,
        }
    }

    /// Starts a new turn: clears both card slots and takes the
    /// remembered previous pair for cleanup.
    ///
    /// Returns `(positions, matched)` where `positions` has 0, 1 or 2
    /// entries.
    pub fn begin_turn(&mut self) -> (Vec<Position>, bool) {
        self.first = None;
        self.second = None;
        let matched = std::mem::replace(&mut self.previous_matched, false);
        (std::mem::take(&mut self.previous), matched)
    }

    /// Records acquisition of the first card.
    pub fn hold_first(&mut self, pos: Position) {
        debug_assert!(self.first.is_none(), "first card already held");
        self.first = Some(pos);
    }

    /// Records the second card of the pair.
    pub fn hold_second(&mut self, pos: Position) {
        debug_assert!(self.first.is_some() && self.second.is_none());
        self.second = Some(pos);
    }

    /// Completes a matching pair: both cards stay held (and controlled)
    /// until the next turn removes them.
    pub fn finish_matched(&mut self) {
        debug_assert!(self.first.is_some() && self.second.is_some());
        self.previous = self.first.into_iter().chain(self.second).collect();
        self.previous_matched = true;
    }

    /// Completes a non-matching pair: both cards are given up now and
    /// remembered so the next turn can turn them face down.
    pub fn finish_unmatched(&mut self) {
        debug_assert!(self.first.is_some() && self.second.is_some());
        self.previous = self.first.take().into_iter().chain(self.second.take()).collect();
        self.previous_matched = false;
    }

    /// Aborts the turn while only the first card is held (the second
    /// flip failed). The first card joins the no-match lineage.
    pub fn abort_first(&mut self) {
        debug_assert!(self.second.is_none(), "abort_first with a second card held");
        self.previous = self.first.take().into_iter().collect();
        self.previous_matched = false;
    }
}

/// Registry of every player that has touched the board.
///
/// Entries are created lazily on first use and never removed.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, TurnState>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the player's turn state, creating it on first contact.
    pub fn state_mut(&mut self, player: &PlayerId) -> &mut TurnState {
        self.players.entry(player.clone()).or_default()
    }

    /// Returns the player's turn state if the player has played before.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<&TurnState> {
        self.players.get(player)
    }

    /// Number of known players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if no player has touched the board yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn fresh_state_is_ready() {
        let state = TurnState::default();
        assert_eq!(state.phase(), TurnPhase::Ready);
    }

    #[test]
    fn matched_pair_cycle() {
        let mut state = TurnState::default();

        state.hold_first(pos(0, 0));
        assert_eq!(state.phase(), TurnPhase::FirstHeld(pos(0, 0)));

        state.hold_second(pos(0, 2));
        state.finish_matched();
        assert_eq!(state.phase(), TurnPhase::PairHeld);

        let (previous, matched) = state.begin_turn();
        assert_eq!(previous, vec![pos(0, 0), pos(0, 2)]);
        assert!(matched);
        assert_eq!(state.phase(), TurnPhase::Ready);
    }

    #[test]
    fn unmatched_pair_returns_to_ready() {
        let mut state = TurnState::default();

        state.hold_first(pos(0, 0));
        state.hold_second(pos(0, 1));
        state.finish_unmatched();
        assert_eq!(state.phase(), TurnPhase::Ready);

        let (previous, matched) = state.begin_turn();
        assert_eq!(previous, vec![pos(0, 0), pos(0, 1)]);
        assert!(!matched);
    }

    #[test]
    fn aborted_first_flip_lineage() {
        let mut state = TurnState::default();

        state.hold_first(pos(1, 1));
        state.abort_first();
        assert_eq!(state.phase(), TurnPhase::Ready);

        let (previous, matched) = state.begin_turn();
        assert_eq!(previous, vec![pos(1, 1)]);
        assert!(!matched);
    }

    #[test]
    fn begin_turn_twice_is_empty() {
        let mut state = TurnState::default();
        state.hold_first(pos(0, 0));
        state.hold_second(pos(0, 1));
        state.finish_unmatched();

        let _ = state.begin_turn();
        let (previous, matched) = state.begin_turn();
        assert!(previous.is_empty());
        assert!(!matched);
    }

    #[test]
    fn registry_creates_lazily() {
        let alice = PlayerId::new("alice");
        let mut registry = PlayerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(&alice).is_none());

        registry.state_mut(&alice).hold_first(pos(0, 0));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&alice).map(TurnState::phase),
            Some(TurnPhase::FirstHeld(pos(0, 0)))
        );
    }

    #[test]
    fn registry_is_per_player() {
        let mut registry = PlayerRegistry::new();
        registry.state_mut(&PlayerId::new("alice")).hold_first(pos(0, 0));

        let bob = registry.state_mut(&PlayerId::new("bob"));
        assert_eq!(bob.phase(), TurnPhase::Ready);
        assert_eq!(registry.len(), 2);
    }
}
