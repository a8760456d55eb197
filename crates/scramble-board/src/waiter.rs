//! Per-cell FIFO queues of suspended flips.
//!
//! A flip that finds its target controlled by another player parks a
//! one-shot wake handle here and awaits the receiving half with the
//! board lock released. Enqueueing happens in the same critical section
//! as the controlled observation, so a waiter can never miss the release
//! it is waiting for: the wake value is buffered by the channel even if
//! it is sent before the waiter is first polled.
//!
//! Wakeups are strict FIFO per cell. A sender whose receiver has been
//! dropped (the waiting flip was cancelled) is discarded at wake time,
//! so a cancelled flip never holds a live slot in the queue.

use scramble_types::Position;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

/// FIFO wake queues, one per contested cell.
#[derive(Debug, Default)]
pub(crate) struct WaiterQueues {
    queues: HashMap<Position, VecDeque<oneshot::Sender<()>>>,
}

impl WaiterQueues {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a waiter at `pos` and returns the handle to await.
    pub(crate) fn enqueue(&mut self, pos: Position) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.queues.entry(pos).or_default().push_back(tx);
        rx
    }

    /// Wakes the longest-queued live waiter at `pos`.
    ///
    /// Dead senders (receiver dropped) are skipped and discarded.
    /// Returns `true` if a waiter was actually woken.
    pub(crate) fn wake_one(&mut self, pos: Position) -> bool {
        let Some(queue) = self.queues.get_mut(&pos) else {
            return false;
        };
        let mut woken = false;
        while let Some(tx) = queue.pop_front() {
            if tx.send(()).is_ok() {
                woken = true;
                break;
            }
        }
        if queue.is_empty() {
            self.queues.remove(&pos);
        }
        woken
    }

    /// Wakes every waiter at `pos`.
    ///
    /// Used when the cell is removed: each woken flip re-reads the cell
    /// and fails, and nothing would ever release a removed cell again.
    /// Returns the number of live waiters woken.
    pub(crate) fn wake_all(&mut self, pos: Position) -> usize {
        let Some(queue) = self.queues.remove(&pos) else {
            return 0;
        };
        let mut woken = 0;
        for tx in queue {
            if tx.send(()).is_ok() {
                woken += 1;
            }
        }
        woken
    }

    /// Number of queued waiters at `pos`, live or not.
    #[cfg(test)]
    pub(crate) fn waiting(&self, pos: Position) -> usize {
        self.queues.get(&pos).map_or(0, VecDeque::len)
    }
}
