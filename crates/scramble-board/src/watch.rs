//! Change-notification broadcast.
//!
//! Watchers are one-shot: each `watch` call subscribes once, is woken by
//! the next change, and returns. Signalling drains the whole set
//! atomically (the board lock is held), so every watcher registered
//! before a change sees it, and a watcher registered afterwards only
//! sees later changes.

use tokio::sync::oneshot;

/// The set of currently-suspended watchers.
#[derive(Debug, Default)]
pub(crate) struct ChangeBroadcast {
    watchers: Vec<oneshot::Sender<()>>,
}

impl ChangeBroadcast {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a one-shot watcher and returns the handle to await.
    pub(crate) fn subscribe(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.watchers.push(tx);
        rx
    }

    /// Wakes every currently-registered watcher and empties the set.
    ///
    /// Watchers whose receiver has been dropped (cancelled `watch`
    /// calls) are discarded silently. Returns the number of live
    /// watchers woken.
    pub(crate) fn signal(&mut self) -> usize {
        let mut woken = 0;
        for tx in self.watchers.drain(..) {
            if tx.send(()).is_ok() {
                woken += 1;
            }
        }
        woken
    }

    /// Number of registered watchers, live or not.
    #[cfg(test)]
    pub(crate) fn watcher_count(&self) -> usize {
        self.watchers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot::error::TryRecvError;

    #[test]
    fn signal_wakes_all_registered() {
        let mut broadcast = ChangeBroadcast::new();
        let mut first = broadcast.subscribe();
        let mut second = broadcast.subscribe();

        assert_eq!(broadcast.signal(), 2);
        assert_eq!(first.try_recv(), Ok(()));
        assert_eq!(second.try_recv(), Ok(()));
    }

    #[test]
    fn signal_drains_the_set() {
        let mut broadcast = ChangeBroadcast::new();
        let _rx = broadcast.subscribe();
        assert_eq!(broadcast.watcher_count(), 1);

        broadcast.signal();
        assert_eq!(broadcast.watcher_count(), 0);

        // A second signal has nobody left to wake.
        assert_eq!(broadcast.signal(), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_signal() {
        let mut broadcast = ChangeBroadcast::new();
        broadcast.signal();

        let mut late = broadcast.subscribe();
        assert_eq!(late.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(broadcast.signal(), 1);
        assert_eq!(late.try_recv(), Ok(()));
    }

    #[test]
    fn cancelled_watchers_are_skipped() {
        let mut broadcast = ChangeBroadcast::new();
        let cancelled = broadcast.subscribe();
        let mut live = broadcast.subscribe();
        drop(cancelled);

        assert_eq!(broadcast.signal(), 1);
        assert_eq!(live.try_recv(), Ok(()));
    }
}
