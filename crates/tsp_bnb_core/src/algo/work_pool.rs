//! Shared stack of pending work with quiescence detection.
//!
//! A worker `claim`s an item, expands it, then hands back every item it
//! produced in one `complete` call. Items handed out but not yet completed
//! are counted as in flight. `claim` only reports exhaustion when the stack is
//! empty and nothing is in flight: at that point no worker can push again,
//! so the pool is durably drained.

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct PoolState<T> {
    pending: Vec<T>,
    in_flight: usize,
    claimed: usize,
    peak_pending: usize,
}

/// Counters collected over the life of a pool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PoolStats {
    pub(crate) claimed: usize,
    pub(crate) peak_pending: usize,
}

#[derive(Debug)]
pub(crate) struct WorkPool<T> {
    state: Mutex<PoolState<T>>,
    ready: Condvar,
}

impl<T> WorkPool<T> {
    pub(crate) fn new(seed: impl IntoIterator<Item = T>) -> Self {
        let pending: Vec<T> = seed.into_iter().collect();
        let peak_pending = pending.len();
        Self {
            state: Mutex::new(PoolState {
                pending,
                in_flight: 0,
                claimed: 0,
                peak_pending,
            }),
            ready: Condvar::new(),
        }
    }

    /// Takes the most recently pushed item, waiting while the stack is empty
    /// but other workers may still push. `None` means the pool is quiescent.
    pub(crate) fn claim(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.pending.pop() {
                state.in_flight += 1;
                state.claimed += 1;
                return Some(item);
            }
            if state.in_flight == 0 {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Pushes the items produced from one claimed item and releases that claim.
    pub(crate) fn complete(&self, produced: impl IntoIterator<Item = T>) {
        let mut state = self.state.lock();
        let before = state.pending.len();
        state.pending.extend(produced);
        let pushed = state.pending.len() - before;
        state.peak_pending = state.peak_pending.max(state.pending.len());
        debug_assert!(state.in_flight > 0, "complete without a matching claim");
        state.in_flight = state.in_flight.saturating_sub(1);
        let quiescent = state.in_flight == 0 && state.pending.is_empty();
        drop(state);

        if quiescent || pushed > 1 {
            self.ready.notify_all();
        } else if pushed == 1 {
            self.ready.notify_one();
        }
    }

    pub(crate) fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            claimed: state.claimed,
            peak_pending: state.peak_pending,
        }
    }
}
