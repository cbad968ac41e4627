//! Best complete tour length found so far, shared by every worker of a solve.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic minimum over `f64` tour lengths.
///
/// The value is stored as raw bits in an `AtomicU64`. `improve` only ever
/// replaces the stored value with a strictly smaller one through a
/// compare-and-swap loop, so concurrent improvements cannot overwrite a
/// smaller length with a larger one.
#[derive(Debug)]
pub struct SharedBound {
    bits: AtomicU64,
}

impl SharedBound {
    pub fn new() -> Self {
        Self::with_initial(f64::INFINITY)
    }

    pub fn with_initial(length: f64) -> Self {
        Self {
            bits: AtomicU64::new(length.to_bits()),
        }
    }

    #[inline]
    pub fn read(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Stores `min(best, candidate)`. Returns `true` when `candidate` became the
    /// new best.
    pub fn improve(&self, candidate: f64) -> bool {
        if candidate.is_nan() {
            return false;
        }
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            if candidate >= f64::from_bits(current) {
                return false;
            }
            match self.bits.compare_exchange_weak(
                current,
                candidate.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    log::trace!("bound: improved best={candidate}");
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Per-worker cached reader.
    pub fn view(&self) -> BoundView<'_> {
        BoundView {
            shared: self,
            cached: self.read(),
        }
    }
}

impl Default for SharedBound {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-local copy of the shared bound. The cached value may be stale,
/// which only weakens pruning: complete tours always go through
/// [`SharedBound::improve`].
#[derive(Debug)]
pub struct BoundView<'a> {
    shared: &'a SharedBound,
    cached: f64,
}

impl BoundView<'_> {
    #[inline]
    pub fn get(&self) -> f64 {
        self.cached
    }

    #[inline]
    pub fn refresh(&mut self) -> f64 {
        self.cached = self.shared.read();
        self.cached
    }

    pub fn improve(&mut self, candidate: f64) -> bool {
        let stored = self.shared.improve(candidate);
        self.refresh();
        stored
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::SharedBound;

    #[test]
    fn starts_at_infinity() {
        assert_eq!(SharedBound::new().read(), f64::INFINITY);
    }

    #[test]
    fn improve_keeps_the_minimum() {
        let bound = SharedBound::new();
        assert!(bound.improve(12.5));
        assert!(!bound.improve(20.0));
        assert!(!bound.improve(12.5));
        assert!(bound.improve(3.0));
        assert_eq!(bound.read(), 3.0);
    }

    #[test]
    fn improve_ignores_nan_and_infinity() {
        let bound = SharedBound::new();
        assert!(!bound.improve(f64::NAN));
        assert!(!bound.improve(f64::INFINITY));
        assert_eq!(bound.read(), f64::INFINITY);
    }

    #[test]
    fn concurrent_improvements_settle_on_the_global_minimum() {
        let bound = SharedBound::new();
        thread::scope(|s| {
            for worker in 0..8u32 {
                let bound = &bound;
                s.spawn(move || {
                    // Each worker offers a decreasing run that interleaves with the others.
                    for step in (0..500u32).rev() {
                        bound.improve(f64::from(step * 8 + worker) + 1.0);
                    }
                });
            }
        });
        assert_eq!(bound.read(), 1.0);
    }

    #[test]
    fn view_caches_until_refreshed() {
        let bound = SharedBound::with_initial(50.0);
        let mut view = bound.view();
        bound.improve(40.0);
        assert_eq!(view.get(), 50.0);
        assert_eq!(view.refresh(), 40.0);
        assert!(view.improve(30.0));
        assert_eq!(view.get(), 30.0);
        assert_eq!(bound.read(), 30.0);
    }
}
