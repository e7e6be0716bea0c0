//! In-flight request indicator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts HTTP calls currently in flight.
///
/// The indicator is active while at least one call is running. Each call
/// holds a [`LoadingGuard`], so overlapping calls cannot switch it off early
/// and a failed or timed-out call still releases it.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    /// Creates an inactive indicator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one call as started until the returned guard is dropped
    #[must_use = "the call is only counted while the guard is alive"]
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// True while any call is in flight
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of calls in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Releases one in-flight slot on drop.
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_calls_keep_indicator_active() {
        let indicator = LoadingIndicator::new();
        assert!(!indicator.is_active());

        let first = indicator.begin();
        let second = indicator.clone().begin();
        assert_eq!(indicator.in_flight(), 2);

        drop(first);
        assert!(indicator.is_active());

        drop(second);
        assert!(!indicator.is_active());
    }
}
