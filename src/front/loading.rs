use log::debug;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Counts requests in flight so a single spinner covers concurrent calls.
///
/// The spinner is shown when the first request starts and hidden when the
/// last one finishes.
#[derive(Debug, Default, Clone)]
pub struct LoadingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight() > 0
    }

    /// Marks a request as started, it ends when the guard is dropped.
    pub fn start(&self) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            debug!("loading indicator shown");
        }

        LoadingGuard {
            in_flight: self.in_flight.clone(),
        }
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            debug!("loading indicator hidden");
        }
    }
}
