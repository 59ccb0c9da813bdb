//! End-of-list detection

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked with `true` whenever the trailing edge is approached
pub type EndReachedCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Forwards the renderer's end-approached signal to the caller
///
/// Every signal is forwarded; debouncing repeated signals is up to the
/// renderer (or an [`EndApproachGate`](crate::list::EndApproachGate)).
/// Without a callback the signal is dropped.
#[derive(Default)]
pub struct EndReachedDetector {
    callback: Option<EndReachedCallback>,
    signals: AtomicU64,
}

impl std::fmt::Debug for EndReachedDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndReachedDetector")
            .field("has_callback", &self.callback.is_some())
            .field("signals", &self.signal_count())
            .finish()
    }
}

impl EndReachedDetector {
    pub fn new(callback: Option<EndReachedCallback>) -> Self {
        Self {
            callback,
            signals: AtomicU64::new(0),
        }
    }

    /// Handle one end-approached signal from the renderer
    pub fn on_end_approached(&self) {
        let seen = self.signals.fetch_add(1, Ordering::Relaxed) + 1;
        match &self.callback {
            Some(callback) => {
                tracing::debug!(signal = seen, "end of list reached");
                callback(true);
            }
            None => tracing::trace!(signal = seen, "end reached without callback, dropping"),
        }
    }

    /// Number of signals received, forwarded or not
    pub fn signal_count(&self) -> u64 {
        self.signals.load(Ordering::Relaxed)
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_forwards_true_once_per_signal() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        let detector = EndReachedDetector::new(Some(Arc::new(move |reached: bool| {
            calls_clone.lock().unwrap().push(reached);
        })));

        detector.on_end_approached();
        assert_eq!(*calls.lock().unwrap(), vec![true]);

        // Rapid repeats are not deduplicated here
        detector.on_end_approached();
        detector.on_end_approached();
        assert_eq!(*calls.lock().unwrap(), vec![true, true, true]);
        assert_eq!(detector.signal_count(), 3);
    }

    #[test]
    fn test_missing_callback_drops_signal() {
        let detector = EndReachedDetector::new(None);
        assert!(!detector.has_callback());

        detector.on_end_approached();
        assert_eq!(detector.signal_count(), 1);
    }
}
