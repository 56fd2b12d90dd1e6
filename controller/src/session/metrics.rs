use std::sync::Mutex;

/// Session-scoped counters reported at teardown.
pub struct SessionMetrics {
    inner: Mutex<Counters>,
}

#[derive(Default)]
struct Counters {
    loads_ok: usize,
    loads_failed: usize,
    labels_shown: usize,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_load_ok(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.loads_ok += 1;
        }
    }

    pub fn record_load_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.loads_failed += 1;
        }
    }

    pub fn record_label(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.labels_shown += 1;
        }
    }

    /// (loads ok, loads failed, labels shown)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(counters) = self.inner.lock() {
            (counters.loads_ok, counters.loads_failed, counters.labels_shown)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
