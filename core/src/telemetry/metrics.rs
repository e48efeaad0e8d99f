use std::sync::Mutex;

/// Running counters for the fetch lifecycle of one coordinator.
pub struct FetchMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub issued: usize,
    pub loaded: usize,
    pub failed: usize,
    pub stale: usize,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_issued(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.issued += 1;
        }
    }

    pub fn record_loaded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.loaded += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_stale(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stale += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for FetchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FetchMetrics").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = FetchMetrics::new();
        metrics.record_issued();
        metrics.record_issued();
        metrics.record_loaded();
        metrics.record_stale();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                issued: 2,
                loaded: 1,
                failed: 0,
                stale: 1,
            }
        );
    }
}
