//! Page load timings from the navigation timing record.

/// Durations in milliseconds since navigation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMetrics {
    pub page_load_ms: u64,
    pub dom_ready_ms: u64,
}

impl LoadMetrics {
    /// Build from raw epoch-millisecond timestamps. `None` while the load
    /// event has not finished (its end time is still zero).
    pub fn from_timing(navigation_start: f64, dom_ready_end: f64, load_end: f64) -> Option<Self> {
        if load_end <= 0.0 || navigation_start <= 0.0 {
            return None;
        }
        let since_start = |t: f64| (t - navigation_start).max(0.0) as u64;
        Some(Self {
            page_load_ms: since_start(load_end),
            dom_ready_ms: since_start(dom_ready_end),
        })
    }

    pub fn log(&self) {
        tracing::info!(
            page_load_ms = self.page_load_ms,
            dom_ready_ms = self.dom_ready_ms,
            "performance metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations_since_navigation_start() {
        let metrics = LoadMetrics::from_timing(1_000.0, 1_450.0, 2_200.0).unwrap();
        assert_eq!(metrics.page_load_ms, 1_200);
        assert_eq!(metrics.dom_ready_ms, 450);
    }

    #[test]
    fn test_unfinished_load_has_no_metrics() {
        assert_eq!(LoadMetrics::from_timing(1_000.0, 1_450.0, 0.0), None);
        assert_eq!(LoadMetrics::from_timing(0.0, 0.0, 0.0), None);
    }

    #[test]
    fn test_missing_dom_ready_clamps_to_zero() {
        let metrics = LoadMetrics::from_timing(1_000.0, 0.0, 1_300.0).unwrap();
        assert_eq!(metrics.dom_ready_ms, 0);
    }
}
