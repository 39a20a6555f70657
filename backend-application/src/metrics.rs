use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    scan_requests: AtomicU64,
    scan_events: AtomicU64,
    scan_rejected: AtomicU64,
    scan_failures: AtomicU64,
    dashboard_requests: AtomicU64,
    export_requests: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self) {
        self.scan_requests.fetch_add(1, Ordering::Relaxed);
        self.scan_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_rejected(&self) {
        self.scan_requests.fetch_add(1, Ordering::Relaxed);
        self.scan_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_failure(&self) {
        self.scan_requests.fetch_add(1, Ordering::Relaxed);
        self.scan_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dashboard(&self) {
        self.dashboard_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_export(&self) {
        self.export_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.scan_requests.load(Ordering::Relaxed);
        let events = self.scan_events.load(Ordering::Relaxed);
        let rejected = self.scan_rejected.load(Ordering::Relaxed);
        let failures = self.scan_failures.load(Ordering::Relaxed);
        let dashboards = self.dashboard_requests.load(Ordering::Relaxed);
        let exports = self.export_requests.load(Ordering::Relaxed);

        format!(
            "# TYPE vinqr_scan_requests_total counter\n\
vinqr_scan_requests_total {}\n\
# TYPE vinqr_scan_events_total counter\n\
vinqr_scan_events_total {}\n\
# TYPE vinqr_scan_rejected_total counter\n\
vinqr_scan_rejected_total {}\n\
# TYPE vinqr_scan_failures_total counter\n\
vinqr_scan_failures_total {}\n\
# TYPE vinqr_dashboard_requests_total counter\n\
vinqr_dashboard_requests_total {}\n\
# TYPE vinqr_export_requests_total counter\n\
vinqr_export_requests_total {}\n",
            requests, events, rejected, failures, dashboards, exports
        )
    }
}
