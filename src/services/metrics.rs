//! Metrics collection and Prometheus integration service.

use crate::utils::build_info::{BUILD_TIMESTAMP, GIT_SHA, VERSION};
use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub signature_verifications_total: CounterVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector with default Prometheus metrics
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ]),
            &["method", "route"],
        )?;

        // Verification decisions by outcome: forwarded, missing_header, invalid_signature
        let signature_verifications_total = CounterVec::new(
            Opts::new(
                "signature_verifications_total",
                "Request signature verification decisions",
            ),
            &["outcome"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(signature_verifications_total.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;

        app_info
            .with_label_values(&[VERSION, GIT_SHA, BUILD_TIMESTAMP])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            signature_verifications_total,
            app_uptime_seconds,
            app_info,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Count one verification decision
    pub fn record_verification(&self, outcome: &str) {
        self.signature_verifications_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Current count for a verification outcome
    pub fn verification_count(&self, outcome: &str) -> u64 {
        self.signature_verifications_total
            .with_label_values(&[outcome])
            .get() as u64
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Render metrics in Prometheus text format. Uptime is refreshed first so
    /// every scrape reports the current value.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        self.update_uptime();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_verification() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_verification("forwarded");
        metrics.record_verification("forwarded");
        metrics.record_verification("invalid_signature");

        assert_eq!(metrics.verification_count("forwarded"), 2);
        assert_eq!(metrics.verification_count("invalid_signature"), 1);
        assert_eq!(metrics.verification_count("missing_header"), 0);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("signature_verifications_total{outcome=\"forwarded\"} 2"));
    }

    #[test]
    fn test_uptime_current_on_first_render() {
        let metrics = AppMetrics::new().unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let rendered = metrics.render().unwrap();
        let uptime: f64 = rendered
            .lines()
            .find_map(|line| line.strip_prefix("app_uptime_seconds "))
            .unwrap()
            .parse()
            .unwrap();
        assert!(uptime >= 0.02, "uptime was {uptime}");
    }

    #[test]
    fn test_metrics_endpoint_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(1));
        metrics.record_request("GET", "/api/health", 200, Duration::from_millis(1));

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("route=\"/api/health\""));
        assert!(!rendered.contains("route=\"/api/metrics\""));
    }
}
