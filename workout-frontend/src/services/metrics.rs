use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Duration;
use workout_core::webhooks::CallObserver;
use workout_core::WebhookAction;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static WEBHOOK_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static WEBHOOK_CALL_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Registers every collector. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;

    let request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;

    let webhook_calls = IntCounterVec::new(
        Opts::new("webhook_calls_total", "Total number of webhook calls"),
        &["action", "outcome"],
    )?;

    // generation can take up to a minute
    let webhook_duration = HistogramVec::new(
        HistogramOpts::new(
            "webhook_call_duration_seconds",
            "Webhook call duration in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0]),
        &["action"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(webhook_calls.clone()))?;
    registry.register(Box::new(webhook_duration.clone()))?;

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = WEBHOOK_CALLS_TOTAL.set(webhook_calls);
    let _ = WEBHOOK_CALL_DURATION_SECONDS.set(webhook_duration);

    Ok(())
}

/// Text exposition of every registered metric; empty before `init_metrics`.
pub fn get_metrics() -> Result<String, prometheus::Error> {
    let Some(registry) = REGISTRY.get() else {
        return Ok(String::new());
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn record_http_request(method: &str, path: &str, status: &str, elapsed: Duration) {
    let labels = [method, path, status];
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&labels).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64());
    }
}

/// Feeds webhook call outcomes into the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookMetrics;

impl CallObserver for WebhookMetrics {
    fn record(&self, action: WebhookAction, outcome: &'static str, elapsed: Duration) {
        if let Some(counter) = WEBHOOK_CALLS_TOTAL.get() {
            counter
                .with_label_values(&[action.as_str(), outcome])
                .inc();
        }
        if let Some(histogram) = WEBHOOK_CALL_DURATION_SECONDS.get() {
            histogram
                .with_label_values(&[action.as_str()])
                .observe(elapsed.as_secs_f64());
        }
    }
}
