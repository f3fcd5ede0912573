use once_cell::sync::Lazy;
use prometheus::{opts, HistogramOpts, HistogramVec, IntCounterVec, Registry};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()), $labels)
                .unwrap()
        })
    };
}

const LATENCY_BUCKETS: [f64; 10] = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

// ── Validation ──────────────────────────────────────────────────────────────
pub static VALIDATION_REJECTIONS: Lazy<IntCounterVec> = counter_vec!(
    "validation_rejections_total",
    "Request payloads rejected by the validation gate",
    &["entity", "operation"]
);
pub static QUERY_REJECTIONS: Lazy<IntCounterVec> =
    counter_vec!("query_rejections_total", "List queries rejected", &["entity"]);

// ── Media ───────────────────────────────────────────────────────────────────
pub static IMAGE_OPTIMIZATIONS: Lazy<IntCounterVec> =
    counter_vec!("image_optimizations_total", "Images re-encoded", &["format", "outcome"]);
pub static IMAGE_OPTIMIZE_DURATION: Lazy<HistogramVec> = histogram_vec!(
    "image_optimize_duration_seconds",
    "Image re-encode latency",
    &["format"]
);

pub fn register_all(r: &Registry) -> prometheus::Result<()> {
    r.register(Box::new(VALIDATION_REJECTIONS.clone()))?;
    r.register(Box::new(QUERY_REJECTIONS.clone()))?;
    r.register(Box::new(IMAGE_OPTIMIZATIONS.clone()))?;
    r.register(Box::new(IMAGE_OPTIMIZE_DURATION.clone()))?;
    Ok(())
}
