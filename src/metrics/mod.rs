//! Prometheus metrics for pipeline runs and collaborators
//!
//! This module tracks:
//! - Pipeline runs by outcome (done, degraded, aborted)
//! - Enrichment fallbacks by source (sentiment, market_data)
//! - Collaborator call duration
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails or never happens, metrics operations are no-ops.

use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::EnrichmentSource;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all pipeline metrics
struct PipelineMetrics {
    runs: CounterVec,
    fallbacks: CounterVec,
    collaborator_duration: HistogramVec,
    last_mean_impact: Gauge,
}

/// Global storage for pipeline metrics
static PIPELINE_METRICS: OnceLock<PipelineMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once; only the first call registers anything.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = ipolens::metrics::init_metrics() {
///     eprintln!("Warning: Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = PipelineMetrics {
        runs: register_counter_vec!(
            "ipolens_pipeline_runs_total",
            "Total pipeline runs by outcome",
            &["outcome"]
        )?,
        fallbacks: register_counter_vec!(
            "ipolens_enrichment_fallbacks_total",
            "Total enrichments replaced by their fallback default",
            &["source"]
        )?,
        collaborator_duration: register_histogram_vec!(
            "ipolens_collaborator_duration_seconds",
            "Collaborator call duration in seconds",
            &["collaborator"],
            vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 120.0, 300.0]
        )?,
        last_mean_impact: register_gauge!(
            "ipolens_last_mean_impact",
            "Mean impact score of the most recent completed run"
        )?,
    };

    PIPELINE_METRICS
        .set(metrics)
        .map_err(|_| "Pipeline metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    PIPELINE_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record a finished pipeline run (`done`, `degraded` or `aborted`)
pub fn record_run(outcome: &str) {
    if let Some(m) = PIPELINE_METRICS.get() {
        m.runs.with_label_values(&[outcome]).inc();
    }
}

/// Record the mean impact of a completed run
pub fn record_mean_impact(mean_impact: f64) {
    if let Some(m) = PIPELINE_METRICS.get() {
        m.last_mean_impact.set(mean_impact);
    }
}

/// Record an enrichment that fell back to its default
pub fn record_fallback(source: EnrichmentSource) {
    if let Some(m) = PIPELINE_METRICS.get() {
        m.fallbacks.with_label_values(&[source.as_str()]).inc();
    }
}

/// Record how long a collaborator call took
pub fn observe_collaborator(collaborator: &str, elapsed: Duration) {
    if let Some(m) = PIPELINE_METRICS.get() {
        m.collaborator_duration
            .with_label_values(&[collaborator])
            .observe(elapsed.as_secs_f64());
    }
}

// ============================================================================
// Tests
// ============================================================================
