//! Top-level analysis pipeline for Ride Insights.
//!
//! One pure pass: apply the filter engine, compute the headline summary and
//! the four chart breakdowns, and return an [`AnalysisReport`] ready for the
//! presentation layer.

use chrono::NaiveDate;
use insights_core::error::Result;
use insights_core::models::{Dataset, FilterCriteria, FilteredView};
use tracing::debug;

use crate::filter::apply_filters;
use crate::metrics::{self, MetricSummary, TOP_VEHICLE_TYPES};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside an analysis pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Records in the normalized dataset.
    pub rows_in_dataset: usize,
    /// Rows dropped at ingestion because their date failed to parse.
    pub rows_dropped: usize,
    /// Records remaining after filtering.
    pub rows_in_view: usize,
    /// Wall-clock seconds spent filtering.
    pub filter_time_seconds: f64,
    /// Wall-clock seconds spent computing metrics.
    pub compute_time_seconds: f64,
}

/// The complete output of [`analyze`]: filtered view, headline summary, and
/// the chart breakdowns the dashboard renders.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Records matching the criteria, in dataset order.
    pub view: FilteredView,
    /// The five KPI-card metrics, display-rounded.
    pub summary: MetricSummary,
    /// Ride count per calendar date, ascending.
    pub rides_over_time: Vec<(NaiveDate, u64)>,
    /// Top vehicle types by mean ride distance, descending.
    pub top_vehicle_types: Vec<(String, f64)>,
    /// Ride count per payment method, descending.
    pub payment_share: Vec<(String, u64)>,
    /// Ride count per booking status, descending.
    pub status_breakdown: Vec<(String, u64)>,
    /// Metadata about this pass.
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full filter-and-aggregate cycle.
///
/// Stateless: each invocation is independent given `(dataset, criteria)`,
/// and the dataset is only ever read. Fatal errors (`Validation` from
/// malformed criteria) surface before any computation; an empty filtered
/// view is not an error and degrades per-metric.
pub fn analyze(dataset: &Dataset, criteria: &FilterCriteria) -> Result<AnalysisReport> {
    let filter_start = std::time::Instant::now();
    let view = apply_filters(&dataset.records, criteria)?;
    let filter_time = filter_start.elapsed().as_secs_f64();

    let compute_start = std::time::Instant::now();
    let records = view.records();
    let summary = MetricSummary::compute(records);
    let rides_over_time = metrics::rides_over_time(records);
    let top_vehicle_types = metrics::top_vehicle_types_by_avg_distance(records, TOP_VEHICLE_TYPES);
    let payment_share = metrics::payment_method_share(records);
    let status_breakdown = metrics::booking_status_breakdown(records);
    let compute_time = compute_start.elapsed().as_secs_f64();

    debug!(
        "Analysis pass: {} of {} records in view",
        view.len(),
        dataset.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: chrono::Utc::now().to_rfc3339(),
        rows_in_dataset: dataset.len(),
        rows_dropped: dataset.rows_dropped,
        rows_in_view: view.len(),
        filter_time_seconds: filter_time,
        compute_time_seconds: compute_time,
    };

    Ok(AnalysisReport {
        view,
        summary,
        rides_over_time,
        top_vehicle_types,
        payment_share,
        status_breakdown,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
