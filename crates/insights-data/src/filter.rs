//! The filter engine: turns a dataset plus [`FilterCriteria`] into a
//! [`FilteredView`].
//!
//! All active constraints combine with logical AND; unconstrained criteria
//! produce a full copy of the input. The source records are never mutated.

use insights_core::error::Result;
use insights_core::models::{FilterCriteria, FilteredView, RideRecord};
use tracing::debug;

/// Apply `criteria` to `records`, producing an order-preserving view.
///
/// Criteria are validated first: an inverted date range fails with
/// [`InsightsError::Validation`](insights_core::error::InsightsError::Validation)
/// before any record is examined.
pub fn apply_filters(records: &[RideRecord], criteria: &FilterCriteria) -> Result<FilteredView> {
    criteria.validate()?;

    if criteria.is_unconstrained() {
        return Ok(FilteredView::new(records.to_vec()));
    }

    let matched: Vec<RideRecord> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();

    debug!(
        "Filter pass: {} of {} records matched",
        matched.len(),
        records.len()
    );

    Ok(FilteredView::new(matched))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
