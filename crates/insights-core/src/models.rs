use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The canonical booking status literal of a completed ride. Every other
/// status (customer/driver cancellations, incomplete rides) counts toward
/// the cancellation rate.
pub const SUCCESS_STATUS: &str = "Success";

/// One normalized row of the trip log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    /// Opaque booking identifier, e.g. `"CNR5884300"`.
    pub booking_id: String,
    /// Calendar date of the ride. Always valid after normalization.
    pub date: NaiveDate,
    /// Vehicle category, e.g. `"Prime Sedan"`, `"Auto"`.
    pub vehicle_type: String,
    /// Outcome of the booking, e.g. `"Success"`, `"Canceled by Customer"`.
    pub booking_status: String,
    /// Payment channel, e.g. `"UPI"`, `"Cash"`.
    pub payment_method: String,
    /// Currency amount charged for the ride.
    pub booking_value: f64,
    /// Distance travelled.
    pub ride_distance: f64,
    /// Ride duration in the dataset's time units.
    pub ride_duration: f64,
    /// Customer's rating of the ride, absent for unrated rides.
    pub customer_rating: Option<f64>,
    /// Driver's rating of the ride, absent for unrated rides.
    pub driver_ratings: Option<f64>,
    /// Opaque customer identifier.
    pub customer_id: String,
    /// Precomputed weekend flag.
    pub is_weekend: bool,
    /// Precomputed peak-hours flag.
    pub peak_hours: bool,
    /// Day-of-week label, e.g. `"Monday"`.
    pub day_of_week: String,
    /// Customer cancellation reason; `None` when not cancelled by the
    /// customer (the raw `"Not Available"` sentinel maps here).
    pub canceled_by_customer: Option<String>,
    /// Driver cancellation reason; `None` when not cancelled by the driver.
    pub canceled_by_driver: Option<String>,
    /// Whether the ride started but did not complete.
    pub incomplete: bool,
    /// Reason the ride was incomplete, when recorded.
    pub incomplete_reason: Option<String>,
}

impl RideRecord {
    /// Whether this booking completed successfully.
    pub fn is_success(&self) -> bool {
        self.booking_status == SUCCESS_STATUS
    }
}

/// The full normalized trip log for one analysis session.
///
/// Invariant: every record carries a valid `date`; rows whose date could not
/// be coerced were dropped during normalization and are counted in
/// `rows_dropped`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Normalized records in original file order.
    pub records: Vec<RideRecord>,
    /// Number of raw rows discarded because their date failed to parse.
    pub rows_dropped: usize,
}

impl Dataset {
    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest ride dates, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Distinct values of a categorical column, in first-encounter order.
    pub fn distinct_values(&self, field: impl Fn(&RideRecord) -> &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in &self.records {
            let value = field(record);
            if !seen.iter().any(|v| v == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }
}

// ── Filter criteria ───────────────────────────────────────────────────────────

/// An inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub start: NaiveDate,
    /// Inclusive upper bound.
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, without validating the bound order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User-selected constraints over the dataset.
///
/// `None` on any dimension means "no constraint". The presentation layer's
/// `"All"` choice is mapped to `None` before criteria reach the engine, so a
/// category literally named "All" can never collide with the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive date interval, or unconstrained.
    pub date_range: Option<DateRange>,
    /// Exact vehicle-type match, or unconstrained.
    pub vehicle_type: Option<String>,
    /// Exact booking-status match, or unconstrained.
    pub booking_status: Option<String>,
    /// Exact payment-method match, or unconstrained.
    pub payment_method: Option<String>,
}

impl FilterCriteria {
    /// Criteria with no active constraints.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Whether no dimension carries an active constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.date_range.is_none()
            && self.vehicle_type.is_none()
            && self.booking_status.is_none()
            && self.payment_method.is_none()
    }

    /// Check the criteria for internal consistency.
    ///
    /// Fails with [`InsightsError::Validation`] when the date range's lower
    /// bound exceeds its upper bound.
    pub fn validate(&self) -> crate::error::Result<()> {
        if let Some(range) = &self.date_range {
            if range.start > range.end {
                return Err(crate::error::InsightsError::Validation(format!(
                    "date range start {} is after end {}",
                    range.start, range.end
                )));
            }
        }
        Ok(())
    }

    /// Whether `record` satisfies every active constraint.
    pub fn matches(&self, record: &RideRecord) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }
        if let Some(vehicle) = &self.vehicle_type {
            if record.vehicle_type != *vehicle {
                return false;
            }
        }
        if let Some(status) = &self.booking_status {
            if record.booking_status != *status {
                return false;
            }
        }
        if let Some(payment) = &self.payment_method {
            if record.payment_method != *payment {
                return false;
            }
        }
        true
    }
}

// ── Filtered view ─────────────────────────────────────────────────────────────

/// A read-only subset of a dataset produced by applying [`FilterCriteria`].
///
/// Owns copies of the matching records in their original order; recomputed
/// whenever criteria change and never mutates the source dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    records: Vec<RideRecord>,
}

impl FilteredView {
    /// Wrap an already-filtered record list.
    pub fn new(records: Vec<RideRecord>) -> Self {
        Self { records }
    }

    /// The records in this view, in original dataset order.
    pub fn records(&self) -> &[RideRecord] {
        &self.records
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the view holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
