//! CSV ingestion and normalization for Ride Insights.
//!
//! Reads a trip-log CSV into [`RideRecord`] structs: validates the schema up
//! front, coerces the free-form `Date` column into a calendar date, and
//! drops (never repairs) rows whose date cannot be parsed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use insights_core::dates::parse_date_lenient;
use insights_core::error::{InsightsError, Result};
use insights_core::models::{Dataset, RideRecord};
use tracing::{debug, info, warn};

/// Raw value recorded in the reason columns when no reason applies.
const NOT_AVAILABLE: &str = "not available";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and normalize the trip log at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file)?;
    info!(
        "Loaded {} rides from {} ({} rows dropped)",
        dataset.len(),
        path.display(),
        dataset.rows_dropped
    );
    Ok(dataset)
}

/// Normalize a trip log from any reader (the upload path of the
/// presentation layer hands in a buffer here).
///
/// * Fails with [`InsightsError::Schema`] when a required column is missing,
///   before any row is processed.
/// * Rows whose `Date` value cannot be coerced are dropped and counted in
///   [`Dataset::rows_dropped`]; this is a per-row filtering rule, never a
///   fatal condition.
pub fn read_dataset<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records: Vec<RideRecord> = Vec::new();
    let mut rows_dropped = 0usize;

    for (line, row_result) in reader.records().enumerate() {
        let row = match row_result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping undecodable CSV row {}: {}", line + 2, e);
                rows_dropped += 1;
                continue;
            }
        };

        match map_to_record(&row, &columns) {
            Some(record) => records.push(record),
            None => {
                debug!(
                    "Dropping row {}: unparsable date {:?}",
                    line + 2,
                    field(&row, columns.date)
                );
                rows_dropped += 1;
            }
        }
    }

    if rows_dropped > 0 {
        warn!("Dropped {rows_dropped} rows during normalization");
    }

    Ok(Dataset {
        records,
        rows_dropped,
    })
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Resolved positions of the required columns within the header row.
struct ColumnIndex {
    booking_id: usize,
    date: usize,
    vehicle_type: usize,
    booking_status: usize,
    payment_method: usize,
    booking_value: usize,
    ride_distance: usize,
    ride_duration: usize,
    customer_rating: usize,
    driver_ratings: usize,
    customer_id: usize,
    is_weekend: usize,
    peak_hours: usize,
    day_of_week: usize,
    canceled_by_customer: usize,
    canceled_by_driver: usize,
    incomplete: usize,
    incomplete_reason: usize,
}

impl ColumnIndex {
    /// Locate every required column, failing with the first missing one.
    fn resolve(headers: &StringRecord) -> Result<Self> {
        Ok(Self {
            booking_id: find_column(headers, "Booking_ID")?,
            date: find_column(headers, "Date")?,
            vehicle_type: find_column(headers, "Vehicle_Type")?,
            booking_status: find_column(headers, "Booking_Status")?,
            payment_method: find_column(headers, "Payment_Method")?,
            booking_value: find_column(headers, "Booking_Value")?,
            ride_distance: find_column(headers, "Ride_Distance")?,
            ride_duration: find_column(headers, "Ride_Duration")?,
            customer_rating: find_column(headers, "Customer_Rating")?,
            driver_ratings: find_column(headers, "Driver_Ratings")?,
            customer_id: find_column(headers, "Customer_ID")?,
            is_weekend: find_column(headers, "Is_Weekend")?,
            peak_hours: find_column(headers, "Peak_Hours")?,
            day_of_week: find_column(headers, "Day_Of_Week")?,
            canceled_by_customer: find_column(headers, "Canceled_Rides_by_Customer")?,
            canceled_by_driver: find_column(headers, "Canceled_Rides_by_Driver")?,
            incomplete: find_column(headers, "Incomplete_Rides")?,
            incomplete_reason: find_column(headers, "Incomplete_Rides_Reason")?,
        })
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| InsightsError::Schema {
            column: name.to_string(),
        })
}

// ── Row mapping ───────────────────────────────────────────────────────────────

/// Map a raw CSV row to a [`RideRecord`].
///
/// Returns `None` exactly when the date fails to parse; every other field
/// coerces leniently (missing numerics become `0.0`, missing ratings become
/// `None`).
fn map_to_record(row: &StringRecord, columns: &ColumnIndex) -> Option<RideRecord> {
    let date = parse_date_lenient(field(row, columns.date))?;

    Some(RideRecord {
        booking_id: field(row, columns.booking_id).to_string(),
        date,
        vehicle_type: field(row, columns.vehicle_type).to_string(),
        booking_status: field(row, columns.booking_status).to_string(),
        payment_method: field(row, columns.payment_method).to_string(),
        booking_value: parse_f64_lenient(field(row, columns.booking_value)),
        ride_distance: parse_f64_lenient(field(row, columns.ride_distance)),
        ride_duration: parse_f64_lenient(field(row, columns.ride_duration)),
        customer_rating: parse_rating(field(row, columns.customer_rating)),
        driver_ratings: parse_rating(field(row, columns.driver_ratings)),
        customer_id: field(row, columns.customer_id).to_string(),
        is_weekend: parse_flag(field(row, columns.is_weekend)),
        peak_hours: parse_flag(field(row, columns.peak_hours)),
        day_of_week: field(row, columns.day_of_week).to_string(),
        canceled_by_customer: parse_reason(field(row, columns.canceled_by_customer)),
        canceled_by_driver: parse_reason(field(row, columns.canceled_by_driver)),
        incomplete: parse_flag(field(row, columns.incomplete)),
        incomplete_reason: parse_reason(field(row, columns.incomplete_reason)),
    })
}

/// Fetch a field by index, treating short rows as holding empty strings.
fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

/// Parse a numeric field, treating empty or malformed values as `0.0`.
fn parse_f64_lenient(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(0.0)
}

/// Parse a rating field; absent or non-numeric values are `None`.
fn parse_rating(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("na") {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Parse a boolean-like flag (`1`/`0`, `true`/`false`, `yes`/`no`),
/// defaulting to `false`.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Parse a free-text reason column; empty values and the `"Not Available"`
/// sentinel map to `None`.
fn parse_reason(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_AVAILABLE) {
        None
    } else {
        Some(raw.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
