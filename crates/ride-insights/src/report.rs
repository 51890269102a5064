//! Plain-text report and summary output.
//!
//! The report view prints the fixed ten-query battery plus the descriptive
//! breakdowns straight to stdout; everything is computed by the data layer's
//! pipeline functions, never re-derived here.

use std::io::Write;

use insights_core::formatting::{format_mean, format_number, format_percent, format_revenue};
use insights_core::models::Dataset;
use insights_data::analysis::AnalysisReport;
use insights_data::metrics;
use insights_data::queries;

/// Write the full descriptive report for `dataset` to `out`.
pub fn write_report<W: Write>(out: &mut W, dataset: &Dataset) -> anyhow::Result<()> {
    writeln!(out, "========== RIDE INSIGHTS REPORT ==========")?;
    writeln!(out)?;
    writeln!(
        out,
        "Dataset: {} rides ({} rows dropped during normalization)",
        format_number(dataset.len() as f64, 0),
        dataset.rows_dropped
    )?;
    writeln!(out)?;

    // ── Query battery ─────────────────────────────────────────────────────────

    let successful = queries::successful_bookings(dataset)?;
    writeln!(
        out,
        "1. Successful bookings: {}",
        format_number(successful.len() as f64, 0)
    )?;

    writeln!(out, "2. Average ride distance per vehicle type:")?;
    for (vehicle, mean) in queries::avg_ride_distance_per_vehicle(dataset) {
        writeln!(out, "     {vehicle}: {}", format_mean(mean))?;
    }

    writeln!(
        out,
        "3. Rides cancelled by customers: {}",
        queries::rides_cancelled_by_customers(dataset)?
    )?;

    writeln!(out, "4. Top 5 customers by ride count:")?;
    for (customer, rides) in queries::top_customers(dataset) {
        writeln!(out, "     {customer}: {rides}")?;
    }

    writeln!(
        out,
        "5. Driver cancellations ({}): {}",
        queries::DRIVER_PERSONAL_REASON,
        queries::driver_cancellations_with_reason(dataset, queries::DRIVER_PERSONAL_REASON)
    )?;

    match queries::prime_sedan_rating_bounds(dataset)? {
        Some((max, min)) => writeln!(
            out,
            "6. Prime Sedan driver ratings: max {max:.1}, min {min:.1}"
        )?,
        None => writeln!(out, "6. Prime Sedan driver ratings: none recorded")?,
    }

    writeln!(
        out,
        "7. Rides paid with UPI: {}",
        queries::rides_paid_with(dataset, "UPI").len()
    )?;

    writeln!(out, "8. Average customer rating per vehicle type:")?;
    for (vehicle, mean) in queries::avg_customer_rating_per_vehicle(dataset) {
        writeln!(out, "     {vehicle}: {}", format_mean(mean))?;
    }

    writeln!(
        out,
        "9. Total booking value of successful rides: {}",
        format_revenue(queries::total_successful_booking_value(dataset)?)
    )?;

    let incomplete = queries::incomplete_rides_with_reason(dataset);
    writeln!(out, "10. Incomplete rides: {}", incomplete.len())?;
    for (booking_id, reason) in incomplete.iter().take(5) {
        writeln!(out, "     {booking_id}: {reason}")?;
    }

    // ── Descriptive breakdowns ────────────────────────────────────────────────

    writeln!(out)?;
    writeln!(out, "---------- Breakdowns ----------")?;

    writeln!(out, "Revenue by payment method:")?;
    for (method, revenue) in metrics::revenue_by_payment_method(&dataset.records) {
        writeln!(out, "     {method}: {}", format_revenue(revenue))?;
    }

    writeln!(out, "Revenue by day of week:")?;
    for (day, revenue) in metrics::revenue_by_day_of_week(&dataset.records) {
        writeln!(out, "     {day}: {}", format_revenue(revenue))?;
    }

    let (weekday, weekend) = metrics::weekend_split(&dataset.records);
    writeln!(out, "Weekday vs weekend rides: {weekday} / {weekend}")?;

    let (off_peak, peak) = metrics::peak_split(&dataset.records);
    writeln!(out, "Off-peak vs peak rides: {off_peak} / {peak}")?;

    Ok(())
}

/// Write the KPI summary of an analysis pass to `out`.
pub fn write_summary<W: Write>(out: &mut W, report: &AnalysisReport) -> anyhow::Result<()> {
    let summary = &report.summary;
    writeln!(out, "========== RIDE INSIGHTS SUMMARY ==========")?;
    writeln!(
        out,
        "Rows in view: {} of {} ({} dropped at ingestion)",
        report.metadata.rows_in_view,
        report.metadata.rows_in_dataset,
        report.metadata.rows_dropped
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Total Rides:        {}",
        format_number(summary.total_rides as f64, 0)
    )?;
    writeln!(
        out,
        "Total Revenue:      {}",
        format_revenue(summary.total_revenue)
    )?;
    writeln!(
        out,
        "Avg Ride Distance:  {}",
        format_mean(summary.avg_ride_distance)
    )?;
    writeln!(
        out,
        "Avg Rating:         {}",
        format_mean(summary.avg_customer_rating)
    )?;
    writeln!(
        out,
        "Cancellation Rate:  {}",
        format_percent(summary.cancellation_rate_pct)
    )?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
