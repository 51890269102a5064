//! Metric and aggregation computations over a filtered record set.
//!
//! Every function here is pure, total over possibly-empty input, and
//! re-executed in full whenever the view changes. Empty views degrade to
//! zero / NaN / empty collections rather than raising.

use chrono::NaiveDate;
use indexmap::IndexMap;
use insights_core::formatting::{percentage, round_to};
use insights_core::models::RideRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of groups returned by the top-vehicle-types breakdown.
pub const TOP_VEHICLE_TYPES: usize = 5;

// ── Headline metrics ──────────────────────────────────────────────────────────

/// Count of records in the view.
pub fn total_rides(records: &[RideRecord]) -> u64 {
    records.len() as u64
}

/// Sum of `booking_value` across the view.
pub fn total_revenue(records: &[RideRecord]) -> f64 {
    records.iter().map(|r| r.booking_value).sum()
}

/// Mean ride distance; `NaN` for an empty view.
pub fn avg_ride_distance(records: &[RideRecord]) -> f64 {
    if records.is_empty() {
        return f64::NAN;
    }
    records.iter().map(|r| r.ride_distance).sum::<f64>() / records.len() as f64
}

/// Mean of the customer ratings that are present; `NaN` when none are.
pub fn avg_customer_rating(records: &[RideRecord]) -> f64 {
    let ratings: Vec<f64> = records.iter().filter_map(|r| r.customer_rating).collect();
    if ratings.is_empty() {
        return f64::NAN;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// Share of non-successful bookings as a percentage in `[0, 100]`.
///
/// Counts every record whose status is not the success literal, incomplete
/// rides included. Returns `0.0` for an empty view (guarded division).
pub fn cancellation_rate(records: &[RideRecord]) -> f64 {
    let cancelled = records.iter().filter(|r| !r.is_success()).count();
    percentage(cancelled as f64, records.len() as f64, 1)
}

// ── Grouped breakdowns ────────────────────────────────────────────────────────

/// Ride count per calendar date, ascending by date.
pub fn rides_over_time(records: &[RideRecord]) -> Vec<(NaiveDate, u64)> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.date).or_insert(0) += 1;
    }
    per_day.into_iter().collect()
}

/// Mean ride distance per vehicle type, in group-encounter order.
pub fn avg_distance_by_vehicle_type(records: &[RideRecord]) -> Vec<(String, f64)> {
    group_mean(records, |r| &r.vehicle_type, |r| Some(r.ride_distance))
}

/// The `n` vehicle types with the highest mean ride distance, descending.
///
/// Ties keep their group-encounter order (the sort is stable over the
/// encounter-ordered grouping).
pub fn top_vehicle_types_by_avg_distance(records: &[RideRecord], n: usize) -> Vec<(String, f64)> {
    let mut groups = avg_distance_by_vehicle_type(records);
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    groups.truncate(n);
    groups
}

/// Ride count per payment method, descending by count.
pub fn payment_method_share(records: &[RideRecord]) -> Vec<(String, u64)> {
    sorted_desc(group_count(records, |r| &r.payment_method))
}

/// Ride count per booking status, descending by count.
pub fn booking_status_breakdown(records: &[RideRecord]) -> Vec<(String, u64)> {
    sorted_desc(group_count(records, |r| &r.booking_status))
}

/// Revenue per payment method, descending by revenue.
pub fn revenue_by_payment_method(records: &[RideRecord]) -> Vec<(String, f64)> {
    let mut groups = group_sum(records, |r| &r.payment_method, |r| r.booking_value);
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    groups
}

/// Revenue per day-of-week label, descending by revenue.
pub fn revenue_by_day_of_week(records: &[RideRecord]) -> Vec<(String, f64)> {
    let mut groups = group_sum(records, |r| &r.day_of_week, |r| r.booking_value);
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    groups
}

/// The `n` customers with the most rides, descending by ride count.
pub fn top_customers_by_rides(records: &[RideRecord], n: usize) -> Vec<(String, u64)> {
    let mut groups = sorted_desc(group_count(records, |r| &r.customer_id));
    groups.truncate(n);
    groups
}

/// Mean customer rating per vehicle type, in group-encounter order.
///
/// Groups where no ride carries a rating report `NaN`.
pub fn avg_customer_rating_by_vehicle_type(records: &[RideRecord]) -> Vec<(String, f64)> {
    group_mean(records, |r| &r.vehicle_type, |r| r.customer_rating)
}

/// `(weekday, weekend)` ride counts.
pub fn weekend_split(records: &[RideRecord]) -> (u64, u64) {
    let weekend = records.iter().filter(|r| r.is_weekend).count() as u64;
    (records.len() as u64 - weekend, weekend)
}

/// `(off_peak, peak)` ride counts.
pub fn peak_split(records: &[RideRecord]) -> (u64, u64) {
    let peak = records.iter().filter(|r| r.peak_hours).count() as u64;
    (records.len() as u64 - peak, peak)
}

// ── Metric summary ────────────────────────────────────────────────────────────

/// The five headline metrics with display rounding applied, as shown on the
/// dashboard's KPI cards and the summary view.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    /// Count of records in the view.
    pub total_rides: u64,
    /// Revenue rounded to 2 decimal places.
    pub total_revenue: f64,
    /// Mean distance rounded to 2 decimal places; `NaN` for an empty view.
    pub avg_ride_distance: f64,
    /// Mean customer rating rounded to 2 decimal places; `NaN` when absent.
    pub avg_customer_rating: f64,
    /// Cancellation rate in percent, rounded to 1 decimal place.
    pub cancellation_rate_pct: f64,
}

impl MetricSummary {
    /// Compute the summary over `records`.
    pub fn compute(records: &[RideRecord]) -> Self {
        Self {
            total_rides: total_rides(records),
            total_revenue: round_to(total_revenue(records), 2),
            avg_ride_distance: round_to(avg_ride_distance(records), 2),
            avg_customer_rating: round_to(avg_customer_rating(records), 2),
            cancellation_rate_pct: cancellation_rate(records),
        }
    }
}

// ── Grouping helpers ──────────────────────────────────────────────────────────

/// Count records per key, in group-encounter order.
fn group_count<'a>(
    records: &'a [RideRecord],
    key_fn: impl Fn(&'a RideRecord) -> &'a str,
) -> Vec<(String, u64)> {
    let mut groups: IndexMap<&str, u64> = IndexMap::new();
    for record in records {
        *groups.entry(key_fn(record)).or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Sum `value_fn` per key, in group-encounter order.
fn group_sum<'a>(
    records: &'a [RideRecord],
    key_fn: impl Fn(&'a RideRecord) -> &'a str,
    value_fn: impl Fn(&RideRecord) -> f64,
) -> Vec<(String, f64)> {
    let mut groups: IndexMap<&str, f64> = IndexMap::new();
    for record in records {
        *groups.entry(key_fn(record)).or_insert(0.0) += value_fn(record);
    }
    groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Mean of the present `value_fn` values per key, in group-encounter order.
///
/// A group whose rides all lack the value reports `NaN` (it still appears:
/// absence of ratings is information, not an empty group).
fn group_mean<'a>(
    records: &'a [RideRecord],
    key_fn: impl Fn(&'a RideRecord) -> &'a str,
    value_fn: impl Fn(&RideRecord) -> Option<f64>,
) -> Vec<(String, f64)> {
    let mut groups: IndexMap<&str, (f64, u64)> = IndexMap::new();
    for record in records {
        let entry = groups.entry(key_fn(record)).or_insert((0.0, 0));
        if let Some(value) = value_fn(record) {
            entry.0 += value;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(k, (sum, count))| {
            let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
            (k.to_string(), mean)
        })
        .collect()
}

/// Stable descending sort by count; ties keep encounter order.
fn sorted_desc(mut groups: Vec<(String, u64)>) -> Vec<(String, u64)> {
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(date: &str, vehicle: &str, status: &str, payment: &str) -> RideRecord {
        RideRecord {
            booking_id: format!("CNR-{date}-{vehicle}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            vehicle_type: vehicle.to_string(),
            booking_status: status.to_string(),
            payment_method: payment.to_string(),
            booking_value: 100.0,
            ride_distance: 10.0,
            ride_duration: 20.0,
            customer_rating: Some(4.0),
            driver_ratings: Some(4.0),
            customer_id: "CID1".to_string(),
            is_weekend: false,
            peak_hours: false,
            day_of_week: "Monday".to_string(),
            canceled_by_customer: None,
            canceled_by_driver: None,
            incomplete: false,
            incomplete_reason: None,
        }
    }

    // ── Headline metrics ─────────────────────────────────────────────────────

    #[test]
    fn test_headline_metrics_known_dataset() {
        // Three rows: two successes, one customer cancellation.
        let mut r1 = make_record("2024-01-01", "Auto", "Success", "Cash");
        r1.booking_value = 100.0;
        let mut r2 = make_record("2024-01-02", "Auto", "Canceled by Customer", "Cash");
        r2.booking_value = 0.0;
        let mut r3 = make_record("2024-01-03", "Auto", "Success", "Cash");
        r3.booking_value = 200.0;
        let records = vec![r1, r2, r3];

        assert_eq!(total_rides(&records), 3);
        assert!((total_revenue(&records) - 300.0).abs() < 1e-9);
        let rate = cancellation_rate(&records);
        assert!((rate - 33.3).abs() < 1e-9, "rate = {rate}");
    }

    #[test]
    fn test_empty_view_degrades_gracefully() {
        let records: Vec<RideRecord> = vec![];
        assert_eq!(total_rides(&records), 0);
        assert_eq!(total_revenue(&records), 0.0);
        assert!(avg_ride_distance(&records).is_nan());
        assert!(avg_customer_rating(&records).is_nan());
        assert_eq!(cancellation_rate(&records), 0.0);
        assert!(rides_over_time(&records).is_empty());
        assert!(top_vehicle_types_by_avg_distance(&records, 5).is_empty());
        assert!(payment_method_share(&records).is_empty());
        assert!(booking_status_breakdown(&records).is_empty());
    }

    #[test]
    fn test_avg_ride_distance() {
        let mut r1 = make_record("2024-01-01", "Auto", "Success", "Cash");
        r1.ride_distance = 5.0;
        let mut r2 = make_record("2024-01-02", "Auto", "Success", "Cash");
        r2.ride_distance = 15.0;
        assert!((avg_ride_distance(&[r1, r2]) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_customer_rating_skips_missing() {
        let mut r1 = make_record("2024-01-01", "Auto", "Success", "Cash");
        r1.customer_rating = Some(5.0);
        let mut r2 = make_record("2024-01-02", "Auto", "Success", "Cash");
        r2.customer_rating = None;
        let mut r3 = make_record("2024-01-03", "Auto", "Success", "Cash");
        r3.customer_rating = Some(3.0);

        // Mean over the two present ratings, not three records.
        assert!((avg_customer_rating(&[r1, r2, r3]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancellation_rate_bounds() {
        let all_cancelled: Vec<RideRecord> = (1..=4)
            .map(|d| {
                make_record(
                    &format!("2024-01-0{d}"),
                    "Auto",
                    "Canceled by Driver",
                    "Cash",
                )
            })
            .collect();
        assert_eq!(cancellation_rate(&all_cancelled), 100.0);

        let all_success: Vec<RideRecord> = (1..=4)
            .map(|d| make_record(&format!("2024-01-0{d}"), "Auto", "Success", "Cash"))
            .collect();
        assert_eq!(cancellation_rate(&all_success), 0.0);
    }

    #[test]
    fn test_incomplete_counts_toward_cancellation() {
        let success = make_record("2024-01-01", "Auto", "Success", "Cash");
        let incomplete = make_record("2024-01-02", "Auto", "Incomplete", "Cash");
        let rate = cancellation_rate(&[success, incomplete]);
        assert!((rate - 50.0).abs() < 1e-9);
    }

    // ── rides_over_time ──────────────────────────────────────────────────────

    #[test]
    fn test_rides_over_time_ascending() {
        let records = vec![
            make_record("2024-01-20", "Auto", "Success", "Cash"),
            make_record("2024-01-10", "Auto", "Success", "Cash"),
            make_record("2024-01-20", "Auto", "Success", "Cash"),
            make_record("2024-01-15", "Auto", "Success", "Cash"),
        ];
        let series = rides_over_time(&records);
        let days: Vec<u32> = series.iter().map(|(d, _)| chrono::Datelike::day(d)).collect();
        assert_eq!(days, vec![10, 15, 20]);
        assert_eq!(series[2].1, 2);
    }

    // ── Top vehicle types ────────────────────────────────────────────────────

    #[test]
    fn test_top_vehicle_types_seven_groups_returns_five() {
        // Seven distinct types with strictly distinct mean distances.
        let mut records = Vec::new();
        for (i, vehicle) in [
            "Auto",
            "Bike",
            "eBike",
            "Mini",
            "Prime Sedan",
            "Prime SUV",
            "Prime Plus",
        ]
        .iter()
        .enumerate()
        {
            let mut r = make_record("2024-01-01", vehicle, "Success", "Cash");
            r.ride_distance = (i as f64 + 1.0) * 5.0;
            records.push(r);
        }

        let top = top_vehicle_types_by_avg_distance(&records, TOP_VEHICLE_TYPES);
        assert_eq!(top.len(), 5);
        // Strictly descending.
        for pair in top.windows(2) {
            assert!(pair[0].1 > pair[1].1);
        }
        assert_eq!(top[0].0, "Prime Plus");
    }

    #[test]
    fn test_top_vehicle_types_ties_keep_encounter_order() {
        let mut a = make_record("2024-01-01", "Mini", "Success", "Cash");
        a.ride_distance = 10.0;
        let mut b = make_record("2024-01-02", "Auto", "Success", "Cash");
        b.ride_distance = 10.0;
        let mut c = make_record("2024-01-03", "Bike", "Success", "Cash");
        c.ride_distance = 20.0;

        let top = top_vehicle_types_by_avg_distance(&[a, b, c], 3);
        assert_eq!(top[0].0, "Bike");
        // Mini was encountered before Auto; the tie preserves that.
        assert_eq!(top[1].0, "Mini");
        assert_eq!(top[2].0, "Auto");
    }

    #[test]
    fn test_top_vehicle_types_fewer_groups_than_n() {
        let records = vec![make_record("2024-01-01", "Auto", "Success", "Cash")];
        let top = top_vehicle_types_by_avg_distance(&records, 5);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_avg_distance_by_vehicle_means() {
        let mut a = make_record("2024-01-01", "Auto", "Success", "Cash");
        a.ride_distance = 4.0;
        let mut b = make_record("2024-01-02", "Auto", "Success", "Cash");
        b.ride_distance = 8.0;
        let mut c = make_record("2024-01-03", "Bike", "Success", "Cash");
        c.ride_distance = 3.0;

        let groups = avg_distance_by_vehicle_type(&[a, b, c]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Auto");
        assert!((groups[0].1 - 6.0).abs() < 1e-9);
        assert!((groups[1].1 - 3.0).abs() < 1e-9);
    }

    // ── Share breakdowns ─────────────────────────────────────────────────────

    #[test]
    fn test_payment_method_share_descending() {
        let records = vec![
            make_record("2024-01-01", "Auto", "Success", "Cash"),
            make_record("2024-01-02", "Auto", "Success", "UPI"),
            make_record("2024-01-03", "Auto", "Success", "UPI"),
            make_record("2024-01-04", "Auto", "Success", "Card"),
            make_record("2024-01-05", "Auto", "Success", "UPI"),
        ];
        let share = payment_method_share(&records);
        assert_eq!(share[0], ("UPI".to_string(), 3));
        assert_eq!(share[1], ("Cash".to_string(), 1));
        assert_eq!(share[2], ("Card".to_string(), 1));
    }

    #[test]
    fn test_booking_status_breakdown_descending() {
        let records = vec![
            make_record("2024-01-01", "Auto", "Success", "Cash"),
            make_record("2024-01-02", "Auto", "Canceled by Driver", "Cash"),
            make_record("2024-01-03", "Auto", "Success", "Cash"),
        ];
        let breakdown = booking_status_breakdown(&records);
        assert_eq!(breakdown[0], ("Success".to_string(), 2));
        assert_eq!(breakdown[1], ("Canceled by Driver".to_string(), 1));
    }

    #[test]
    fn test_revenue_by_payment_method() {
        let mut upi = make_record("2024-01-01", "Auto", "Success", "UPI");
        upi.booking_value = 50.0;
        let mut cash1 = make_record("2024-01-02", "Auto", "Success", "Cash");
        cash1.booking_value = 40.0;
        let mut cash2 = make_record("2024-01-03", "Auto", "Success", "Cash");
        cash2.booking_value = 30.0;

        let revenue = revenue_by_payment_method(&[upi, cash1, cash2]);
        assert_eq!(revenue[0].0, "Cash");
        assert!((revenue[0].1 - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_customers_by_rides() {
        let mut records = Vec::new();
        for (customer, rides) in [("CID1", 3), ("CID2", 1), ("CID3", 2)] {
            for d in 1..=rides {
                let mut r = make_record(&format!("2024-01-0{d}"), "Auto", "Success", "Cash");
                r.customer_id = customer.to_string();
                records.push(r);
            }
        }
        let top = top_customers_by_rides(&records, 2);
        assert_eq!(top, vec![("CID1".to_string(), 3), ("CID3".to_string(), 2)]);
    }

    #[test]
    fn test_avg_rating_by_vehicle_all_missing_is_nan() {
        let mut r = make_record("2024-01-01", "Auto", "Canceled by Driver", "Cash");
        r.customer_rating = None;
        let groups = avg_customer_rating_by_vehicle_type(&[r]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].1.is_nan());
    }

    #[test]
    fn test_weekend_and_peak_splits() {
        let mut weekend = make_record("2024-01-06", "Auto", "Success", "Cash");
        weekend.is_weekend = true;
        let mut peak = make_record("2024-01-08", "Auto", "Success", "Cash");
        peak.peak_hours = true;
        let plain = make_record("2024-01-09", "Auto", "Success", "Cash");
        let records = vec![weekend, peak, plain];

        assert_eq!(weekend_split(&records), (2, 1));
        assert_eq!(peak_split(&records), (2, 1));
    }

    // ── MetricSummary ────────────────────────────────────────────────────────

    #[test]
    fn test_summary_known_dataset() {
        let mut r1 = make_record("2024-01-01", "Auto", "Success", "Cash");
        r1.booking_value = 100.0;
        let mut r2 = make_record("2024-01-02", "Auto", "Canceled by Customer", "Cash");
        r2.booking_value = 0.0;
        let mut r3 = make_record("2024-01-03", "Auto", "Success", "Cash");
        r3.booking_value = 200.0;

        let summary = MetricSummary::compute(&[r1, r2, r3]);
        assert_eq!(summary.total_rides, 3);
        assert!((summary.total_revenue - 300.0).abs() < 1e-9);
        assert!((summary.cancellation_rate_pct - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_view() {
        let summary = MetricSummary::compute(&[]);
        assert_eq!(summary.total_rides, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert!(summary.avg_ride_distance.is_nan());
        assert!(summary.avg_customer_rating.is_nan());
        assert_eq!(summary.cancellation_rate_pct, 0.0);
    }

    #[test]
    fn test_summary_rounding() {
        let mut r1 = make_record("2024-01-01", "Auto", "Success", "Cash");
        r1.ride_distance = 10.005;
        r1.booking_value = 33.333;
        let summary = MetricSummary::compute(&[r1]);
        assert!((summary.avg_ride_distance - 10.01).abs() < 1e-9);
        assert!((summary.total_revenue - 33.33).abs() < 1e-9);
    }

    #[test]
    fn test_total_rides_equals_view_length() {
        let records: Vec<RideRecord> = (1..=9)
            .map(|d| make_record(&format!("2024-01-0{d}"), "Auto", "Success", "Cash"))
            .collect();
        assert_eq!(total_rides(&records), records.len() as u64);
    }
}
