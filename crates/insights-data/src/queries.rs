//! The canned descriptive query battery run by the report view.
//!
//! Ten fixed queries over the normalized dataset. Where a query overlaps a
//! dashboard metric it calls the same pipeline functions; nothing here
//! re-implements filtering or aggregation.

use insights_core::error::Result;
use insights_core::models::{Dataset, FilterCriteria, FilteredView, RideRecord, SUCCESS_STATUS};

use crate::filter::apply_filters;
use crate::metrics;

/// Booking status recorded for rides the customer cancelled.
pub const CANCELED_BY_CUSTOMER_STATUS: &str = "Canceled by Customer";
/// Driver cancellation reason the report battery singles out.
pub const DRIVER_PERSONAL_REASON: &str = "Personal & Car related issue";
/// Vehicle type the rating-bounds query inspects.
pub const PRIME_SEDAN: &str = "Prime Sedan";

/// 1. All successful bookings.
pub fn successful_bookings(dataset: &Dataset) -> Result<FilteredView> {
    let criteria = FilterCriteria {
        booking_status: Some(SUCCESS_STATUS.to_string()),
        ..Default::default()
    };
    apply_filters(&dataset.records, &criteria)
}

/// 2. Average ride distance for each vehicle type.
pub fn avg_ride_distance_per_vehicle(dataset: &Dataset) -> Vec<(String, f64)> {
    metrics::avg_distance_by_vehicle_type(&dataset.records)
}

/// 3. Total number of rides cancelled by customers.
pub fn rides_cancelled_by_customers(dataset: &Dataset) -> Result<u64> {
    let criteria = FilterCriteria {
        booking_status: Some(CANCELED_BY_CUSTOMER_STATUS.to_string()),
        ..Default::default()
    };
    Ok(apply_filters(&dataset.records, &criteria)?.len() as u64)
}

/// 4. The five customers who booked the most rides.
pub fn top_customers(dataset: &Dataset) -> Vec<(String, u64)> {
    metrics::top_customers_by_rides(&dataset.records, 5)
}

/// 5. Rides cancelled by drivers for the given reason.
pub fn driver_cancellations_with_reason(dataset: &Dataset, reason: &str) -> u64 {
    dataset
        .records
        .iter()
        .filter(|r| r.canceled_by_driver.as_deref() == Some(reason))
        .count() as u64
}

/// 6. `(max, min)` driver rating across Prime Sedan bookings, or `None`
/// when no such booking carries a rating.
pub fn prime_sedan_rating_bounds(dataset: &Dataset) -> Result<Option<(f64, f64)>> {
    let criteria = FilterCriteria {
        vehicle_type: Some(PRIME_SEDAN.to_string()),
        ..Default::default()
    };
    let view = apply_filters(&dataset.records, &criteria)?;

    let mut bounds: Option<(f64, f64)> = None;
    for rating in view.records().iter().filter_map(|r| r.driver_ratings) {
        bounds = Some(match bounds {
            None => (rating, rating),
            Some((max, min)) => (max.max(rating), min.min(rating)),
        });
    }
    Ok(bounds)
}

/// 7. All rides paid through the given method, matched case-insensitively.
pub fn rides_paid_with<'a>(dataset: &'a Dataset, method: &str) -> Vec<&'a RideRecord> {
    dataset
        .records
        .iter()
        .filter(|r| r.payment_method.eq_ignore_ascii_case(method))
        .collect()
}

/// 8. Average customer rating per vehicle type.
pub fn avg_customer_rating_per_vehicle(dataset: &Dataset) -> Vec<(String, f64)> {
    metrics::avg_customer_rating_by_vehicle_type(&dataset.records)
}

/// 9. Total booking value of successfully completed rides.
pub fn total_successful_booking_value(dataset: &Dataset) -> Result<f64> {
    let view = successful_bookings(dataset)?;
    Ok(metrics::total_revenue(view.records()))
}

/// 10. Incomplete rides with their recorded reason.
pub fn incomplete_rides_with_reason(dataset: &Dataset) -> Vec<(String, String)> {
    dataset
        .records
        .iter()
        .filter(|r| r.incomplete)
        .map(|r| {
            (
                r.booking_id.clone(),
                r.incomplete_reason
                    .clone()
                    .unwrap_or_else(|| "Not recorded".to_string()),
            )
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(id: &str, vehicle: &str, status: &str, payment: &str) -> RideRecord {
        RideRecord {
            booking_id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
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

    fn sample_dataset() -> Dataset {
        let mut r1 = make_record("CNR1", "Prime Sedan", "Success", "UPI");
        r1.booking_value = 300.0;
        r1.driver_ratings = Some(4.8);

        let mut r2 = make_record("CNR2", "Auto", "Canceled by Customer", "Cash");
        r2.booking_value = 0.0;
        r2.canceled_by_customer = Some("Change of plans".to_string());

        let mut r3 = make_record("CNR3", "Prime Sedan", "Success", "upi");
        r3.booking_value = 200.0;
        r3.driver_ratings = Some(3.2);

        let mut r4 = make_record("CNR4", "Bike", "Canceled by Driver", "Cash");
        r4.booking_value = 0.0;
        r4.canceled_by_driver = Some(DRIVER_PERSONAL_REASON.to_string());

        let mut r5 = make_record("CNR5", "Auto", "Incomplete", "Cash");
        r5.incomplete = true;
        r5.incomplete_reason = Some("Vehicle Breakdown".to_string());

        Dataset {
            records: vec![r1, r2, r3, r4, r5],
            rows_dropped: 0,
        }
    }

    #[test]
    fn test_successful_bookings() {
        let dataset = sample_dataset();
        let view = successful_bookings(&dataset).unwrap();
        assert_eq!(view.len(), 2);
        assert!(view.records().iter().all(|r| r.is_success()));
    }

    #[test]
    fn test_avg_distance_per_vehicle_covers_all_types() {
        let dataset = sample_dataset();
        let groups = avg_ride_distance_per_vehicle(&dataset);
        assert_eq!(groups.len(), 3); // Prime Sedan, Auto, Bike
    }

    #[test]
    fn test_rides_cancelled_by_customers() {
        let dataset = sample_dataset();
        assert_eq!(rides_cancelled_by_customers(&dataset).unwrap(), 1);
    }

    #[test]
    fn test_top_customers_single_customer() {
        let dataset = sample_dataset();
        let top = top_customers(&dataset);
        assert_eq!(top, vec![("CID1".to_string(), 5)]);
    }

    #[test]
    fn test_driver_cancellations_with_reason() {
        let dataset = sample_dataset();
        assert_eq!(
            driver_cancellations_with_reason(&dataset, DRIVER_PERSONAL_REASON),
            1
        );
        assert_eq!(driver_cancellations_with_reason(&dataset, "Other"), 0);
    }

    #[test]
    fn test_prime_sedan_rating_bounds() {
        let dataset = sample_dataset();
        let (max, min) = prime_sedan_rating_bounds(&dataset).unwrap().unwrap();
        assert!((max - 4.8).abs() < 1e-9);
        assert!((min - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_prime_sedan_rating_bounds_no_ratings() {
        let mut dataset = sample_dataset();
        for record in &mut dataset.records {
            record.driver_ratings = None;
        }
        assert!(prime_sedan_rating_bounds(&dataset).unwrap().is_none());
    }

    #[test]
    fn test_rides_paid_with_is_case_insensitive() {
        let dataset = sample_dataset();
        // "UPI" and "upi" rows both match.
        assert_eq!(rides_paid_with(&dataset, "UPI").len(), 2);
        assert_eq!(rides_paid_with(&dataset, "Upi").len(), 2);
    }

    #[test]
    fn test_avg_customer_rating_per_vehicle() {
        let dataset = sample_dataset();
        let groups = avg_customer_rating_per_vehicle(&dataset);
        assert!(groups.iter().all(|(_, mean)| (*mean - 4.0).abs() < 1e-9));
    }

    #[test]
    fn test_total_successful_booking_value() {
        let dataset = sample_dataset();
        let total = total_successful_booking_value(&dataset).unwrap();
        assert!((total - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_incomplete_rides_with_reason() {
        let dataset = sample_dataset();
        let incomplete = incomplete_rides_with_reason(&dataset);
        assert_eq!(
            incomplete,
            vec![("CNR5".to_string(), "Vehicle Breakdown".to_string())]
        );
    }

    #[test]
    fn test_queries_on_empty_dataset() {
        let dataset = Dataset::default();
        assert!(successful_bookings(&dataset).unwrap().is_empty());
        assert!(avg_ride_distance_per_vehicle(&dataset).is_empty());
        assert_eq!(rides_cancelled_by_customers(&dataset).unwrap(), 0);
        assert!(top_customers(&dataset).is_empty());
        assert!(prime_sedan_rating_bounds(&dataset).unwrap().is_none());
        assert!(rides_paid_with(&dataset, "UPI").is_empty());
        assert_eq!(total_successful_booking_value(&dataset).unwrap(), 0.0);
        assert!(incomplete_rides_with_reason(&dataset).is_empty());
    }
}
