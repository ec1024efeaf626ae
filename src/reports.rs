//! Aggregation of the booking list into the figures the admin dashboard
//! charts: per-status counts and monthly revenue buckets.

use crate::models::{Booking, BookingStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct MonthlyBucket {
    /// `YYYY-MM` key derived from the booking creation time.
    pub month: String,
    pub bookings: usize,
    pub revenue: f64,
}

#[derive(Serialize)]
pub struct BookingReport {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub revenue: f64,
    pub monthly: Vec<MonthlyBucket>,
}

/// Cancelled bookings count toward totals but never toward revenue.
pub fn summarize(bookings: &[Booking]) -> BookingReport {
    let mut pending = 0;
    let mut confirmed = 0;
    let mut cancelled = 0;
    let mut revenue = 0.0;
    let mut months: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => pending += 1,
            BookingStatus::Confirmed => confirmed += 1,
            BookingStatus::Cancelled => cancelled += 1,
        }

        let month = booking.created_at.to_chrono().format("%Y-%m").to_string();
        let bucket = months.entry(month.clone()).or_insert_with(|| MonthlyBucket {
            month,
            bookings: 0,
            revenue: 0.0,
        });
        bucket.bookings += 1;

        if booking.status != BookingStatus::Cancelled {
            revenue += booking.total_amount;
            bucket.revenue += booking.total_amount;
        }
    }

    BookingReport {
        total: bookings.len(),
        pending,
        confirmed,
        cancelled,
        revenue,
        monthly: months.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusType, PaymentType};
    use chrono::TimeZone;
    use mongodb::bson::{self, oid::ObjectId};

    fn booking(status: BookingStatus, amount: f64, year: i32, month: u32) -> Booking {
        let created = chrono::Utc
            .with_ymd_and_hms(year, month, 12, 9, 30, 0)
            .unwrap();
        Booking {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            trip_id: ObjectId::new(),
            trip_title: "Umrah Essentials".to_string(),
            start_date: "2026-10-01".to_string(),
            contact: "0712345678".to_string(),
            bus_type: BusType::Standard,
            total_amount: amount,
            payment_type: PaymentType::Cash,
            status,
            created_at: bson::DateTime::from_chrono(created),
            updated_at: bson::DateTime::from_chrono(created),
        }
    }

    #[test]
    fn counts_every_status() {
        let bookings = vec![
            booking(BookingStatus::Pending, 1000.0, 2026, 1),
            booking(BookingStatus::Confirmed, 2000.0, 2026, 1),
            booking(BookingStatus::Confirmed, 1500.0, 2026, 2),
            booking(BookingStatus::Cancelled, 900.0, 2026, 2),
        ];
        let report = summarize(&bookings);
        assert_eq!(report.total, 4);
        assert_eq!(report.pending, 1);
        assert_eq!(report.confirmed, 2);
        assert_eq!(report.cancelled, 1);
    }

    #[test]
    fn cancelled_bookings_are_excluded_from_revenue() {
        let bookings = vec![
            booking(BookingStatus::Confirmed, 2000.0, 2026, 3),
            booking(BookingStatus::Cancelled, 5000.0, 2026, 3),
        ];
        let report = summarize(&bookings);
        assert_eq!(report.revenue, 2000.0);
        assert_eq!(report.monthly[0].revenue, 2000.0);
        assert_eq!(report.monthly[0].bookings, 2);
    }

    #[test]
    fn revenue_is_bucketed_by_month_in_order() {
        let bookings = vec![
            booking(BookingStatus::Confirmed, 1500.0, 2026, 2),
            booking(BookingStatus::Pending, 1000.0, 2025, 12),
            booking(BookingStatus::Confirmed, 2000.0, 2026, 1),
        ];
        let report = summarize(&bookings);
        let months: Vec<&str> = report.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2025-12", "2026-01", "2026-02"]);
        assert_eq!(report.monthly[1].revenue, 2000.0);
    }

    #[test]
    fn empty_list_produces_empty_report() {
        let report = summarize(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.revenue, 0.0);
        assert!(report.monthly.is_empty());
    }
}
