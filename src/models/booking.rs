use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusType {
    Standard,
    Executive,
    Vip,
}

impl BusType {
    pub fn fare_multiplier(&self) -> f64 {
        match self {
            BusType::Standard => 1.0,
            BusType::Executive => 1.25,
            BusType::Vip => 1.5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentType {
    Cash,
    Card,
    BankTransfer,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Booking {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_id_as_hex"
    )]
    pub id: Option<mongodb::bson::oid::ObjectId>,
    pub user_id: mongodb::bson::oid::ObjectId,
    pub trip_id: mongodb::bson::oid::ObjectId,
    pub trip_title: String,
    pub start_date: String,
    pub contact: String,
    pub bus_type: BusType,
    pub total_amount: f64,
    pub payment_type: PaymentType,
    pub status: BookingStatus,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Passenger {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_id_as_hex"
    )]
    pub id: Option<mongodb::bson::oid::ObjectId>,
    pub booking_id: mongodb::bson::oid::ObjectId,
    pub name: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Validate)]
pub struct PassengerInput {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(range(min = 1, max = 120))]
    pub age: i32,
    pub national_id: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub trip_id: String,
    #[validate(length(min = 1))]
    pub start_date: String,
    #[validate(length(min = 10))]
    pub contact: String,
    pub bus_type: BusType,
    pub payment_type: PaymentType,
    #[validate]
    #[validate(length(min = 1, max = 6))]
    pub passengers: Vec<PassengerInput>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// The small JSON summary encoded into the ticket QR image. Visual
/// confirmation only, never verified anywhere.
#[derive(Serialize, Deserialize, Clone)]
pub struct TicketSummary {
    pub booking_id: String,
    pub trip_title: String,
    pub start_date: String,
    pub passenger_count: usize,
    pub total_amount: f64,
    pub status: BookingStatus,
}

/// Fare is per-seat price scaled by the bus class, times the passenger
/// count, rounded to cents.
pub fn compute_fare(price_per_seat: f64, bus_type: BusType, passenger_count: usize) -> f64 {
    let total = price_per_seat * bus_type.fare_multiplier() * passenger_count as f64;
    (total * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn passenger(name: &str) -> PassengerInput {
        PassengerInput {
            name: name.to_string(),
            age: 30,
            national_id: None,
        }
    }

    fn booking_request(passengers: Vec<PassengerInput>, contact: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            trip_id: "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            start_date: "2026-10-01".to_string(),
            contact: contact.to_string(),
            bus_type: BusType::Standard,
            payment_type: PaymentType::Cash,
            passengers,
        }
    }

    #[test]
    fn fare_scales_with_passenger_count() {
        assert_eq!(compute_fare(1200.0, BusType::Standard, 1), 1200.0);
        assert_eq!(compute_fare(1200.0, BusType::Standard, 4), 4800.0);
    }

    #[test]
    fn fare_applies_bus_class_multiplier() {
        assert_eq!(compute_fare(1000.0, BusType::Executive, 2), 2500.0);
        assert_eq!(compute_fare(1000.0, BusType::Vip, 2), 3000.0);
    }

    #[test]
    fn fare_rounds_to_cents() {
        assert_eq!(compute_fare(999.99, BusType::Executive, 3), 3749.96);
    }

    #[test]
    fn short_contact_is_rejected() {
        let req = booking_request(vec![passenger("Amina Yusuf")], "071234567");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("contact"));
    }

    #[test]
    fn ten_digit_contact_is_accepted() {
        let req = booking_request(vec![passenger("Amina Yusuf")], "0712345678");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_passenger_list_is_rejected() {
        let req = booking_request(vec![], "0712345678");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("passengers"));
    }

    #[test]
    fn seventh_passenger_is_rejected() {
        let seven = (0..7).map(|i| passenger(&format!("Pilgrim {i}"))).collect();
        let req = booking_request(seven, "0712345678");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("passengers"));
    }

    #[test]
    fn six_passengers_is_the_allowed_maximum() {
        let six = (0..6).map(|i| passenger(&format!("Pilgrim {i}"))).collect();
        assert!(booking_request(six, "0712345678").validate().is_ok());
    }

    #[test]
    fn invalid_passenger_fails_the_whole_request() {
        let mut p = passenger("Amina Yusuf");
        p.age = 0;
        let req = booking_request(vec![p], "0712345678");
        assert!(req.validate().is_err());

        let req = booking_request(vec![passenger("A")], "0712345678");
        assert!(req.validate().is_err());
    }

    #[test]
    fn passenger_age_must_be_in_range() {
        let mut p = passenger("Amina Yusuf");
        p.age = 0;
        assert!(p.validate().is_err());
        p.age = 121;
        assert!(p.validate().is_err());
        p.age = 64;
        assert!(p.validate().is_ok());
    }
}
