use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripStatus {
    Active,
    Inactive,
}

/// One day of a package itinerary, kept in day order.
#[derive(Serialize, Deserialize, Clone)]
pub struct ItineraryDay {
    pub day: i32,
    pub highlight: String,
    pub details: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct TripPackage {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_id_as_hex"
    )]
    pub id: Option<mongodb::bson::oid::ObjectId>,
    pub name: String,
    pub destination: String,
    pub duration_days: i32,
    /// Price per passenger seat.
    pub price: f64,
    pub status: TripStatus,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<ItineraryDay>>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

#[derive(Deserialize, Validate)]
pub struct CreateTripRequest {
    #[validate(length(min = 3))]
    pub name: String,
    #[validate(length(min = 3))]
    pub destination: String,
    #[validate(range(min = 1))]
    pub duration_days: i32,
    #[validate(range(min = 0.01))]
    pub price: f64,
    pub status: TripStatus,
    #[serde(default)]
    pub featured: bool,
    pub itinerary: Option<Vec<ItineraryDay>>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateTripRequest {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    #[validate(length(min = 3))]
    pub destination: Option<String>,
    #[validate(range(min = 1))]
    pub duration_days: Option<i32>,
    #[validate(range(min = 0.01))]
    pub price: Option<f64>,
    pub status: Option<TripStatus>,
    pub featured: Option<bool>,
    pub itinerary: Option<Vec<ItineraryDay>>,
}
