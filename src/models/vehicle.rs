use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleType {
    Coach,
    Minibus,
    Van,
    Suv,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleStatus {
    Available,
    Booked,
    Maintenance,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Vehicle {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_id_as_hex"
    )]
    pub id: Option<mongodb::bson::oid::ObjectId>,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub seat_count: i32,
    pub registration_number: String,
    pub status: VehicleStatus,
    pub model_year: i32,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

#[derive(Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2))]
    pub name: String,
    pub vehicle_type: VehicleType,
    #[validate(range(min = 1))]
    pub seat_count: i32,
    #[validate(length(min = 4))]
    pub registration_number: String,
    pub status: VehicleStatus,
    #[validate(range(min = 1980, max = 2035))]
    pub model_year: i32,
}

#[derive(Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2))]
    pub name: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    #[validate(range(min = 1))]
    pub seat_count: Option<i32>,
    #[validate(length(min = 4))]
    pub registration_number: Option<String>,
    pub status: Option<VehicleStatus>,
    #[validate(range(min = 1980, max = 2035))]
    pub model_year: Option<i32>,
}
