use serde::Serializer;

pub mod auth;
pub mod booking;
pub mod trip;
pub mod user;
pub mod vehicle;

// Re-export all the models that are used in other modules
pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use booking::{
    Booking, BookingStatus, BusType, CreateBookingRequest, Passenger, PaymentType, TicketSummary,
};
pub use trip::{ItineraryDay, TripPackage, TripStatus};
pub use user::{Claims, User, UserResponse, UserRole, UserStatus};
pub use vehicle::{Vehicle, VehicleStatus, VehicleType};

pub fn serialize_id_as_hex<S>(
    id: &Option<mongodb::bson::oid::ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}
