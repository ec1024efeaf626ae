use log::{error, info, warn};
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    Client, Collection, Cursor,
};

use futures::StreamExt;

use crate::models::booking::{CreateBookingRequest, UpdateBookingStatusRequest};
use crate::models::trip::{CreateTripRequest, UpdateTripRequest};
use crate::models::user::{AdminCreateUserRequest, AdminUpdateUserRequest, UpdateProfileRequest};
use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{
    booking, AuthResponse, Booking, BookingStatus, Claims, ItineraryDay, LoginRequest, Passenger,
    RegisterRequest, TripPackage, TripStatus, User, UserResponse, UserRole, UserStatus, Vehicle,
    VehicleStatus, VehicleType,
};

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db_name: String,
}

fn issue_token(user_id: &str, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now() + chrono::Duration::hours(24);
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_ref()),
    )
}

async fn collect_all<T>(mut cursor: Cursor<T>) -> Result<Vec<T>, mongodb::error::Error>
where
    T: serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    let mut items = Vec::new();
    while let Some(item) = cursor.next().await {
        items.push(item?);
    }
    Ok(items)
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let client_options = mongodb::options::ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        Ok(MongoDB {
            client,
            db_name: db_name.to_string(),
        })
    }

    fn get_users_collection(&self) -> Collection<User> {
        self.client.database(&self.db_name).collection("users")
    }

    fn get_trips_collection(&self) -> Collection<TripPackage> {
        self.client
            .database(&self.db_name)
            .collection("trip_packages")
    }

    fn get_vehicles_collection(&self) -> Collection<Vehicle> {
        self.client.database(&self.db_name).collection("vehicles")
    }

    fn get_bookings_collection(&self) -> Collection<Booking> {
        self.client.database(&self.db_name).collection("bookings")
    }

    fn get_passengers_collection(&self) -> Collection<Passenger> {
        self.client.database(&self.db_name).collection("passengers")
    }

    pub fn string_to_id(&self, id: &str) -> Result<ObjectId, mongodb::error::Error> {
        ObjectId::parse_str(id).map_err(|e| {
            mongodb::error::Error::from(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                e.to_string(),
            ))
        })
    }

    // ---- users / auth ----

    pub async fn create_user(
        &self,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, Box<dyn std::error::Error>> {
        let collection = self.get_users_collection();

        let existing = collection
            .find_one(doc! { "email": &req.email }, None)
            .await?;
        if existing.is_some() {
            return Err("User already exists".into());
        }

        let hashed_password = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
        let user = User {
            id: None,
            name: req.name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            password: hashed_password,
            role: UserRole::Customer,
            status: UserStatus::Active,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };

        let result = collection.insert_one(&user, None).await?;
        let user_id = result
            .inserted_id
            .as_object_id()
            .ok_or("Inserted user has no ID")?;

        let token = issue_token(&user_id.to_hex(), user.role.as_str())?;
        info!("Registered new customer account for {}", user.email);

        let mut created = user;
        created.id = Some(user_id);
        Ok(AuthResponse {
            token,
            user: UserResponse::from(created),
        })
    }

    pub async fn authenticate_user(
        &self,
        credentials: &LoginRequest,
    ) -> Result<AuthResponse, Box<dyn std::error::Error>> {
        let collection = self.get_users_collection();

        let user = collection
            .find_one(doc! { "email": &credentials.email }, None)
            .await?
            .ok_or("Invalid credentials")?;

        if !bcrypt::verify(&credentials.password, &user.password).map_err(|e| {
            error!("Bcrypt verification error: {}", e);
            e
        })? {
            warn!("Invalid password attempt for email: {}", credentials.email);
            return Err("Invalid credentials".into());
        }

        if user.status == UserStatus::Inactive {
            warn!("Login attempt for inactive account: {}", credentials.email);
            return Err("Account is inactive".into());
        }

        let user_id = user.id.ok_or_else(|| {
            error!(
                "User document found for {} but missing ID",
                credentials.email
            );
            "User ID not found"
        })?;

        let token = issue_token(&user_id.to_hex(), user.role.as_str())?;
        info!("User {} authenticated successfully", user.email);

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        self.get_users_collection()
            .find_one(doc! { "_id": object_id }, None)
            .await
    }

    pub async fn update_profile(
        &self,
        id: &str,
        req: &UpdateProfileRequest,
    ) -> Result<Option<User>, Box<dyn std::error::Error>> {
        let object_id = self.string_to_id(id)?;
        let mut set = Document::new();
        if let Some(name) = &req.name {
            set.insert("name", name);
        }
        if let Some(phone) = &req.phone {
            set.insert("phone", phone);
        }
        if !set.is_empty() {
            set.insert("updated_at", bson::DateTime::now());
            self.get_users_collection()
                .update_one(doc! { "_id": object_id }, doc! { "$set": set }, None)
                .await?;
        }
        Ok(self.get_user(id).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, mongodb::error::Error> {
        let cursor = self.get_users_collection().find(None, None).await?;
        collect_all(cursor).await
    }

    pub async fn admin_create_user(
        &self,
        req: &AdminCreateUserRequest,
    ) -> Result<User, Box<dyn std::error::Error>> {
        let collection = self.get_users_collection();

        let existing = collection
            .find_one(doc! { "email": &req.email }, None)
            .await?;
        if existing.is_some() {
            return Err("User already exists".into());
        }

        let hashed_password = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
        let user = User {
            id: None,
            name: req.name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            password: hashed_password,
            role: req.role,
            status: req.status,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };

        let result = collection.insert_one(&user, None).await?;
        let mut created = user;
        created.id = result.inserted_id.as_object_id();
        info!("Admin created account for {}", created.email);
        Ok(created)
    }

    pub async fn admin_update_user(
        &self,
        id: &str,
        req: &AdminUpdateUserRequest,
    ) -> Result<Option<User>, Box<dyn std::error::Error>> {
        let object_id = self.string_to_id(id)?;
        let mut set = Document::new();
        if let Some(name) = &req.name {
            set.insert("name", name);
        }
        if let Some(phone) = &req.phone {
            set.insert("phone", phone);
        }
        if let Some(role) = &req.role {
            set.insert("role", bson::to_bson(role)?);
        }
        if let Some(status) = &req.status {
            set.insert("status", bson::to_bson(status)?);
        }
        if !set.is_empty() {
            set.insert("updated_at", bson::DateTime::now());
            self.get_users_collection()
                .update_one(doc! { "_id": object_id }, doc! { "$set": set }, None)
                .await?;
        }
        Ok(self.get_user(id).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        let result = self
            .get_users_collection()
            .delete_one(doc! { "_id": object_id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    // ---- trip packages ----

    pub async fn list_trips(&self) -> Result<Vec<TripPackage>, mongodb::error::Error> {
        let cursor = self.get_trips_collection().find(None, None).await?;
        collect_all(cursor).await
    }

    pub async fn get_trip(&self, id: &str) -> Result<Option<TripPackage>, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        self.get_trips_collection()
            .find_one(doc! { "_id": object_id }, None)
            .await
    }

    pub async fn create_trip(
        &self,
        req: &CreateTripRequest,
    ) -> Result<TripPackage, Box<dyn std::error::Error>> {
        let trip = TripPackage {
            id: None,
            name: req.name.clone(),
            destination: req.destination.clone(),
            duration_days: req.duration_days,
            price: req.price,
            status: req.status,
            featured: req.featured,
            itinerary: req.itinerary.clone(),
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };
        let result = self.get_trips_collection().insert_one(&trip, None).await?;
        let mut created = trip;
        created.id = result.inserted_id.as_object_id();
        Ok(created)
    }

    pub async fn update_trip(
        &self,
        id: &str,
        req: &UpdateTripRequest,
    ) -> Result<Option<TripPackage>, Box<dyn std::error::Error>> {
        let object_id = self.string_to_id(id)?;
        let mut set = Document::new();
        if let Some(name) = &req.name {
            set.insert("name", name);
        }
        if let Some(destination) = &req.destination {
            set.insert("destination", destination);
        }
        if let Some(duration_days) = req.duration_days {
            set.insert("duration_days", duration_days);
        }
        if let Some(price) = req.price {
            set.insert("price", price);
        }
        if let Some(status) = &req.status {
            set.insert("status", bson::to_bson(status)?);
        }
        if let Some(featured) = req.featured {
            set.insert("featured", featured);
        }
        if let Some(itinerary) = &req.itinerary {
            set.insert("itinerary", bson::to_bson(itinerary)?);
        }
        if !set.is_empty() {
            set.insert("updated_at", bson::DateTime::now());
            self.get_trips_collection()
                .update_one(doc! { "_id": object_id }, doc! { "$set": set }, None)
                .await?;
        }
        Ok(self.get_trip(id).await?)
    }

    pub async fn delete_trip(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        let result = self
            .get_trips_collection()
            .delete_one(doc! { "_id": object_id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    // ---- vehicles ----

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, mongodb::error::Error> {
        let cursor = self.get_vehicles_collection().find(None, None).await?;
        collect_all(cursor).await
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        self.get_vehicles_collection()
            .find_one(doc! { "_id": object_id }, None)
            .await
    }

    pub async fn create_vehicle(
        &self,
        req: &CreateVehicleRequest,
    ) -> Result<Vehicle, Box<dyn std::error::Error>> {
        let vehicle = Vehicle {
            id: None,
            name: req.name.clone(),
            vehicle_type: req.vehicle_type,
            seat_count: req.seat_count,
            registration_number: req.registration_number.clone(),
            status: req.status,
            model_year: req.model_year,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };
        let result = self
            .get_vehicles_collection()
            .insert_one(&vehicle, None)
            .await?;
        let mut created = vehicle;
        created.id = result.inserted_id.as_object_id();
        Ok(created)
    }

    pub async fn update_vehicle(
        &self,
        id: &str,
        req: &UpdateVehicleRequest,
    ) -> Result<Option<Vehicle>, Box<dyn std::error::Error>> {
        let object_id = self.string_to_id(id)?;
        let mut set = Document::new();
        if let Some(name) = &req.name {
            set.insert("name", name);
        }
        if let Some(vehicle_type) = &req.vehicle_type {
            set.insert("vehicle_type", bson::to_bson(vehicle_type)?);
        }
        if let Some(seat_count) = req.seat_count {
            set.insert("seat_count", seat_count);
        }
        if let Some(registration_number) = &req.registration_number {
            set.insert("registration_number", registration_number);
        }
        if let Some(status) = &req.status {
            set.insert("status", bson::to_bson(status)?);
        }
        if let Some(model_year) = req.model_year {
            set.insert("model_year", model_year);
        }
        if !set.is_empty() {
            set.insert("updated_at", bson::DateTime::now());
            self.get_vehicles_collection()
                .update_one(doc! { "_id": object_id }, doc! { "$set": set }, None)
                .await?;
        }
        Ok(self.get_vehicle(id).await?)
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        let result = self
            .get_vehicles_collection()
            .delete_one(doc! { "_id": object_id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    // ---- bookings ----

    pub async fn create_booking(
        &self,
        user_id: &str,
        req: &CreateBookingRequest,
    ) -> Result<(Booking, Vec<Passenger>), Box<dyn std::error::Error>> {
        let user_oid = self.string_to_id(user_id)?;
        let trip_oid = self.string_to_id(&req.trip_id)?;

        let trip = self
            .get_trip(&req.trip_id)
            .await?
            .ok_or("Trip package not found")?;
        if trip.status != TripStatus::Active {
            return Err("Trip package is not open for booking".into());
        }

        let total_amount = booking::compute_fare(trip.price, req.bus_type, req.passengers.len());

        let booking = Booking {
            id: None,
            user_id: user_oid,
            trip_id: trip_oid,
            trip_title: trip.name.clone(),
            start_date: req.start_date.clone(),
            contact: req.contact.clone(),
            bus_type: req.bus_type,
            total_amount,
            payment_type: req.payment_type,
            status: BookingStatus::Pending,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };

        let result = self
            .get_bookings_collection()
            .insert_one(&booking, None)
            .await?;
        let booking_id = result
            .inserted_id
            .as_object_id()
            .ok_or("Inserted booking has no ID")?;
        let mut created = booking;
        created.id = Some(booking_id);

        // Passenger rows are written one by one after the booking row; a
        // failure part-way leaves the earlier writes in place.
        let passenger_coll = self.get_passengers_collection();
        let mut passengers = Vec::new();
        for input in &req.passengers {
            let passenger = Passenger {
                id: None,
                booking_id,
                name: input.name.clone(),
                age: input.age,
                national_id: input.national_id.clone(),
            };
            let inserted = passenger_coll.insert_one(&passenger, None).await?;
            let mut saved = passenger;
            saved.id = inserted.inserted_id.as_object_id();
            passengers.push(saved);
        }

        info!(
            "Booking {} created for trip '{}' with {} passenger(s)",
            booking_id.to_hex(),
            created.trip_title,
            passengers.len()
        );
        Ok((created, passengers))
    }

    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        self.get_bookings_collection()
            .find_one(doc! { "_id": object_id }, None)
            .await
    }

    pub async fn get_passengers(
        &self,
        booking_id: &ObjectId,
    ) -> Result<Vec<Passenger>, mongodb::error::Error> {
        let cursor = self
            .get_passengers_collection()
            .find(doc! { "booking_id": booking_id }, None)
            .await?;
        collect_all(cursor).await
    }

    pub async fn get_user_bookings(
        &self,
        user_id: &str,
    ) -> Result<Vec<Booking>, mongodb::error::Error> {
        let user_oid = self.string_to_id(user_id)?;
        let cursor = self
            .get_bookings_collection()
            .find(doc! { "user_id": user_oid }, None)
            .await?;
        collect_all(cursor).await
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>, mongodb::error::Error> {
        let cursor = self.get_bookings_collection().find(None, None).await?;
        collect_all(cursor).await
    }

    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        user_id: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let booking_oid = self.string_to_id(booking_id)?;
        let user_oid = self.string_to_id(user_id)?;
        let collection = self.get_bookings_collection();

        let booking = collection
            .find_one(doc! { "_id": booking_oid, "user_id": user_oid }, None)
            .await?
            .ok_or("Booking not found")?;

        // Cancelling twice is a no-op.
        if booking.status == BookingStatus::Cancelled {
            return Ok(());
        }

        collection
            .update_one(
                doc! { "_id": booking_oid },
                doc! { "$set": { "status": "Cancelled", "updated_at": bson::DateTime::now() } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn update_booking_status(
        &self,
        id: &str,
        req: &UpdateBookingStatusRequest,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error>> {
        let object_id = self.string_to_id(id)?;
        self.get_bookings_collection()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "status": bson::to_bson(&req.status)?,
                    "updated_at": bson::DateTime::now(),
                } },
                None,
            )
            .await?;
        Ok(self.get_booking(id).await?)
    }

    pub async fn delete_booking(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let object_id = self.string_to_id(id)?;
        self.get_passengers_collection()
            .delete_many(doc! { "booking_id": object_id }, None)
            .await?;
        let result = self
            .get_bookings_collection()
            .delete_one(doc! { "_id": object_id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    // ---- seed ----

    pub async fn seed_data(&self) -> Result<(), Box<dyn std::error::Error>> {
        let force_seed = std::env::var("FORCE_SEED").unwrap_or_else(|_| "false".to_string()) == "true";

        let trips = self.get_trips_collection();
        let vehicles = self.get_vehicles_collection();

        if force_seed {
            info!("Force seeding enabled. Clearing trip_packages and vehicles collections...");
            trips.delete_many(doc! {}, None).await?;
            vehicles.delete_many(doc! {}, None).await?;
        }

        if trips.count_documents(None, None).await? == 0 {
            info!("Seeding trip packages...");
            let sample_trips = vec![
                TripPackage {
                    id: None,
                    name: "Umrah Essentials".to_string(),
                    destination: "Makkah & Madinah".to_string(),
                    duration_days: 10,
                    price: 1450.0,
                    status: TripStatus::Active,
                    featured: true,
                    itinerary: Some(vec![
                        ItineraryDay {
                            day: 1,
                            highlight: "Arrival in Jeddah".to_string(),
                            details: "Airport pickup and transfer to the Makkah hotel."
                                .to_string(),
                        },
                        ItineraryDay {
                            day: 2,
                            highlight: "Umrah rites".to_string(),
                            details: "Guided tawaf and sa'i with the group leader.".to_string(),
                        },
                        ItineraryDay {
                            day: 6,
                            highlight: "Travel to Madinah".to_string(),
                            details: "Coach transfer and check-in near the Haram.".to_string(),
                        },
                    ]),
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                TripPackage {
                    id: None,
                    name: "Ramadan Umrah Special".to_string(),
                    destination: "Makkah & Madinah".to_string(),
                    duration_days: 14,
                    price: 2200.0,
                    status: TripStatus::Active,
                    featured: true,
                    itinerary: None,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                TripPackage {
                    id: None,
                    name: "Ziyarat of Iraq".to_string(),
                    destination: "Karbala & Najaf".to_string(),
                    duration_days: 8,
                    price: 1150.0,
                    status: TripStatus::Active,
                    featured: false,
                    itinerary: None,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                TripPackage {
                    id: None,
                    name: "Masjid al-Aqsa Heritage Tour".to_string(),
                    destination: "Jerusalem".to_string(),
                    duration_days: 6,
                    price: 1600.0,
                    status: TripStatus::Inactive,
                    featured: false,
                    itinerary: None,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
            ];
            for trip in &sample_trips {
                trips.insert_one(trip, None).await?;
            }
            info!("Seeded {} trip packages", sample_trips.len());
        }

        if vehicles.count_documents(None, None).await? == 0 {
            info!("Seeding vehicles...");
            let sample_vehicles = vec![
                Vehicle {
                    id: None,
                    name: "Al-Safa Coach".to_string(),
                    vehicle_type: VehicleType::Coach,
                    seat_count: 49,
                    registration_number: "KDA 456B".to_string(),
                    status: VehicleStatus::Available,
                    model_year: 2022,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                Vehicle {
                    id: None,
                    name: "Marwah Express".to_string(),
                    vehicle_type: VehicleType::Coach,
                    seat_count: 44,
                    registration_number: "KCH 123A".to_string(),
                    status: VehicleStatus::Booked,
                    model_year: 2020,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                Vehicle {
                    id: None,
                    name: "Zamzam Shuttle".to_string(),
                    vehicle_type: VehicleType::Minibus,
                    seat_count: 14,
                    registration_number: "KDG 234H".to_string(),
                    status: VehicleStatus::Available,
                    model_year: 2023,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
                Vehicle {
                    id: None,
                    name: "Haramain Van".to_string(),
                    vehicle_type: VehicleType::Van,
                    seat_count: 8,
                    registration_number: "KDE 678F".to_string(),
                    status: VehicleStatus::Maintenance,
                    model_year: 2019,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                },
            ];
            for vehicle in &sample_vehicles {
                vehicles.insert_one(vehicle, None).await?;
            }
            info!("Seeded {} vehicles", sample_vehicles.len());
        }

        Ok(())
    }
}
