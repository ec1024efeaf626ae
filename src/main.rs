use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{info, warn};

mod db;
mod handlers;
mod listing;
mod models;
mod reports;
mod ticket;

use db::MongoDB;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = std::env::var("DATABASE_NAME").unwrap_or_else(|_| "ziyarah_tours".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let db = MongoDB::new(&uri, &db_name)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    if let Err(e) = db.seed_data().await {
        warn!("Seeding skipped: {}", e);
    }

    info!("Starting ziyarah-tours API on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            // auth + profile
            .route("/api/auth/register", web::post().to(handlers::auth::register))
            .route("/api/auth/login", web::post().to(handlers::auth::login))
            .route("/api/profile", web::get().to(handlers::auth::get_profile))
            .route("/api/profile", web::put().to(handlers::auth::update_profile))
            // public catalogue
            .route("/api/trips", web::get().to(handlers::trips::list_trips))
            .route("/api/trips/{id}", web::get().to(handlers::trips::get_trip))
            .route("/api/vehicles", web::get().to(handlers::vehicles::list_vehicles))
            .route("/api/vehicles/{id}", web::get().to(handlers::vehicles::get_vehicle))
            // customer bookings
            .route("/api/bookings", web::post().to(handlers::bookings::create_booking))
            .route("/api/bookings", web::get().to(handlers::bookings::get_user_bookings))
            .route(
                "/api/bookings/{id}/cancel",
                web::put().to(handlers::bookings::cancel_booking),
            )
            .route(
                "/api/bookings/{id}/ticket",
                web::get().to(handlers::bookings::get_ticket),
            )
            // admin dashboards
            .route("/api/admin/trips", web::get().to(handlers::trips::admin_list_trips))
            .route("/api/admin/trips", web::post().to(handlers::trips::create_trip))
            .route("/api/admin/trips/{id}", web::put().to(handlers::trips::update_trip))
            .route("/api/admin/trips/{id}", web::delete().to(handlers::trips::delete_trip))
            .route(
                "/api/admin/vehicles",
                web::get().to(handlers::vehicles::admin_list_vehicles),
            )
            .route(
                "/api/admin/vehicles",
                web::post().to(handlers::vehicles::create_vehicle),
            )
            .route(
                "/api/admin/vehicles/{id}",
                web::put().to(handlers::vehicles::update_vehicle),
            )
            .route(
                "/api/admin/vehicles/{id}",
                web::delete().to(handlers::vehicles::delete_vehicle),
            )
            .route(
                "/api/admin/bookings",
                web::get().to(handlers::bookings::admin_list_bookings),
            )
            .route(
                "/api/admin/bookings/{id}/status",
                web::put().to(handlers::bookings::update_booking_status),
            )
            .route(
                "/api/admin/bookings/{id}",
                web::delete().to(handlers::bookings::delete_booking),
            )
            .route(
                "/api/admin/reports/bookings",
                web::get().to(handlers::bookings::booking_report),
            )
            // companion admin-user service routes
            .route("/api/admin-users", web::get().to(handlers::admin_users::list_users))
            .route("/api/admin-users", web::post().to(handlers::admin_users::create_user))
            .route(
                "/api/admin-users/{id}",
                web::put().to(handlers::admin_users::update_user),
            )
            .route(
                "/api/admin-users/{id}",
                web::delete().to(handlers::admin_users::delete_user),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
