use actix_web::{web, Error, HttpRequest, HttpResponse};
use log::error;
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use crate::db::MongoDB;
use crate::listing::{any_field_matches, cmp_f64, cmp_str_ci, parse_wire, sort_with, ListQuery};
use crate::models::booking::{CreateBookingRequest, UpdateBookingStatusRequest};
use crate::models::{Booking, BookingStatus, TicketSummary};
use crate::reports;
use crate::ticket;

pub async fn create_booking(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    booking_req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = match super::get_user_id_from_token(&req) {
        Some(id) => id,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    if let Err(e) = booking_req.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }

    match db.create_booking(&user_id, &booking_req).await {
        Ok((booking, passengers)) => Ok(HttpResponse::Created()
            .json(json!({ "booking": booking, "passengers": passengers }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn get_user_bookings(
    req: HttpRequest,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, Error> {
    let user_id = match super::get_user_id_from_token(&req) {
        Some(id) => id,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    match db.get_user_bookings(&user_id).await {
        Ok(bookings) => {
            let mut detailed = Vec::new();
            for b in bookings {
                let passengers = match b.id.as_ref() {
                    Some(id) => db.get_passengers(id).await.unwrap_or_default(),
                    None => Vec::new(),
                };
                detailed.push(json!({
                    "id": b.id.map(|id| id.to_hex()),
                    "tripTitle": b.trip_title,
                    "startDate": b.start_date,
                    "contact": b.contact,
                    "busType": b.bus_type,
                    "totalAmount": b.total_amount,
                    "paymentType": b.payment_type,
                    "status": b.status,
                    "bookingDate": b.created_at.to_string(),
                    "passengers": passengers,
                }));
            }
            Ok(HttpResponse::Ok().json(detailed))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn cancel_booking(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let booking_id = path.into_inner();
    let user_id = match super::get_user_id_from_token(&req) {
        Some(id) => id,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    match db.cancel_booking(&booking_id, &user_id).await {
        Ok(_) => Ok(HttpResponse::Ok()
            .json(json!({ "success": true, "message": "Booking cancelled successfully" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

/// Digital ticket for a booking: the summary plus an SVG QR image of it.
pub async fn get_ticket(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let claims = match super::claims_from_request(&req) {
        Some(claims) => claims,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    let booking_id = path.into_inner();
    let booking = match db.get_booking(&booking_id).await {
        Ok(Some(b)) => b,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found" })))
        }
        Err(e) => return Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    };

    if booking.user_id.to_hex() != claims.sub && claims.role != "admin" {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Not your booking" })));
    }

    let passengers = match booking.id.as_ref() {
        Some(id) => db.get_passengers(id).await.unwrap_or_default(),
        None => Vec::new(),
    };

    let summary = TicketSummary {
        booking_id: booking_id.clone(),
        trip_title: booking.trip_title.clone(),
        start_date: booking.start_date.clone(),
        passenger_count: passengers.len(),
        total_amount: booking.total_amount,
        status: booking.status,
    };

    match ticket::ticket_qr_svg(&summary) {
        Ok(qr_svg) => Ok(HttpResponse::Ok().json(json!({
            "ticket": summary,
            "passengers": passengers,
            "qrSvg": qr_svg,
        }))),
        Err(e) => {
            error!("QR rendering failed for booking {}: {}", booking_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "error": "Could not render ticket" })))
        }
    }
}

struct AdminRow {
    booking: Booking,
    customer_name: String,
    customer_email: String,
}

fn shape_rows(rows: &mut Vec<AdminRow>, query: &ListQuery) {
    if let Some(search) = &query.search {
        rows.retain(|r| {
            any_field_matches(
                &[
                    &r.customer_name,
                    &r.customer_email,
                    &r.booking.trip_title,
                    &r.booking.contact,
                ],
                search,
            )
        });
    }
    if let Some(raw) = &query.status {
        let wanted = parse_wire::<BookingStatus>(raw);
        rows.retain(|r| Some(r.booking.status) == wanted);
    }
    match query.sort_by.as_deref() {
        Some("customer") => sort_with(rows, query.order(), |a, b| {
            cmp_str_ci(&a.customer_name, &b.customer_name)
        }),
        Some("trip") => sort_with(rows, query.order(), |a, b| {
            cmp_str_ci(&a.booking.trip_title, &b.booking.trip_title)
        }),
        Some("amount") => sort_with(rows, query.order(), |a, b| {
            cmp_f64(a.booking.total_amount, b.booking.total_amount)
        }),
        Some("start_date") => sort_with(rows, query.order(), |a, b| {
            a.booking.start_date.cmp(&b.booking.start_date)
        }),
        Some("created_at") => sort_with(rows, query.order(), |a, b| {
            a.booking.created_at.cmp(&b.booking.created_at)
        }),
        _ => {}
    }
}

pub async fn admin_list_bookings(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }

    let bookings = match db.list_bookings().await {
        Ok(b) => b,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
            )
        }
    };

    // Attach customer identity so the dashboard can search and sort by it.
    let users = db.list_users().await.unwrap_or_default();
    let by_id: HashMap<String, (String, String)> = users
        .into_iter()
        .filter_map(|u| u.id.map(|id| (id.to_hex(), (u.name, u.email))))
        .collect();

    let mut rows: Vec<AdminRow> = bookings
        .into_iter()
        .map(|booking| {
            let (customer_name, customer_email) = by_id
                .get(&booking.user_id.to_hex())
                .cloned()
                .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
            AdminRow {
                booking,
                customer_name,
                customer_email,
            }
        })
        .collect();

    shape_rows(&mut rows, &query);

    let payload: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|r| {
            json!({
                "id": r.booking.id.map(|id| id.to_hex()),
                "customerName": r.customer_name,
                "customerEmail": r.customer_email,
                "tripTitle": r.booking.trip_title,
                "startDate": r.booking.start_date,
                "contact": r.booking.contact,
                "busType": r.booking.bus_type,
                "totalAmount": r.booking.total_amount,
                "paymentType": r.booking.payment_type,
                "status": r.booking.status,
                "createdAt": r.booking.created_at.to_string(),
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(payload))
}

pub async fn update_booking_status(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    match db.update_booking_status(&path.into_inner(), &payload).await {
        Ok(Some(booking)) => Ok(HttpResponse::Ok().json(booking)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn delete_booking(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    match db.delete_booking(&path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

/// Chart feed for the admin dashboard.
pub async fn booking_report(req: HttpRequest, db: web::Data<MongoDB>) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    match db.list_bookings().await {
        Ok(bookings) => Ok(HttpResponse::Ok().json(reports::summarize(&bookings))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::SortOrder;
    use crate::models::{BusType, PaymentType};
    use mongodb::bson::{self, oid::ObjectId};

    fn row(customer: &str, trip: &str, amount: f64, status: BookingStatus) -> AdminRow {
        AdminRow {
            booking: Booking {
                id: Some(ObjectId::new()),
                user_id: ObjectId::new(),
                trip_id: ObjectId::new(),
                trip_title: trip.to_string(),
                start_date: "2026-10-01".to_string(),
                contact: "0712345678".to_string(),
                bus_type: BusType::Standard,
                total_amount: amount,
                payment_type: PaymentType::Cash,
                status,
                created_at: bson::DateTime::now(),
                updated_at: bson::DateTime::now(),
            },
            customer_name: customer.to_string(),
            customer_email: format!("{}@example.com", customer.to_lowercase()),
        }
    }

    fn customers(rows: &[AdminRow]) -> Vec<&str> {
        rows.iter().map(|r| r.customer_name.as_str()).collect()
    }

    #[test]
    fn unknown_sort_field_preserves_fetched_order() {
        let mut rows = vec![
            row("Fatima", "Umrah Essentials", 1450.0, BookingStatus::Pending),
            row("Amina", "Ziyarat of Iraq", 1150.0, BookingStatus::Confirmed),
            row("Bilal", "Ramadan Umrah Special", 2200.0, BookingStatus::Pending),
        ];
        let query = ListQuery {
            sort_by: Some("contact".to_string()),
            ..ListQuery::default()
        };
        shape_rows(&mut rows, &query);
        assert_eq!(customers(&rows), vec!["Fatima", "Amina", "Bilal"]);
    }

    #[test]
    fn sorting_by_customer_respects_the_order_toggle() {
        let mut rows = vec![
            row("Amina", "Ziyarat of Iraq", 1150.0, BookingStatus::Confirmed),
            row("Fatima", "Umrah Essentials", 1450.0, BookingStatus::Pending),
            row("Bilal", "Ramadan Umrah Special", 2200.0, BookingStatus::Pending),
        ];
        let query = ListQuery {
            sort_by: Some("customer".to_string()),
            order: Some(SortOrder::Desc),
            ..ListQuery::default()
        };
        shape_rows(&mut rows, &query);
        assert_eq!(customers(&rows), vec!["Fatima", "Bilal", "Amina"]);
    }

    #[test]
    fn status_filter_is_an_exact_enum_match() {
        let base = || {
            vec![
                row("Fatima", "Umrah Essentials", 1450.0, BookingStatus::Pending),
                row("Amina", "Ziyarat of Iraq", 1150.0, BookingStatus::Cancelled),
            ]
        };

        let mut rows = base();
        let query = ListQuery {
            status: Some("Cancelled".to_string()),
            ..ListQuery::default()
        };
        shape_rows(&mut rows, &query);
        assert_eq!(customers(&rows), vec!["Amina"]);

        // Not a variant's wire form, so nothing matches.
        let mut rows = base();
        let query = ListQuery {
            status: Some("cancelled".to_string()),
            ..ListQuery::default()
        };
        shape_rows(&mut rows, &query);
        assert!(rows.is_empty());
    }

    #[test]
    fn search_spans_customer_email_trip_and_contact() {
        let mut rows = vec![
            row("Fatima", "Umrah Essentials", 1450.0, BookingStatus::Pending),
            row("Amina", "Ziyarat of Iraq", 1150.0, BookingStatus::Confirmed),
        ];
        let query = ListQuery {
            search: Some("AMINA@EXAMPLE".to_string()),
            ..ListQuery::default()
        };
        shape_rows(&mut rows, &query);
        assert_eq!(customers(&rows), vec!["Amina"]);
    }
}
