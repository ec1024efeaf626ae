use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::db::MongoDB;
use crate::listing::{any_field_matches, cmp_f64, cmp_str_ci, parse_wire, sort_with, ListQuery};
use crate::models::trip::{CreateTripRequest, UpdateTripRequest};
use crate::models::{TripPackage, TripStatus};

#[derive(Deserialize)]
pub struct BrowseQuery {
    pub featured: Option<bool>,
}

/// Public catalogue: only Active packages, optionally just the featured ones.
pub async fn list_trips(
    db: web::Data<MongoDB>,
    query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, Error> {
    match db.list_trips().await {
        Ok(trips) => {
            let trips: Vec<TripPackage> = trips
                .into_iter()
                .filter(|t| t.status == TripStatus::Active)
                .filter(|t| query.featured != Some(true) || t.featured)
                .collect();
            Ok(HttpResponse::Ok().json(trips))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn get_trip(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, Error> {
    match db.get_trip(&path.into_inner()).await {
        Ok(Some(trip)) => Ok(HttpResponse::Ok().json(trip)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Trip package not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

fn shape_trips(trips: &mut Vec<TripPackage>, query: &ListQuery) {
    if let Some(search) = &query.search {
        trips.retain(|t| any_field_matches(&[&t.name, &t.destination], search));
    }
    if let Some(raw) = &query.status {
        let wanted = parse_wire::<TripStatus>(raw);
        trips.retain(|t| Some(t.status) == wanted);
    }
    match query.sort_by.as_deref() {
        Some("name") => sort_with(trips, query.order(), |a, b| cmp_str_ci(&a.name, &b.name)),
        Some("destination") => sort_with(trips, query.order(), |a, b| {
            cmp_str_ci(&a.destination, &b.destination)
        }),
        Some("price") => sort_with(trips, query.order(), |a, b| cmp_f64(a.price, b.price)),
        Some("duration") => sort_with(trips, query.order(), |a, b| {
            a.duration_days.cmp(&b.duration_days)
        }),
        Some("created_at") => sort_with(trips, query.order(), |a, b| {
            a.created_at.cmp(&b.created_at)
        }),
        // Unknown sort field leaves the fetched order unchanged.
        _ => {}
    }
}

pub async fn admin_list_trips(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }

    match db.list_trips().await {
        Ok(mut trips) => {
            shape_trips(&mut trips, &query);
            Ok(HttpResponse::Ok().json(trips))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn create_trip(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    payload: web::Json<CreateTripRequest>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.create_trip(&payload).await {
        Ok(trip) => Ok(HttpResponse::Created().json(trip)),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn update_trip(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    payload: web::Json<UpdateTripRequest>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.update_trip(&path.into_inner(), &payload).await {
        Ok(Some(trip)) => Ok(HttpResponse::Ok().json(trip)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Trip package not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn delete_trip(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    match db.delete_trip(&path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({ "error": "Trip package not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn trip(name: &str, price: f64, status: TripStatus) -> TripPackage {
        TripPackage {
            id: None,
            name: name.to_string(),
            destination: "Makkah & Madinah".to_string(),
            duration_days: 10,
            price,
            status,
            featured: false,
            itinerary: None,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        }
    }

    fn names(trips: &[TripPackage]) -> Vec<&str> {
        trips.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn unknown_sort_field_preserves_fetched_order() {
        let mut trips = vec![
            trip("Umrah Essentials", 1450.0, TripStatus::Active),
            trip("Ziyarat of Iraq", 1150.0, TripStatus::Active),
            trip("Ramadan Umrah Special", 2200.0, TripStatus::Active),
        ];
        let query = ListQuery {
            sort_by: Some("bogus".to_string()),
            ..ListQuery::default()
        };
        shape_trips(&mut trips, &query);
        assert_eq!(
            names(&trips),
            vec!["Umrah Essentials", "Ziyarat of Iraq", "Ramadan Umrah Special"]
        );
    }

    #[test]
    fn known_sort_field_still_orders_the_list() {
        let mut trips = vec![
            trip("Umrah Essentials", 1450.0, TripStatus::Active),
            trip("Ziyarat of Iraq", 1150.0, TripStatus::Active),
        ];
        let query = ListQuery {
            sort_by: Some("price".to_string()),
            ..ListQuery::default()
        };
        shape_trips(&mut trips, &query);
        assert_eq!(names(&trips), vec!["Ziyarat of Iraq", "Umrah Essentials"]);
    }

    #[test]
    fn status_filter_is_an_exact_enum_match() {
        let base = vec![
            trip("Umrah Essentials", 1450.0, TripStatus::Active),
            trip("Masjid al-Aqsa Heritage Tour", 1600.0, TripStatus::Inactive),
        ];

        let mut trips = base.clone();
        let query = ListQuery {
            status: Some("Inactive".to_string()),
            ..ListQuery::default()
        };
        shape_trips(&mut trips, &query);
        assert_eq!(names(&trips), vec!["Masjid al-Aqsa Heritage Tour"]);

        // A value that is not a variant's wire form matches nothing.
        let mut trips = base;
        let query = ListQuery {
            status: Some("inactive".to_string()),
            ..ListQuery::default()
        };
        shape_trips(&mut trips, &query);
        assert!(trips.is_empty());
    }
}
