use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::db::MongoDB;
use crate::listing::{any_field_matches, cmp_str_ci, parse_wire, sort_with, ListQuery};
use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{Vehicle, VehicleStatus};

pub async fn list_vehicles(db: web::Data<MongoDB>) -> Result<HttpResponse, Error> {
    match db.list_vehicles().await {
        Ok(vehicles) => Ok(HttpResponse::Ok().json(vehicles)),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn get_vehicle(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    match db.get_vehicle(&path.into_inner()).await {
        Ok(Some(vehicle)) => Ok(HttpResponse::Ok().json(vehicle)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Vehicle not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn admin_list_vehicles(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }

    match db.list_vehicles().await {
        Ok(mut vehicles) => {
            shape_vehicles(&mut vehicles, &query);
            Ok(HttpResponse::Ok().json(vehicles))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

fn shape_vehicles(vehicles: &mut Vec<Vehicle>, query: &ListQuery) {
    if let Some(search) = &query.search {
        vehicles.retain(|v| any_field_matches(&[&v.name, &v.registration_number], search));
    }
    if let Some(raw) = &query.status {
        let wanted = parse_wire::<VehicleStatus>(raw);
        vehicles.retain(|v| Some(v.status) == wanted);
    }
    match query.sort_by.as_deref() {
        Some("name") => sort_with(vehicles, query.order(), |a, b| cmp_str_ci(&a.name, &b.name)),
        Some("seat_count") => sort_with(vehicles, query.order(), |a, b| {
            a.seat_count.cmp(&b.seat_count)
        }),
        Some("model_year") => sort_with(vehicles, query.order(), |a, b| {
            a.model_year.cmp(&b.model_year)
        }),
        _ => {}
    }
}

pub async fn create_vehicle(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    payload: web::Json<CreateVehicleRequest>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.create_vehicle(&payload).await {
        Ok(vehicle) => Ok(HttpResponse::Created().json(vehicle)),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn update_vehicle(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    payload: web::Json<UpdateVehicleRequest>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.update_vehicle(&path.into_inner(), &payload).await {
        Ok(Some(vehicle)) => Ok(HttpResponse::Ok().json(vehicle)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Vehicle not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn delete_vehicle(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    if super::get_admin_from_token(&req).is_none() {
        return Ok(HttpResponse::Forbidden().json(json!({ "error": "Admin access required" })));
    }
    match db.delete_vehicle(&path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({ "error": "Vehicle not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;
    use mongodb::bson;

    fn vehicle(name: &str, seat_count: i32, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: None,
            name: name.to_string(),
            vehicle_type: VehicleType::Coach,
            seat_count,
            registration_number: "KDA 456B".to_string(),
            status,
            model_year: 2022,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        }
    }

    fn names(vehicles: &[Vehicle]) -> Vec<&str> {
        vehicles.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn unknown_sort_field_preserves_fetched_order() {
        let mut vehicles = vec![
            vehicle("Al-Safa Coach", 49, VehicleStatus::Available),
            vehicle("Zamzam Shuttle", 14, VehicleStatus::Available),
            vehicle("Marwah Express", 44, VehicleStatus::Booked),
        ];
        let query = ListQuery {
            sort_by: Some("registration".to_string()),
            ..ListQuery::default()
        };
        shape_vehicles(&mut vehicles, &query);
        assert_eq!(
            names(&vehicles),
            vec!["Al-Safa Coach", "Zamzam Shuttle", "Marwah Express"]
        );
    }

    #[test]
    fn status_filter_is_an_exact_enum_match() {
        let mut vehicles = vec![
            vehicle("Al-Safa Coach", 49, VehicleStatus::Available),
            vehicle("Haramain Van", 8, VehicleStatus::Maintenance),
        ];
        let query = ListQuery {
            status: Some("Maintenance".to_string()),
            ..ListQuery::default()
        };
        shape_vehicles(&mut vehicles, &query);
        assert_eq!(names(&vehicles), vec!["Haramain Van"]);

        let mut vehicles = vec![vehicle("Al-Safa Coach", 49, VehicleStatus::Available)];
        let query = ListQuery {
            status: Some("available".to_string()),
            ..ListQuery::default()
        };
        shape_vehicles(&mut vehicles, &query);
        assert!(vehicles.is_empty());
    }
}
