use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::db::MongoDB;
use crate::models::user::UpdateProfileRequest;
use crate::models::UserResponse;

pub async fn register(
    db: web::Data<MongoDB>,
    user: web::Json<crate::models::RegisterRequest>,
) -> Result<HttpResponse, Error> {
    if let Err(e) = user.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.create_user(&user).await {
        Ok(auth_response) => Ok(HttpResponse::Ok().json(auth_response)),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn login(
    db: web::Data<MongoDB>,
    credentials: web::Json<crate::models::LoginRequest>,
) -> Result<HttpResponse, Error> {
    match db.authenticate_user(&credentials).await {
        Ok(auth_response) => Ok(HttpResponse::Ok().json(auth_response)),
        Err(e) => Ok(HttpResponse::Unauthorized().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn get_profile(req: HttpRequest, db: web::Data<MongoDB>) -> Result<HttpResponse, Error> {
    let user_id = match super::get_user_id_from_token(&req) {
        Some(id) => id,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    match db.get_user(&user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Profile not found" }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn update_profile(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = match super::get_user_id_from_token(&req) {
        Some(id) => id,
        None => return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))),
    };

    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }

    match db.update_profile(&user_id, &payload).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "Profile not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}
