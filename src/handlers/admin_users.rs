//! The admin-user management routes. These mirror the companion
//! user-administration service: they operate on auth users with the service
//! credential and are mounted without their own authentication.

use actix_web::{web, Error, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::db::MongoDB;
use crate::listing::{any_field_matches, cmp_str_ci, parse_wire, sort_with, ListQuery};
use crate::models::user::{AdminCreateUserRequest, AdminUpdateUserRequest};
use crate::models::{UserResponse, UserStatus};

fn shape_users(users: &mut Vec<UserResponse>, query: &ListQuery) {
    if let Some(search) = &query.search {
        users.retain(|u| any_field_matches(&[&u.name, &u.email], search));
    }
    if let Some(raw) = &query.status {
        let wanted = parse_wire::<UserStatus>(raw);
        users.retain(|u| Some(u.status) == wanted);
    }
    match query.sort_by.as_deref() {
        Some("name") => sort_with(users, query.order(), |a, b| cmp_str_ci(&a.name, &b.name)),
        Some("email") => sort_with(users, query.order(), |a, b| cmp_str_ci(&a.email, &b.email)),
        _ => {}
    }
}

pub async fn list_users(
    db: web::Data<MongoDB>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    match db.list_users().await {
        Ok(users) => {
            let mut users: Vec<UserResponse> =
                users.into_iter().map(UserResponse::from).collect();
            shape_users(&mut users, &query);
            Ok(HttpResponse::Ok().json(users))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn create_user(
    db: web::Data<MongoDB>,
    payload: web::Json<AdminCreateUserRequest>,
) -> Result<HttpResponse, Error> {
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.admin_create_user(&payload).await {
        Ok(user) => Ok(HttpResponse::Created().json(UserResponse::from(user))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn update_user(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    payload: web::Json<AdminUpdateUserRequest>,
) -> Result<HttpResponse, Error> {
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": e })));
    }
    match db.admin_update_user(&path.into_inner(), &payload).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({ "error": "User not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn delete_user(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    match db.delete_user(&path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({ "error": "User not found" }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user(name: &str, email: &str, status: UserStatus) -> UserResponse {
        UserResponse {
            id: "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: "0712345678".to_string(),
            role: UserRole::Customer,
            status,
        }
    }

    fn names(users: &[UserResponse]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn unknown_sort_field_preserves_fetched_order() {
        let mut users = vec![
            user("Fatima Noor", "fatima@example.com", UserStatus::Active),
            user("Amina Yusuf", "amina@example.com", UserStatus::Active),
        ];
        let query = ListQuery {
            sort_by: Some("phone".to_string()),
            ..ListQuery::default()
        };
        shape_users(&mut users, &query);
        assert_eq!(names(&users), vec!["Fatima Noor", "Amina Yusuf"]);
    }

    #[test]
    fn status_filter_matches_the_lowercase_wire_form() {
        let mut users = vec![
            user("Fatima Noor", "fatima@example.com", UserStatus::Active),
            user("Amina Yusuf", "amina@example.com", UserStatus::Inactive),
        ];
        let query = ListQuery {
            status: Some("inactive".to_string()),
            ..ListQuery::default()
        };
        shape_users(&mut users, &query);
        assert_eq!(names(&users), vec!["Amina Yusuf"]);

        // User statuses serialize lowercase, so the capitalized form
        // names no variant and matches nothing.
        let mut users = vec![user("Fatima Noor", "fatima@example.com", UserStatus::Active)];
        let query = ListQuery {
            status: Some("Active".to_string()),
            ..ListQuery::default()
        };
        shape_users(&mut users, &query);
        assert!(users.is_empty());
    }
}
