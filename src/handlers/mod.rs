use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, error};

use crate::models::Claims;

pub mod admin_users;
pub mod auth;
pub mod bookings;
pub mod trips;
pub mod vehicles;

// Helper to extract the verified claims from the JWT in the Authorization header
fn claims_from_request(req: &HttpRequest) -> Option<Claims> {
    let auth_header = req.headers().get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    if !auth_str.starts_with("Bearer ") {
        debug!("Invalid Authorization header format");
        return None;
    }

    let token = &auth_str[7..];
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(token_data) => {
            debug!(
                "Token decoded successfully for user: {}",
                token_data.claims.sub
            );
            Some(token_data.claims)
        }
        Err(e) => {
            error!("Token decoding failed: {:?}", e);
            None
        }
    }
}

fn get_user_id_from_token(req: &HttpRequest) -> Option<String> {
    claims_from_request(req).map(|c| c.sub)
}

fn get_admin_from_token(req: &HttpRequest) -> Option<Claims> {
    claims_from_request(req).filter(|c| c.role == "admin")
}
