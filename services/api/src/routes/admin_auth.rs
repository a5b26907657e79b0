use actix_web::{get, post, web, HttpResponse};
use auth::{hash_password, sign_access, verify_password};
use common::Role;
use db::{find_admin_by_email, find_admin_by_id, insert_admin, update_admin_password};
use serde_json::json;
use validator::Validate;

use crate::{
    error::HttpApiError,
    extractors::AuthAdmin,
    schemas::{AdminRegisterInput, CheckEmailInput, LoginInput, UpdatePasswordInput},
    state::AppState,
};

#[post("/admin/register")]
pub async fn register(
    data: web::Data<AppState>,
    payload: web::Json<AdminRegisterInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    if find_admin_by_email(&data.db, &payload.email)
        .await
        .map_err(HttpApiError::from)?
        .is_some()
    {
        return Err(HttpApiError::conflict("Email already registered").into());
    }

    let hash = hash_password(&payload.password).map_err(HttpApiError::from)?;

    let admin = insert_admin(
        &data.db,
        &payload.name,
        &payload.email,
        &hash,
        payload.profile_image.as_deref(),
    )
    .await
    .map_err(HttpApiError::from)?;

    tracing::info!(admin_id = %admin.id, "admin registered");
    Ok(HttpResponse::Ok().json(json!({ "message": "Admin registered successfully" })))
}

#[post("/admin/login")]
pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginInput>,
) -> actix_web::Result<HttpResponse> {
    let admin = find_admin_by_email(&data.db, &payload.email)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &admin.password_hash) {
        return Err(HttpApiError::unauthorized("Invalid credentials").into());
    }

    let token = sign_access(&data.jwt, admin.id, None, Role::Admin, data.access_ttl)
        .map_err(HttpApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token
    })))
}

// Existence probe used by the password-reset form.
#[post("/admin/check-email")]
pub async fn check_email(
    data: web::Data<AppState>,
    payload: web::Json<CheckEmailInput>,
) -> actix_web::Result<HttpResponse> {
    let found = find_admin_by_email(&data.db, &payload.email)
        .await
        .map_err(HttpApiError::from)?;

    match found {
        Some(_) => Ok(HttpResponse::Ok().json(json!({ "exists": true }))),
        None => Ok(HttpResponse::NotFound().json(json!({
            "exists": false,
            "message": "Email not found"
        }))),
    }
}

#[post("/admin/update-password")]
pub async fn update_password(
    data: web::Data<AppState>,
    payload: web::Json<UpdatePasswordInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    let hash = hash_password(&payload.new_password).map_err(HttpApiError::from)?;

    update_admin_password(&data.db, &payload.email, &hash)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::not_found("Email not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}

#[get("/admin/dashboard")]
pub async fn dashboard(
    data: web::Data<AppState>,
    admin: AuthAdmin,
) -> actix_web::Result<HttpResponse> {
    let row = find_admin_by_id(&data.db, admin.id)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::unauthorized("Invalid token"))?;

    Ok(HttpResponse::Ok().json(json!({
        "name": row.name,
        "email": row.email,
        "profileImage": row.profile_image
    })))
}
