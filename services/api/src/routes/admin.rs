use actix_web::{delete, get, put, web, HttpResponse};
use common::StatusUpdate;
use db::{delete_booking, delete_service, list_bookings, list_services, update_booking_status};
use serde_json::json;
use uuid::Uuid;

use crate::{error::HttpApiError, extractors::AuthAdmin, schemas::StatusInput, state::AppState};

#[get("/admin/admin/bookings")]
pub async fn all_bookings(
    data: web::Data<AppState>,
    _admin: AuthAdmin,
) -> actix_web::Result<HttpResponse> {
    let bookings = list_bookings(&data.db).await.map_err(HttpApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "bookings": bookings
    })))
}

#[delete("/admin/admin/bookings/{id}")]
pub async fn remove_booking(
    data: web::Data<AppState>,
    _admin: AuthAdmin,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();

    let deleted = delete_booking(&data.db, id)
        .await
        .map_err(HttpApiError::from)?;
    if deleted == 0 {
        return Err(HttpApiError::not_found("Booking not found").into());
    }

    tracing::info!(booking_id = %id, "booking deleted by admin");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Booking deleted successfully"
    })))
}

/// Transitions one status axis of a booking. Targets are validated against
/// the closed enums; there is no transition graph, so any allowed target may
/// follow any current state.
#[put("/admin/bookings/{id}/status")]
pub async fn update_status(
    data: web::Data<AppState>,
    _admin: AuthAdmin,
    path: web::Path<Uuid>,
    payload: web::Json<StatusInput>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();

    let update =
        StatusUpdate::parse(&payload.status_type, &payload.new_status).map_err(HttpApiError::from)?;

    let booking = update_booking_status(&data.db, id, update)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::not_found("Booking not found"))?;

    tracing::info!(
        booking_id = %id,
        kind = update.kind(),
        status = %payload.new_status,
        "booking status updated"
    );
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} status updated successfully", update.kind()),
        "booking": booking
    })))
}

#[get("/admin/services")]
pub async fn all_services(
    data: web::Data<AppState>,
    _admin: AuthAdmin,
) -> actix_web::Result<HttpResponse> {
    let services = list_services(&data.db).await.map_err(HttpApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "services": services
    })))
}

#[delete("/admin/services/{id}")]
pub async fn remove_service(
    data: web::Data<AppState>,
    _admin: AuthAdmin,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();

    let deleted = delete_service(&data.db, id)
        .await
        .map_err(HttpApiError::from)?;
    if deleted == 0 {
        return Err(HttpApiError::not_found("Service not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Service deleted successfully"
    })))
}
