use actix_web::{delete, get, post, web, HttpResponse};
use db::{delete_booking_owned, find_bookings_by_user, insert_booking, NewBooking};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{error::HttpApiError, extractors::AuthUser, schemas::BookingInput, state::AppState};

#[post("/api/bookings")]
pub async fn create_booking(
    data: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<BookingInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    // New bookings always start out Pending on both status axes.
    let booking = insert_booking(
        &data.db,
        user.id,
        NewBooking {
            service: &payload.service,
            customer_name: &payload.name,
            phone: &payload.phone,
            district: &payload.district,
            pin_code: &payload.pin_code,
            address: &payload.address,
            date: &payload.date,
            time: &payload.time,
            payment_method: &payload.payment,
        },
    )
    .await
    .map_err(HttpApiError::from)?;

    tracing::info!(booking_id = %booking.id, user_id = %user.id, "booking created");
    Ok(HttpResponse::Created().json(json!({
        "message": "Booking saved",
        "booking": booking
    })))
}

#[get("/api/bookings/my")]
pub async fn my_bookings(
    data: web::Data<AppState>,
    user: AuthUser,
) -> actix_web::Result<HttpResponse> {
    let bookings = find_bookings_by_user(&data.db, user.id)
        .await
        .map_err(HttpApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "bookings": bookings })))
}

// A booking owned by someone else reads as missing; the response does not
// reveal whether the id exists.
#[delete("/api/bookings/{id}")]
pub async fn cancel_booking(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();

    let deleted = delete_booking_owned(&data.db, id, user.id)
        .await
        .map_err(HttpApiError::from)?;

    if deleted == 0 {
        return Err(HttpApiError::not_found("Booking not found or not authorized").into());
    }

    tracing::info!(booking_id = %id, user_id = %user.id, "booking cancelled");
    Ok(HttpResponse::Ok().json(json!({ "message": "Booking cancelled" })))
}
