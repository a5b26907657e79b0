use actix_web::{post, web, HttpResponse};
use db::{find_booking_by_id, insert_feedback};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{error::HttpApiError, extractors::AuthUser, schemas::FeedbackInput, state::AppState};

// Feedback is attached to a booking by its owner, after the fact. Repeat
// submissions for the same booking are accepted; readers take the earliest.
#[post("/api/bookings/{booking_id}/feedback")]
pub async fn submit_feedback(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    payload: web::Json<FeedbackInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    let booking_id = path.into_inner();

    let booking = find_booking_by_id(&data.db, booking_id)
        .await
        .map_err(HttpApiError::from)?
        .ok_or_else(|| HttpApiError::not_found("Booking not found"))?;

    if booking.user_id != user.id {
        return Err(
            HttpApiError::forbidden("Not authorized to submit feedback for this booking").into(),
        );
    }

    let feedback = insert_feedback(&data.db, booking.id, payload.rating, &payload.feedback)
        .await
        .map_err(HttpApiError::from)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Feedback submitted successfully",
        "feedback": feedback
    })))
}
