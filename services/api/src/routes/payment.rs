use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{error::HttpApiError, schemas::CreateOrderInput, state::AppState};

#[derive(Debug, Deserialize)]
struct ProviderOrder {
    id: String,
    amount: i64,
    currency: String,
}

// Creates an order with the payment provider. Nothing is persisted locally;
// the frontend completes the payment against the returned order id.
#[post("/api/create-order")]
pub async fn create_order(
    data: web::Data<AppState>,
    payload: web::Json<CreateOrderInput>,
) -> actix_web::Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| HttpApiError::bad_request(e.to_string()))?;

    let (key_id, key_secret) = match (&data.payment_key_id, &data.payment_key_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => {
            tracing::error!("payment order requested but provider credentials are not configured");
            return Err(HttpApiError::internal("Payment provider error").into());
        }
    };

    let receipt = format!("receipt_order_{}", Utc::now().timestamp_millis());
    let url = format!("{}/v1/orders", data.payment_api_base);

    let resp = data
        .http
        .post(&url)
        .basic_auth(key_id, Some(key_secret))
        .json(&json!({
            // Provider expects the amount in the smallest currency unit.
            "amount": payload.amount * 100,
            "currency": "INR",
            "receipt": receipt,
        }))
        .send()
        .await
        .map_err(|e| {
            tracing::error!("payment order request failed: {e}");
            HttpApiError::internal("Payment provider error")
        })?;

    if !resp.status().is_success() {
        tracing::error!(status = %resp.status(), "payment provider rejected order");
        return Err(HttpApiError::internal("Payment provider error").into());
    }

    let order: ProviderOrder = resp.json().await.map_err(|e| {
        tracing::error!("payment order response unreadable: {e}");
        HttpApiError::internal("Payment provider error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "orderId": order.id,
        "amount": order.amount,
        "currency": order.currency,
        "key": key_id,
    })))
}
