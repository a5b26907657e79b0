use actix_web::{post, web, HttpResponse};
use serde_json::json;

use crate::{chat::FALLBACK_REPLY, schemas::ChatInput, state::AppState};

#[post("/chat")]
pub async fn chat(data: web::Data<AppState>, payload: web::Json<ChatInput>) -> HttpResponse {
    let message = payload.message.trim().to_lowercase();

    let reply = data
        .chat_responses
        .get(&message)
        .map(String::as_str)
        .unwrap_or(FALLBACK_REPLY);

    HttpResponse::Ok().json(json!({ "reply": reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn known_message_gets_mapped_reply() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(chat),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "  Hello " }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["reply"], "Hi there! How can I help?");
    }

    #[actix_web::test]
    async fn unknown_message_gets_fallback() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(chat),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "do you do refunds" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["reply"], FALLBACK_REPLY);
    }
}
