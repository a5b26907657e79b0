use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use common::Role;
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::{error::HttpApiError, state::AppState};

/// Booking owner resolved from a bearer token with the `user` role.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Operator resolved from a bearer token with the `admin` role.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
}

fn bearer_claims(req: &HttpRequest) -> Result<auth::Claims, HttpApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| HttpApiError::unauthorized("Unauthorized: Please sign in"))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| HttpApiError::unauthorized("Unauthorized: Please sign in"))?;

    auth::verify(&state.jwt, token).map_err(|_| HttpApiError::unauthorized("Invalid token"))
}

impl FromRequest for AuthUser {
    type Error = HttpApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| {
            if claims.role != Role::User {
                return Err(HttpApiError::forbidden("Access denied"));
            }
            Ok(AuthUser {
                id: claims.sub,
                email: claims.email,
            })
        }))
    }
}

impl FromRequest for AuthAdmin {
    type Error = HttpApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| {
            if claims.role != Role::Admin {
                return Err(HttpApiError::forbidden("Access denied: Not admin"));
            }
            Ok(AuthAdmin { id: claims.sub })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use actix_web::{test, web, App, HttpResponse};
    use common::Role;

    async fn user_only(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "id": user.id }))
    }

    async fn admin_only(_admin: AuthAdmin) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn token(state: &crate::state::AppState, role: Role) -> String {
        auth::sign_access(&state.jwt, uuid::Uuid::new_v4(), None, role, 3600).unwrap()
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/u", web::get().to(user_only)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/u").to_request()).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn malformed_token_is_unauthorized() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/u", web::get().to(user_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/u")
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn user_token_passes_user_extractor() {
        let state = test_state();
        let bearer = format!("Bearer {}", token(&state, Role::User));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/u", web::get().to(user_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/u")
            .insert_header((header::AUTHORIZATION, bearer))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn user_token_is_forbidden_on_admin_route() {
        let state = test_state();
        let bearer = format!("Bearer {}", token(&state, Role::User));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/a", web::get().to(admin_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/a")
            .insert_header((header::AUTHORIZATION, bearer))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);
    }

    #[actix_web::test]
    async fn admin_token_passes_admin_extractor() {
        let state = test_state();
        let bearer = format!("Bearer {}", token(&state, Role::Admin));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/a", web::get().to(admin_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/a")
            .insert_header((header::AUTHORIZATION, bearer))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
