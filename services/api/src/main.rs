use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use tracing_subscriber::EnvFilter;

mod chat;
mod error;
mod extractors;
mod routes;
mod schemas;
mod state;

use state::{AppState, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let s = Settings::from_env();
    let db = db::connect(&s.database_url, 10).await.expect("db");
    db::migrate(&db).await.expect("migrations");

    let state = AppState {
        db,
        jwt: auth::JwtKeys::from_secret(&s.jwt_secret),
        access_ttl: s.access_ttl_seconds.unwrap_or(3600),
        http: reqwest::Client::new(),
        payment_key_id: s.payment_key_id,
        payment_key_secret: s.payment_key_secret,
        payment_api_base: s
            .payment_api_base
            .unwrap_or_else(|| "https://api.razorpay.com".into()),
        chat_responses: Arc::new(chat::response_table()),
    };

    let governor_conf = GovernorConfigBuilder::default()
        .burst_size(10)
        .finish()
        .unwrap();

    let port = s.port.unwrap_or(5000);
    tracing::info!("listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        // The browser frontend is served from arbitrary origins.
        let cors = Cors::permissive();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .app_data(web::Data::new(state.clone()))
            .service(routes::auth::register)
            .service(routes::auth::login)
            .service(routes::auth::update_password)
            .service(routes::bookings::create_booking)
            .service(routes::bookings::my_bookings)
            .service(routes::bookings::cancel_booking)
            .service(routes::feedback::submit_feedback)
            .service(routes::payment::create_order)
            .service(routes::chat::chat)
            .service(routes::admin_auth::register)
            .service(routes::admin_auth::login)
            .service(routes::admin_auth::check_email)
            .service(routes::admin_auth::update_password)
            .service(routes::admin_auth::dashboard)
            .service(routes::admin::all_bookings)
            .service(routes::admin::remove_booking)
            .service(routes::admin::update_status)
            .service(routes::admin::all_services)
            .service(routes::admin::remove_service)
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() }))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
