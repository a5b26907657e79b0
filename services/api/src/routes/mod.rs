pub mod admin;
pub mod admin_auth;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod feedback;
pub mod payment;
