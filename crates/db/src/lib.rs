use chrono::{DateTime, Utc};
use common::StatusUpdate;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Db(pub PgPool);

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("conflict: {0}")]
    Conflict(String),
}

pub async fn connect(database_url: &str, max: u32) -> Result<Db, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max)
        .connect(database_url)
        .await?;
    Ok(Db(pool))
}

/// Pool that defers connecting until first use. Handy for wiring state in
/// tests that never reach the database.
pub fn connect_lazy(database_url: &str) -> Result<Db, DbError> {
    let pool = PgPoolOptions::new().connect_lazy(database_url)?;
    Ok(Db(pool))
}

pub async fn migrate(db: &Db) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(&db.0).await?;
    Ok(())
}

// Unique-violation inserts surface as Conflict so the handler layer can map
// them to 409 instead of 500.
fn map_insert_err(e: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("23505") {
            return DbError::Conflict(db_err.message().to_string());
        }
    }
    DbError::Sqlx(e)
}

// ==== Rows ====

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AdminRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    pub id: Uuid,
    pub service: String,
    pub customer_name: String,
    pub phone: String,
    pub district: String,
    pub pin_code: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub payment_method: String,
    pub payment_status: String,
    pub service_status: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection served to the admin booking list. Fulfilment status and the
/// owner id stay out of the summary.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryRow {
    pub id: Uuid,
    pub service: String,
    pub name: String,
    pub phone: String,
    pub district: String,
    pub pin_code: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub payment: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub rating: i32,
    pub feedback: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==== Users ====

pub async fn find_user_by_email(db: &Db, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, phone, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn insert_user(
    db: &Db,
    email: &str,
    phone: &str,
    password_hash: &str,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, phone, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, phone, password_hash, created_at
        "#,
    )
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .fetch_one(&db.0)
    .await
    .map_err(map_insert_err)?;
    Ok(row)
}

pub async fn update_user_password(
    db: &Db,
    email: &str,
    new_password_hash: &str,
) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET password_hash = $1
        WHERE email = $2
        RETURNING id, email, phone, password_hash, created_at
        "#,
    )
    .bind(new_password_hash)
    .bind(email)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

// ==== Admins ====

pub async fn find_admin_by_email(db: &Db, email: &str) -> Result<Option<AdminRow>, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(
        "SELECT id, name, email, password_hash, profile_image, created_at
         FROM admins WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn find_admin_by_id(db: &Db, id: Uuid) -> Result<Option<AdminRow>, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(
        "SELECT id, name, email, password_hash, profile_image, created_at
         FROM admins WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn insert_admin(
    db: &Db,
    name: &str,
    email: &str,
    password_hash: &str,
    profile_image: Option<&str>,
) -> Result<AdminRow, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(
        r#"
        INSERT INTO admins (name, email, password_hash, profile_image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, profile_image, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(profile_image)
    .fetch_one(&db.0)
    .await
    .map_err(map_insert_err)?;
    Ok(row)
}

pub async fn update_admin_password(
    db: &Db,
    email: &str,
    new_password_hash: &str,
) -> Result<Option<AdminRow>, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(
        r#"
        UPDATE admins
        SET password_hash = $1
        WHERE email = $2
        RETURNING id, name, email, password_hash, profile_image, created_at
        "#,
    )
    .bind(new_password_hash)
    .bind(email)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

// ==== Bookings ====

pub struct NewBooking<'a> {
    pub service: &'a str,
    pub customer_name: &'a str,
    pub phone: &'a str,
    pub district: &'a str,
    pub pin_code: &'a str,
    pub address: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub payment_method: &'a str,
}

pub async fn insert_booking(
    db: &Db,
    user_id: Uuid,
    booking: NewBooking<'_>,
) -> Result<BookingRow, DbError> {
    let row = sqlx::query_as::<_, BookingRow>(
        r#"
        INSERT INTO bookings
            (service, customer_name, phone, district, pin_code, address,
             date, time, payment_method, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, service, customer_name, phone, district, pin_code, address,
                  date, time, payment_method, payment_status, service_status,
                  user_id, created_at, updated_at
        "#,
    )
    .bind(booking.service)
    .bind(booking.customer_name)
    .bind(booking.phone)
    .bind(booking.district)
    .bind(booking.pin_code)
    .bind(booking.address)
    .bind(booking.date)
    .bind(booking.time)
    .bind(booking.payment_method)
    .bind(user_id)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

pub async fn find_booking_by_id(db: &Db, id: Uuid) -> Result<Option<BookingRow>, DbError> {
    let row = sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, service, customer_name, phone, district, pin_code, address,
               date, time, payment_method, payment_status, service_status,
               user_id, created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn find_bookings_by_user(db: &Db, user_id: Uuid) -> Result<Vec<BookingRow>, DbError> {
    let rows = sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, service, customer_name, phone, district, pin_code, address,
               date, time, payment_method, payment_status, service_status,
               user_id, created_at, updated_at
        FROM bookings
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}

pub async fn list_bookings(db: &Db) -> Result<Vec<BookingSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, BookingSummaryRow>(
        r#"
        SELECT id, service, customer_name AS name, phone, district, pin_code,
               address, date, time, payment_method AS payment, payment_status,
               created_at
        FROM bookings
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}

/// Owner-scoped delete. A zero row count means the booking does not exist or
/// belongs to someone else, and the caller cannot tell which.
pub async fn delete_booking_owned(db: &Db, id: Uuid, user_id: Uuid) -> Result<u64, DbError> {
    let res = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&db.0)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_booking(db: &Db, id: Uuid) -> Result<u64, DbError> {
    let res = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(&db.0)
        .await?;
    Ok(res.rows_affected())
}

/// Applies a validated status transition to one column, leaving the sibling
/// status untouched. Last write wins under concurrent updates.
pub async fn update_booking_status(
    db: &Db,
    id: Uuid,
    update: StatusUpdate,
) -> Result<Option<BookingRow>, DbError> {
    let (sql, value) = match update {
        StatusUpdate::Service(status) => (
            r#"
            UPDATE bookings
            SET service_status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, service, customer_name, phone, district, pin_code, address,
                      date, time, payment_method, payment_status, service_status,
                      user_id, created_at, updated_at
            "#,
            status.as_str(),
        ),
        StatusUpdate::Payment(status) => (
            r#"
            UPDATE bookings
            SET payment_status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, service, customer_name, phone, district, pin_code, address,
                      date, time, payment_method, payment_status, service_status,
                      user_id, created_at, updated_at
            "#,
            status.as_str(),
        ),
    };

    let row = sqlx::query_as::<_, BookingRow>(sql)
        .bind(id)
        .bind(value)
        .fetch_optional(&db.0)
        .await?;
    Ok(row)
}

// ==== Feedback ====

pub async fn insert_feedback(
    db: &Db,
    booking_id: Uuid,
    rating: i32,
    feedback: &str,
) -> Result<FeedbackRow, DbError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        r#"
        INSERT INTO feedback (booking_id, rating, feedback)
        VALUES ($1, $2, $3)
        RETURNING id, booking_id, rating, feedback, submitted_at
        "#,
    )
    .bind(booking_id)
    .bind(rating)
    .bind(feedback)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

// ==== Service catalog ====

pub async fn list_services(db: &Db) -> Result<Vec<ServiceRow>, DbError> {
    let rows = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, title, description, price, image_url, created_at
         FROM services ORDER BY created_at DESC",
    )
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}

pub async fn delete_service(db: &Db, id: Uuid) -> Result<u64, DbError> {
    let res = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(&db.0)
        .await?;
    Ok(res.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn booking_row_serializes_with_wire_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let row = BookingRow {
            id: Uuid::new_v4(),
            service: "AC Repair".into(),
            customer_name: "Asha".into(),
            phone: "9876543210".into(),
            district: "Kochi".into(),
            pin_code: "682001".into(),
            address: "12 Canal Road".into(),
            date: "2024-05-01".into(),
            time: "10:00".into(),
            payment_method: "Cash on Delivery".into(),
            payment_status: "Pending".into(),
            service_status: "Pending".into(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&row).unwrap();
        for key in [
            "customerName",
            "pinCode",
            "paymentMethod",
            "paymentStatus",
            "serviceStatus",
            "userId",
            "createdAt",
            "updatedAt",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["paymentStatus"], "Pending");
    }

    #[test]
    fn booking_summary_keeps_service_status_out() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let row = BookingSummaryRow {
            id: Uuid::new_v4(),
            service: "AC Repair".into(),
            name: "Asha".into(),
            phone: "9876543210".into(),
            district: "Kochi".into(),
            pin_code: "682001".into(),
            address: "12 Canal Road".into(),
            date: "2024-05-01".into(),
            time: "10:00".into(),
            payment: "Cash on Delivery".into(),
            payment_status: "Pending".into(),
            created_at: now,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("paymentStatus").is_some());
        assert!(value.get("serviceStatus").is_none());
        assert!(value.get("userId").is_none());
    }
}
