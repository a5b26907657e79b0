use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterInput {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailInput {
    pub email: String,
}

/// Booking creation payload. Field names match the public wire contract;
/// every field must be present and non-empty, nothing beyond presence is
/// checked (dates and phone numbers stay free-form).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    #[validate(length(min = 1))]
    pub service: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub district: String,
    #[validate(length(min = 1))]
    pub pin_code: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(length(min = 1))]
    pub payment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInput {
    pub status_type: String,
    pub new_status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    /// Order amount in rupees; converted to paise for the provider.
    #[validate(range(min = 1))]
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChatInput {
    pub message: String,
}
