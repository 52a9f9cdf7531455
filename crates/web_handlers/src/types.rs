use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request structure for user registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name of the user
    #[validate(required, length(min = 1))]
    pub username: Option<String>,

    /// Email address, unique across users
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    /// Password, stored and compared as given
    #[validate(required, length(min = 1))]
    pub password: Option<String>,

    /// Role of the user (e.g. "owner", "camper")
    #[validate(required, length(min = 1))]
    pub role: Option<String>,
}

/// Request structure for user login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address of the user
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    /// Password for the user account
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Query string for looking up a user by email
#[derive(Debug, Deserialize, Validate)]
pub struct UserEmailQuery {
    /// Email address to look up
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
}

/// Request structure for updating a user; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name
    pub username: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New role
    pub role: Option<String>,
}

/// Request structure for booking a camping spot
#[derive(Debug, Deserialize, Validate)]
pub struct BookCampingRequest {
    /// User making the booking
    #[serde(rename = "userId")]
    #[validate(required)]
    pub user_id: Option<i64>,

    /// Camping spot being booked
    #[serde(rename = "campingSpotId")]
    #[validate(required)]
    pub camping_spot_id: Option<i64>,

    /// First night of the stay
    #[serde(rename = "checkInDate")]
    #[validate(required)]
    pub check_in_date: Option<NaiveDate>,

    /// Departure date
    #[serde(rename = "checkOutDate")]
    #[validate(required)]
    pub check_out_date: Option<NaiveDate>,
}

/// Fields of a new camping spot, collected from a multipart form
#[derive(Debug, Default, Validate)]
pub struct NewCampingSpot {
    /// Name of the listing
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    /// Free-text description
    #[validate(required, length(min = 1))]
    pub description: Option<String>,

    /// Where the spot is
    #[validate(required, length(min = 1))]
    pub location: Option<String>,

    /// Nightly price
    #[validate(required)]
    pub price_per_night: Option<f64>,

    /// Owner of the listing
    #[validate(required)]
    pub owner_user_id: Option<i64>,
}

/// Public user information returned by the email lookup
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    /// Display name
    pub username: String,
    /// Email address
    pub email: String,
    /// Role of the user
    pub role: String,
}

/// User profile returned after a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Unique identifier for the user
    pub id: i64,
    /// Display name
    pub username: String,
    /// Email address
    pub email: String,
    /// Role of the user
    pub role: String,
}

/// User row including the stored password, used only for login
#[derive(Debug, Deserialize)]
pub struct UserCredentials {
    /// Unique identifier for the user
    pub id: i64,
    /// Display name
    pub username: String,
    /// Email address
    pub email: String,
    /// Role of the user
    pub role: String,
    /// Stored password
    pub password: String,
}

impl From<UserCredentials> for UserProfile {
    fn from(user: UserCredentials) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Full camping spot record
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CampingSpot {
    /// Unique identifier for the spot
    pub id: i64,
    /// Name of the listing
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Where the spot is
    pub location: String,
    /// Nightly price
    pub price_per_night: f64,
    /// Public path of the uploaded image, if any
    pub image_path: Option<String>,
    /// Owner of the listing
    pub owner_user_id: i64,
}

/// Camping spot fields shown in the public listing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CampingSpotSummary {
    /// Unique identifier for the spot
    pub id: i64,
    /// Name of the listing
    pub name: String,
    /// Where the spot is
    pub location: String,
    /// Nightly price
    pub price_per_night: f64,
    /// Public path of the uploaded image, if any
    pub image_path: Option<String>,
}

/// A booking joined with the details of the booked spot
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserBooking {
    /// Unique identifier for the booking
    pub id: i64,
    /// Booked spot
    pub camping_spot_id: i64,
    /// First night of the stay
    pub check_in_date: NaiveDate,
    /// Departure date
    pub check_out_date: NaiveDate,
    /// Booking status, always "confirmed" for now
    pub status: String,
    /// Name of the booked spot
    pub camping_spot_name: String,
    /// Location of the booked spot
    pub location: String,
    /// Nightly price of the booked spot
    pub price_per_night: f64,
    /// Image of the booked spot
    pub image_path: Option<String>,
}

/// Response carrying only a human readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message describing the outcome
    pub message: String,
}

/// Response for endpoints that create a row
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Message describing the outcome
    pub message: String,
    /// Identifier of the new row
    pub id: i64,
}

/// Response for a newly created camping spot
#[derive(Debug, Serialize)]
pub struct CreatedCampingSpotResponse {
    /// Message describing the outcome
    pub message: String,
    /// Identifier of the new spot
    pub id: i64,
    /// Public path of the stored image, if one was uploaded
    pub image_path: Option<String>,
}

/// Row shape of `... RETURNING id`
#[derive(Debug, Deserialize)]
pub struct IdRow {
    /// Returned identifier
    pub id: i64,
}
