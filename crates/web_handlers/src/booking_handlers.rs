use actix_web::{HttpResponse, Result, web};
use database::{QueryExecutor, SqlValue, decode_row, decode_rows};
use validator::Validate;

use crate::error::{ApiError, required};
use crate::types::*;

/// Status every new booking is created with
pub const BOOKING_STATUS_CONFIRMED: &str = "confirmed";

/// Books a camping spot for a user. Returns a 201 Created response with the booking id.
pub async fn book_camping(
    db: web::Data<dyn QueryExecutor>,
    request: web::Json<BookCampingRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;
    let user_id = required(request.user_id, "userId")?;
    let camping_spot_id = required(request.camping_spot_id, "campingSpotId")?;
    let check_in_date = required(request.check_in_date, "checkInDate")?;
    let check_out_date = required(request.check_out_date, "checkOutDate")?;

    let rows = db
        .execute(
            r#"
            INSERT INTO bookings (
                user_id, camping_spot_id, check_in_date, check_out_date, status,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id
            "#,
            &[
                SqlValue::Int(user_id),
                SqlValue::Int(camping_spot_id),
                SqlValue::Date(check_in_date),
                SqlValue::Date(check_out_date),
                SqlValue::from(BOOKING_STATUS_CONFIRMED),
            ],
        )
        .await?;

    let row = rows
        .into_iter()
        .next()
        .ok_or(ApiError::Database(sqlx::Error::RowNotFound))?;
    let created: IdRow = decode_row(row)?;

    log::info!(
        "📅 Booking {} confirmed for user {} at spot {}",
        created.id,
        user_id,
        camping_spot_id
    );

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Booking created successfully".to_string(),
        id: created.id,
    }))
}

/// Lists a user's bookings with spot details, latest check-in first
pub async fn get_user_bookings(
    db: web::Data<dyn QueryExecutor>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let rows = db
        .execute(
            r#"
            SELECT
                b.id, b.camping_spot_id, b.check_in_date, b.check_out_date, b.status,
                cs.name AS camping_spot_name, cs.location, cs.price_per_night, cs.image_path
            FROM bookings b
            JOIN camping_spots cs ON b.camping_spot_id = cs.id
            WHERE b.user_id = $1
            ORDER BY b.check_in_date DESC
            "#,
            &[SqlValue::Int(user_id)],
        )
        .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound(
            "No bookings found for this user".to_string(),
        ));
    }

    let bookings: Vec<UserBooking> = decode_rows(rows)?;
    Ok(HttpResponse::Ok().json(bookings))
}
