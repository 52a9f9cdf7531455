use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result, web};
use database::{QueryExecutor, SqlValue, decode_row, decode_rows};
use futures_util::StreamExt;
use validator::Validate;

use crate::error::{ApiError, required};
use crate::image_store::ImageStore;
use crate::types::*;

/// Name of the multipart field carrying the image file
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted text field in the camping spot form
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

const SPOT_COLUMNS: &str =
    "id, name, description, location, price_per_night, image_path, owner_user_id";

/// Lists every camping spot with the summary columns.
pub async fn list_camping_spots(
    db: web::Data<dyn QueryExecutor>,
) -> Result<HttpResponse, ApiError> {
    let rows = db
        .execute(
            "SELECT id, name, location, price_per_night, image_path FROM camping_spots ORDER BY id",
            &[],
        )
        .await?;

    let spots: Vec<CampingSpotSummary> = decode_rows(rows)?;
    Ok(HttpResponse::Ok().json(spots))
}

/// Gets a single camping spot by id
pub async fn get_camping_spot(
    db: web::Data<dyn QueryExecutor>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let spot_id = path.into_inner();

    let rows = db
        .execute(
            &format!("SELECT {} FROM camping_spots WHERE id = $1", SPOT_COLUMNS),
            &[SqlValue::Int(spot_id)],
        )
        .await?;

    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("Camping spot not found".to_string()))?;
    let spot: CampingSpot = decode_row(row)?;

    Ok(HttpResponse::Ok().json(spot))
}

/// Lists the camping spots owned by a user, 404 when there are none
pub async fn get_owner_camping_spots(
    db: web::Data<dyn QueryExecutor>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = path.into_inner();

    let rows = db
        .execute(
            &format!(
                "SELECT {} FROM camping_spots WHERE owner_user_id = $1 ORDER BY id",
                SPOT_COLUMNS
            ),
            &[SqlValue::Int(owner_id)],
        )
        .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound(
            "No camping spots found for this owner".to_string(),
        ));
    }

    let spots: Vec<CampingSpot> = decode_rows(rows)?;
    Ok(HttpResponse::Ok().json(spots))
}

/// Creates a camping spot from a multipart form with an optional image file.
///
/// The whole form is read and validated before anything is written, so a rejected
/// request leaves neither a row nor a file behind.
pub async fn create_camping_spot(
    db: web::Data<dyn QueryExecutor>,
    images: web::Data<ImageStore>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = CampingSpotForm::read(payload).await?;

    let spot = form.new_camping_spot()?;
    spot.validate()?;
    let name = required(spot.name, "name")?;
    let description = required(spot.description, "description")?;
    let location = required(spot.location, "location")?;
    let price_per_night = required(spot.price_per_night, "price_per_night")?;
    let owner_user_id = required(spot.owner_user_id, "owner_user_id")?;

    let image_path = match &form.image {
        Some(image) => Some(images.save(image.file_name.as_deref(), &image.bytes).await?),
        None => None,
    };

    let mut columns = vec![
        "name",
        "description",
        "location",
        "price_per_night",
        "owner_user_id",
    ];
    let mut params = vec![
        SqlValue::Text(name),
        SqlValue::Text(description),
        SqlValue::Text(location),
        SqlValue::Float(price_per_night),
        SqlValue::Int(owner_user_id),
    ];
    if let Some(path) = &image_path {
        columns.push("image_path");
        params.push(SqlValue::Text(path.clone()));
    }

    let placeholders: Vec<String> = (1..=params.len()).map(|n| format!("${}", n)).collect();
    let statement = format!(
        "INSERT INTO camping_spots ({}) VALUES ({}) RETURNING id",
        columns.join(", "),
        placeholders.join(", ")
    );

    let rows = match db.execute(&statement, &params).await {
        Ok(rows) => rows,
        Err(e) => {
            if let Some(path) = &image_path {
                images.remove(path).await;
            }
            return Err(e.into());
        }
    };

    let row = rows
        .into_iter()
        .next()
        .ok_or(ApiError::Database(sqlx::Error::RowNotFound))?;
    let created: IdRow = decode_row(row)?;

    log::info!("⛺ Created camping spot {} for owner {}", created.id, owner_user_id);

    Ok(HttpResponse::Created().json(CreatedCampingSpotResponse {
        message: "Camping spot created successfully".to_string(),
        id: created.id,
        image_path,
    }))
}

/// Deletes a camping spot together with its reviews, bookings and availabilities.
///
/// The four statements run one after another without a transaction; a failure part
/// way through leaves the remaining rows in place.
pub async fn delete_camping_spot(
    db: web::Data<dyn QueryExecutor>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let spot_id = path.into_inner();
    let params = [SqlValue::Int(spot_id)];

    for child_table in ["reviews", "bookings", "availabilities"] {
        db.execute(
            &format!("DELETE FROM {} WHERE camping_spot_id = $1", child_table),
            &params,
        )
        .await?;
    }

    let deleted = db
        .execute("DELETE FROM camping_spots WHERE id = $1 RETURNING id", &params)
        .await?;

    if deleted.is_empty() {
        return Err(ApiError::NotFound("Camping spot not found".to_string()));
    }

    log::warn!("🗑️ Deleted camping spot {}", spot_id);

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Camping spot deleted successfully".to_string(),
    }))
}

struct UploadedImage {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// Text fields and the optional image of a camping spot form
struct CampingSpotForm {
    fields: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl CampingSpotForm {
    async fn read(mut payload: Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(item) = payload.next().await {
            let mut field = item?;
            let (name, file_name) = match field.content_disposition() {
                Some(cd) => (
                    cd.get_name().map(|n| n.to_string()),
                    cd.get_filename().map(|f| f.to_string()),
                ),
                None => (None, None),
            };

            let limit = match name.as_deref() {
                Some(IMAGE_FIELD) => MAX_IMAGE_BYTES,
                _ => MAX_TEXT_FIELD_BYTES,
            };

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk?;
                if bytes.len() + chunk.len() > limit {
                    return Err(ApiError::Validation(format!(
                        "Field {} exceeds {} bytes",
                        name.as_deref().unwrap_or("unnamed"),
                        limit
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match name.as_deref() {
                Some(IMAGE_FIELD) => {
                    if !bytes.is_empty() {
                        image = Some(UploadedImage { file_name, bytes });
                    }
                }
                Some(name) => {
                    let value = String::from_utf8(bytes).map_err(|_| {
                        ApiError::Validation(format!("Field {} is not valid UTF-8", name))
                    })?;
                    fields.insert(name.to_string(), value);
                }
                None => {}
            }
        }

        Ok(Self { fields, image })
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.text(name) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ApiError::Validation(format!("{} must be a number", name))),
            None => Ok(None),
        }
    }

    fn new_camping_spot(&self) -> Result<NewCampingSpot, ApiError> {
        let price_per_night: Option<f64> = self.number("price_per_night")?;
        if price_per_night.is_some_and(|price| !price.is_finite()) {
            return Err(ApiError::Validation(
                "price_per_night must be a number".to_string(),
            ));
        }

        Ok(NewCampingSpot {
            name: self.text("name"),
            description: self.text("description"),
            location: self.text("location"),
            price_per_night,
            owner_user_id: self.number("owner_user_id")?,
        })
    }
}
