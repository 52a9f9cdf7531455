use actix_web::web;

use crate::booking_handlers::*;
use crate::camping_spot_handlers::*;
use crate::error::ApiError;
use crate::user_handlers::*;

/// Registers every route of the API, plus extractor error handlers that answer
/// malformed bodies, query strings and path ids with the same 400 shape as handlers.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid path parameter: {}", err)).into()
    }))
    .route("/", web::get().to(welcome))
    .service(
        web::scope("/api")
            .route("/users", web::get().to(get_user_by_email))
            .route("/users/{user_id}", web::put().to(update_user))
            .route("/login", web::post().to(login))
            .route("/register", web::post().to(register))
            .route("/camping-spots", web::get().to(list_camping_spots))
            .route("/camping-spots", web::post().to(create_camping_spot))
            .route("/camping-spots/{id}", web::get().to(get_camping_spot))
            .route(
                "/owner-camping-spots/{user_id}",
                web::get().to(get_owner_camping_spots),
            )
            .route("/user-bookings/{user_id}", web::get().to(get_user_bookings))
            .route("/book-camping", web::post().to(book_camping))
            .route(
                "/camping-spot/{camping_id}",
                web::delete().to(delete_camping_spot),
            ),
    );
}
