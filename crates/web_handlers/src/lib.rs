//! # Web Handlers for the Camping Spot Booking API
//!
//! This crate provides the request handlers, their shared types and the routing table.

/// Request, response and record types
mod types;
pub use types::*;

/// Error classification for every handler
mod error;
pub use error::*;

/// Builder for partial user updates
mod user_patch;
pub use user_patch::*;

/// Local disk storage for uploaded images
mod image_store;
pub use image_store::*;

/// Registration, login and profile handlers
mod user_handlers;
pub use user_handlers::*;

/// Camping spot listing, creation and deletion handlers
mod camping_spot_handlers;
pub use camping_spot_handlers::*;

/// Booking handlers
mod booking_handlers;
pub use booking_handlers::*;

/// Routing table shared by the server and the tests
mod routes;
pub use routes::*;

#[cfg(test)]
mod test_support;
