//! Backend access: record types and the calls the screens make.
//!
//! Screens only see the [`LibraryApi`] trait; [`HttpApi`] is the real
//! implementation talking JSON over HTTP.

mod client;
mod models;

pub use client::{
    ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpApi, accept_response, decode_response,
};
pub use models::{Book, RentRequest, User};

use serde_json::Value;

use crate::error::ApiError;

/// Calls available against the library backend.
pub trait LibraryApi: Send + Sync {
    /// `GET /users`
    fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// `GET /books`
    fn list_books(&self) -> Result<Vec<Book>, ApiError>;

    /// `POST /rents/create`; any 2xx is a success and the body is returned
    /// as-is for logging.
    fn create_rent(&self, req: &RentRequest) -> Result<Value, ApiError>;
}
