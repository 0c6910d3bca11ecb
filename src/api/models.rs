//! Records exchanged with the library backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A library member as returned by `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A catalogue entry as returned by `GET /books`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Body of `POST /rents/create`.
///
/// Dates go over the wire as `YYYY-MM-DD`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRequest {
    pub user_id: String,
    pub book_id: String,
    pub initial_date: NaiveDate,
    pub final_date: NaiveDate,
}
