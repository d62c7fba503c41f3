//! This library provides functionality for interacting with the Rolimons API.
//! It includes the item value table and trade ad creation.
mod endpoint;
mod error;
mod http;
mod schema;

pub use error::Error;
pub use http::{profile_url, HttpClient};
pub use schema::{AdRequest, PostOutcome, RequestTag, ValuationIndex, ValuationRecord};

pub type Result<T> = std::result::Result<T, Error>;
