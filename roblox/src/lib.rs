//! Client for the Roblox inventory API.
//! Pages through a user's collectibles and flattens them into [`InventoryItem`]s.
mod conversion;
mod error;
mod http;

pub use error::Error;
pub use http::{HttpClient, InventoryItem};

pub type Result<T> = std::result::Result<T, Error>;
