use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Inventory of user {0} is private. \
         Go to Roblox Settings -> Privacy and set inventory visibility to 'Everyone'"
    )]
    PrivateInventory(i64),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Response(StatusCode, String),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Parse error: {0}")]
    Parse(#[from] url::ParseError),
}
