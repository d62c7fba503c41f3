use crate::endpoint::Endpoint;
use crate::schema::{AdRequest, ItemDetailsResponse, PostOutcome, ValuationIndex};
use crate::{Error, Result};
use common::BROWSER_USER_AGENT;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, COOKIE, ORIGIN,
    REFERER, USER_AGENT,
};
use reqwest::StatusCode;
use std::time::Duration;

const WWW_URL: &str = "https://www.rolimons.com";
const API_URL: &str = "https://api.rolimons.com";
const TIMEOUT: Duration = Duration::from_secs(30);
const VERIFICATION_COOKIE: &str = "_RoliVerification";

/// Public trade ad page of a player.
pub fn profile_url(player_id: i64) -> String {
    format!("{WWW_URL}/playertrades/{player_id}")
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    www_url: String,
    api_url: String,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::build(WWW_URL.into(), API_URL.into())
    }

    /// Routes every endpoint to `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Self::build(base_url.clone(), base_url)
    }

    fn build(www_url: String, api_url: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            www_url,
            api_url,
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::ItemDetails => format!("{}{endpoint}", self.www_url),
            Endpoint::CreateAd => format!("{}{endpoint}", self.api_url),
        }
    }

    /// Downloads the full item value table.
    pub async fn fetch_item_details(&self) -> Result<ValuationIndex> {
        let response = self.client.get(self.url(Endpoint::ItemDetails)).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            return Err(Error::Response(status, response.text().await?));
        }

        let text = response.text().await?;
        let details: ItemDetailsResponse =
            serde_json::from_str(&text).map_err(|_| Error::Deserialize(text))?;

        if !details.success {
            return Err(Error::Unsuccessful);
        }

        let index = ValuationIndex::from_items(details.items);
        log::debug!(
            "Loaded {} Rolimons items (reported {})",
            index.len(),
            details.item_count.unwrap_or_default()
        );
        Ok(index)
    }

    /// Posts one trade ad. Never retries; every failure is folded into the outcome.
    pub async fn create_trade_ad(&self, request: &AdRequest, roli_verification: &str) -> PostOutcome {
        let headers = match ad_headers(roli_verification) {
            Ok(headers) => headers,
            Err(e) => return PostOutcome::Unknown { message: e.to_string() },
        };

        let response = self
            .client
            .post(self.url(Endpoint::CreateAd))
            .headers(headers)
            .json(request)
            .send()
            .await;

        match response {
            Ok(response) => {
                PostOutcome::from_status(response.status(), profile_url(request.player_id))
            }
            Err(e) => PostOutcome::Unknown {
                message: Error::Request(e).to_string(),
            },
        }
    }
}

fn ad_headers(roli_verification: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static(WWW_URL));
    headers.insert(REFERER, HeaderValue::from_static("https://www.rolimons.com/tradeads"));
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("{VERIFICATION_COOKIE}={roli_verification}"))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RequestTag;
    use common::AssetId;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;

    fn ad_request() -> AdRequest {
        AdRequest {
            player_id: 77,
            offer_item_ids: vec![AssetId(1), AssetId(2), AssetId(1)],
            request_item_ids: vec![AssetId(9)],
            request_tags: vec![RequestTag::Upgrade, RequestTag::Demand],
        }
    }

    async fn post_with_status(status: u16) -> PostOutcome {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/tradeads/v1/createad")
                    .json_body(json!({
                        "player_id": 77,
                        "offer_item_ids": [1, 2, 1],
                        "request_item_ids": [9],
                        "request_tags": ["upgrade", "demand"],
                    }));
                then.status(status).json_body(json!({"success": status == 201}));
            })
            .await;

        let client = HttpClient::with_base_url(server.base_url()).unwrap();
        let outcome = client.create_trade_ad(&ad_request(), "cookie").await;
        mock.assert_async().await;
        outcome
    }

    #[tokio::test]
    async fn created_is_success_with_profile_url() {
        assert_eq!(
            post_with_status(201).await,
            PostOutcome::Success {
                ad_url: "https://www.rolimons.com/playertrades/77".into()
            }
        );
    }

    #[tokio::test]
    async fn rejections_map_to_outcomes() {
        assert_eq!(post_with_status(400).await, PostOutcome::Cooldown);
        assert_eq!(post_with_status(422).await, PostOutcome::AuthFailure);
        assert_eq!(post_with_status(429).await, PostOutcome::RateLimited);
        assert_eq!(
            post_with_status(502).await,
            PostOutcome::Unknown {
                message: "Unexpected response: HTTP 502".into()
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_unknown() {
        let client = HttpClient::with_base_url("http://127.0.0.1:1").unwrap();
        let outcome = client.create_trade_ad(&ad_request(), "cookie").await;
        assert!(matches!(outcome, PostOutcome::Unknown { .. }));
    }

    #[tokio::test]
    async fn invalid_cookie_is_unknown_without_a_request() {
        let client = HttpClient::with_base_url("http://127.0.0.1:1").unwrap();
        let outcome = client.create_trade_ad(&ad_request(), "bad\ncookie").await;
        match outcome {
            PostOutcome::Unknown { message } => assert!(message.starts_with("Invalid header")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetches_and_decodes_item_details() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/itemapi/itemdetails");
                then.status(200).json_body(json!({
                    "success": true,
                    "item_count": 2,
                    "items": {
                        "1028606": ["Red Baseball Cap", "", 1200, -1, 1200, -1, -1, -1, -1, -1],
                        "1365767": ["Valkyrie Helm", "VH", 30000, 35000, 35000, 3, 2, 1, -1, 1]
                    }
                }));
            })
            .await;

        let client = HttpClient::with_base_url(server.base_url()).unwrap();
        let index = client.fetch_item_details().await.unwrap();

        assert_eq!(index.len(), 2);
        let cap = index.get(&AssetId(1028606)).unwrap();
        assert_eq!(cap.value, None);
        assert_eq!(cap.rap, Some(1200));
        let helm = index.get(&AssetId(1365767)).unwrap();
        assert_eq!(helm.value, Some(35000));
        assert!(helm.projected && helm.rare);
    }

    #[tokio::test]
    async fn throttled_item_details_are_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/itemapi/itemdetails");
                then.status(429);
            })
            .await;

        let client = HttpClient::with_base_url(server.base_url()).unwrap();
        assert!(matches!(
            client.fetch_item_details().await,
            Err(Error::RateLimited)
        ));
    }

    #[tokio::test]
    async fn unsuccessful_payload_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/itemapi/itemdetails");
                then.status(200).json_body(json!({"success": false}));
            })
            .await;

        let client = HttpClient::with_base_url(server.base_url()).unwrap();
        assert!(matches!(
            client.fetch_item_details().await,
            Err(Error::Unsuccessful)
        ));
    }
}
