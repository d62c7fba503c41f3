use crate::{Error, Result};
use common::{AssetId, BROWSER_USER_AGENT};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

const BASE_URL: &str = "https://inventory.roblox.com";
const PAGE_LIMIT: &str = "100";
const TIMEOUT: Duration = Duration::from_secs(30);

/// One owned collectible. Copies of the same limited show up as separate items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: AssetId,
    pub name: String,
    pub rap: i64,
    pub on_hold: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Collectible {
    pub asset_id: Option<AssetId>,
    pub name: Option<String>,
    pub recent_average_price: Option<i64>,
    pub is_on_hold: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectiblesPage {
    #[serde(default)]
    pub data: Vec<Collectible>,
    pub next_page_cursor: Option<String>,
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
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
            base_url: base_url.into(),
        })
    }

    /// Fetches every collectible owned by `user_id`, in the order the API returns them.
    pub async fn fetch_inventory(&self, user_id: i64) -> Result<Vec<InventoryItem>> {
        let collectibles = collect_pages(|cursor| self.fetch_page(user_id, cursor)).await?;
        let items: Vec<_> = collectibles
            .into_iter()
            .filter_map(Collectible::into_item)
            .collect();

        log::debug!("Fetched {} collectibles for user {user_id}", items.len());
        Ok(items)
    }

    async fn fetch_page(&self, user_id: i64, cursor: Option<String>) -> Result<CollectiblesPage> {
        let mut url = Url::parse(&format!(
            "{}/v1/users/{user_id}/assets/collectibles",
            self.base_url
        ))?;
        url.query_pairs_mut().append_pair("limit", PAGE_LIMIT);
        if let Some(cursor) = &cursor {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(Error::PrivateInventory(user_id));
        }
        if !status.is_success() {
            return Err(Error::Response(status, response.text().await?));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|_| Error::Deserialize(text))
    }
}

/// Follows `nextPageCursor` until the API stops returning one.
pub(crate) async fn collect_pages<R, F>(request: R) -> Result<Vec<Collectible>>
where
    R: Fn(Option<String>) -> F,
    F: Future<Output = Result<CollectiblesPage>>,
{
    let mut collectibles = Vec::new();
    let mut cursor = None;

    loop {
        let page = request(cursor.take()).await?;
        collectibles.extend(page.data);

        match page.next_page_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    Ok(collectibles)
}
