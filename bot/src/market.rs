//! Seams between the bot and the remote services.
use async_trait::async_trait;
use roblox::InventoryItem;
use rolimons::{AdRequest, PostOutcome, ValuationIndex};

#[async_trait]
pub(crate) trait InventorySource: Send + Sync {
    async fn fetch_inventory(&self, user_id: i64) -> roblox::Result<Vec<InventoryItem>>;
}

#[async_trait]
pub(crate) trait ValuationSource: Send + Sync {
    async fn fetch_valuations(&self) -> rolimons::Result<ValuationIndex>;
}

#[async_trait]
pub(crate) trait AdPoster: Send + Sync {
    async fn post_ad(&self, request: &AdRequest, roli_verification: &str) -> PostOutcome;
}

#[async_trait]
impl InventorySource for roblox::HttpClient {
    async fn fetch_inventory(&self, user_id: i64) -> roblox::Result<Vec<InventoryItem>> {
        roblox::HttpClient::fetch_inventory(self, user_id).await
    }
}

#[async_trait]
impl ValuationSource for rolimons::HttpClient {
    async fn fetch_valuations(&self) -> rolimons::Result<ValuationIndex> {
        self.fetch_item_details().await
    }
}

#[async_trait]
impl AdPoster for rolimons::HttpClient {
    async fn post_ad(&self, request: &AdRequest, roli_verification: &str) -> PostOutcome {
        self.create_trade_ad(request, roli_verification).await
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use rolimons::ValuationRecord;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Respond<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;

    pub(crate) struct FakeInventory {
        respond: Respond<Vec<InventoryItem>, roblox::Error>,
    }

    impl FakeInventory {
        pub fn items(items: Vec<InventoryItem>) -> Self {
            Self {
                respond: Box::new(move || Ok(items.clone())),
            }
        }

        pub fn failing(error: impl Fn() -> roblox::Error + Send + Sync + 'static) -> Self {
            Self {
                respond: Box::new(move || Err(error())),
            }
        }
    }

    #[async_trait]
    impl InventorySource for FakeInventory {
        async fn fetch_inventory(&self, _user_id: i64) -> roblox::Result<Vec<InventoryItem>> {
            (self.respond)()
        }
    }

    pub(crate) struct FakeValuations {
        respond: Respond<ValuationIndex, rolimons::Error>,
    }

    impl FakeValuations {
        pub fn records(records: Vec<ValuationRecord>) -> Self {
            Self {
                respond: Box::new(move || Ok(records.iter().cloned().collect())),
            }
        }

        pub fn failing(error: impl Fn() -> rolimons::Error + Send + Sync + 'static) -> Self {
            Self {
                respond: Box::new(move || Err(error())),
            }
        }
    }

    #[async_trait]
    impl ValuationSource for FakeValuations {
        async fn fetch_valuations(&self) -> rolimons::Result<ValuationIndex> {
            (self.respond)()
        }
    }

    /// Replays scripted outcomes, then repeats `fallback`.
    pub(crate) struct FakePoster {
        script: Mutex<VecDeque<PostOutcome>>,
        fallback: PostOutcome,
        requests: Mutex<Vec<AdRequest>>,
    }

    impl FakePoster {
        pub fn always(outcome: PostOutcome) -> Self {
            Self::scripted(vec![], outcome)
        }

        pub fn scripted(script: Vec<PostOutcome>, fallback: PostOutcome) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<AdRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AdPoster for FakePoster {
        async fn post_ad(&self, request: &AdRequest, _roli_verification: &str) -> PostOutcome {
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }
}
