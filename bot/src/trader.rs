use crate::market::{AdPoster, InventorySource, ValuationSource};
use crate::reconcile::{effective_value, Inventory};
use crate::report::Reporter;
use common::AssetId;
use rolimons::{AdRequest, PostOutcome, RequestTag, ValuationIndex};
use std::sync::Arc;

/// What gets posted on every cycle. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub(crate) struct AdSettings {
    pub user_id: i64,
    pub roli_verification: String,
    pub offer_item_ids: Vec<AssetId>,
    pub request_tags: Vec<RequestTag>,
    pub request_item_ids: Vec<AssetId>,
    pub dry_run: bool,
}

/// Result of one cycle, after every failure has been classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Posted { ad_url: String },
    Preview { offer_count: usize, total_value: i64 },
    Cooldown,
    AuthFailure,
    RateLimited,
    PrivateInventory(String),
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Posted { .. } | Self::Preview { .. })
    }
}

impl From<PostOutcome> for Outcome {
    fn from(outcome: PostOutcome) -> Self {
        match outcome {
            PostOutcome::Success { ad_url } => Self::Posted { ad_url },
            PostOutcome::Cooldown => Self::Cooldown,
            PostOutcome::AuthFailure => Self::AuthFailure,
            PostOutcome::RateLimited => Self::RateLimited,
            PostOutcome::Unknown { message } => Self::Failed(message),
        }
    }
}

impl From<roblox::Error> for Outcome {
    fn from(error: roblox::Error) -> Self {
        match error {
            roblox::Error::PrivateInventory(_) => Self::PrivateInventory(error.to_string()),
            other => Self::Failed(format!("Inventory fetch failed: {other}")),
        }
    }
}

impl From<rolimons::Error> for Outcome {
    fn from(error: rolimons::Error) -> Self {
        match error {
            rolimons::Error::RateLimited => Self::RateLimited,
            other => Self::Failed(format!("Rolimons item fetch failed: {other}")),
        }
    }
}

pub(crate) struct Trader {
    inventory: Arc<dyn InventorySource>,
    valuations: Arc<dyn ValuationSource>,
    poster: Arc<dyn AdPoster>,
    settings: AdSettings,
}

impl Trader {
    pub fn new(
        inventory: Arc<dyn InventorySource>,
        valuations: Arc<dyn ValuationSource>,
        poster: Arc<dyn AdPoster>,
        settings: AdSettings,
    ) -> Self {
        Self {
            inventory,
            valuations,
            poster,
            settings,
        }
    }

    pub fn settings(&self) -> &AdSettings {
        &self.settings
    }

    /// Fetches inventory and values side by side and reconciles them.
    pub async fn load_inventory(&self) -> Result<(Inventory, ValuationIndex), Outcome> {
        let (items, index) = tokio::join!(
            self.inventory.fetch_inventory(self.settings.user_id),
            self.valuations.fetch_valuations(),
        );
        let items = items?;
        let index = index?;

        Ok((Inventory::reconcile(&items, &index), index))
    }

    /// Runs one fetch, value and post cycle.
    pub async fn run_cycle(&self, reporter: &dyn Reporter) -> Outcome {
        let (inventory, index) = match self.load_inventory().await {
            Ok(loaded) => loaded,
            Err(outcome) => return outcome,
        };
        reporter.inventory_loaded(inventory.tradeable.len(), inventory.on_hold.len());

        let offer_count = self.settings.offer_item_ids.len();
        let total_value = self.offer_value(&inventory, &index, reporter);
        reporter.offer_summary(offer_count, total_value, &self.settings.request_tags);

        if self.settings.dry_run {
            return Outcome::Preview {
                offer_count,
                total_value,
            };
        }

        let request = AdRequest {
            player_id: self.settings.user_id,
            offer_item_ids: self.settings.offer_item_ids.clone(),
            request_item_ids: self.settings.request_item_ids.clone(),
            request_tags: self.settings.request_tags.clone(),
        };

        self.poster
            .post_ad(&request, &self.settings.roli_verification)
            .await
            .into()
    }

    fn offer_value(&self, inventory: &Inventory, index: &ValuationIndex, reporter: &dyn Reporter) -> i64 {
        self.settings
            .offer_item_ids
            .iter()
            .map(|id| match inventory.find(*id) {
                Some(item) => {
                    if item.on_hold {
                        reporter.warning(&format!("{} ({id}) is on hold", item.name));
                    }
                    item.value
                }
                None => {
                    reporter.warning(&format!("Offered item {id} is no longer in the inventory"));
                    index
                        .get(id)
                        .map(|record| effective_value(record.value, record.rap.unwrap_or_default()))
                        .unwrap_or_default()
                }
            })
            .sum()
    }
}
