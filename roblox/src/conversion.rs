use crate::http::{Collectible, InventoryItem};

const UNKNOWN_NAME: &str = "Unknown";

impl Collectible {
    /// Records without an asset id cannot be offered and are dropped.
    pub(crate) fn into_item(self) -> Option<InventoryItem> {
        let id = self.asset_id.filter(|id| id.0 != 0)?;
        Some(InventoryItem {
            id,
            name: self.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            rap: self.recent_average_price.unwrap_or_default(),
            on_hold: self.is_on_hold.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AssetId;

    #[test]
    fn fills_missing_fields() {
        let collectible = Collectible {
            asset_id: Some(AssetId(42)),
            name: None,
            recent_average_price: None,
            is_on_hold: None,
        };
        assert_eq!(
            collectible.into_item(),
            Some(InventoryItem {
                id: AssetId(42),
                name: "Unknown".into(),
                rap: 0,
                on_hold: false,
            })
        );
    }

    #[test]
    fn drops_records_without_asset_id() {
        for asset_id in [None, Some(AssetId(0))] {
            let collectible = Collectible {
                asset_id,
                name: Some("Dominus".into()),
                recent_average_price: Some(10),
                is_on_hold: Some(false),
            };
            assert_eq!(collectible.into_item(), None);
        }
    }
}
