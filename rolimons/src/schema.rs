use common::AssetId;
use derive_more::{Deref, From};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

// Positions inside a Rolimons item array:
// [name, acronym, rap, value, default_value, demand, trend, projected, hyped, rare]
const NAME: usize = 0;
const RAP: usize = 2;
const VALUE: usize = 3;
const PROJECTED: usize = 7;
const RARE: usize = 9;

/// Valuation of a single item. `None` means Rolimons has no figure for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationRecord {
    pub id: AssetId,
    pub name: Option<String>,
    pub rap: Option<i64>,
    pub value: Option<i64>,
    pub projected: bool,
    pub rare: bool,
}

impl ValuationRecord {
    pub(crate) fn from_fields(id: AssetId, fields: &[Value]) -> Self {
        let number = |offset: usize| {
            fields
                .get(offset)
                .and_then(Value::as_i64)
                .filter(|n| *n >= 0)
        };
        let flag = |offset: usize| fields.get(offset).and_then(Value::as_i64) == Some(1);

        Self {
            id,
            name: fields
                .get(NAME)
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            rap: number(RAP),
            value: number(VALUE),
            projected: flag(PROJECTED),
            rare: flag(RARE),
        }
    }
}

/// Snapshot of the Rolimons item table keyed by asset id.
#[derive(Debug, Default, Clone, Deref, From)]
pub struct ValuationIndex(HashMap<AssetId, ValuationRecord>);

impl ValuationIndex {
    pub(crate) fn from_items(items: HashMap<String, Vec<Value>>) -> Self {
        let mut records = HashMap::with_capacity(items.len());
        for (key, fields) in items {
            match key.parse::<i64>() {
                Ok(id) => {
                    let id = AssetId(id);
                    records.insert(id, ValuationRecord::from_fields(id, &fields));
                }
                Err(_) => log::warn!("Skipping Rolimons item with invalid id {key:?}"),
            }
        }
        Self(records)
    }
}

impl FromIterator<ValuationRecord> for ValuationIndex {
    fn from_iter<I: IntoIterator<Item = ValuationRecord>>(iter: I) -> Self {
        Self(iter.into_iter().map(|record| (record.id, record)).collect())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub(crate) struct ItemDetailsResponse {
    pub success: bool,
    pub item_count: Option<usize>,
    #[serde(default)]
    pub items: HashMap<String, Vec<Value>>,
}

/// What the poster is looking for in return.
#[derive(
    Debug,
    Display,
    EnumString,
    EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RequestTag {
    Any,
    Demand,
    Rares,
    Robux,
    Upgrade,
    Downgrade,
    Rap,
    Wishlist,
    Projecteds,
    Adds,
}

#[derive(Debug)]
pub struct UnknownTag(String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<_> = RequestTag::iter().map(|tag| tag.to_string()).collect();
        write!(
            f,
            "unknown request tag {:?}, expected one of: {}",
            self.0,
            valid.join(", ")
        )
    }
}

impl TryFrom<String> for RequestTag {
    type Error = UnknownTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RequestTag::from_str(value.trim()).map_err(|_| UnknownTag(value))
    }
}

/// Body of a create-ad call.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AdRequest {
    pub player_id: i64,
    pub offer_item_ids: Vec<AssetId>,
    pub request_item_ids: Vec<AssetId>,
    pub request_tags: Vec<RequestTag>,
}

/// Result of one create-ad call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Success { ad_url: String },
    /// Less than 15 minutes since the last successful post.
    Cooldown,
    /// `_RoliVerification` cookie rejected.
    AuthFailure,
    /// Daily cap of 60 ads exceeded.
    RateLimited,
    Unknown { message: String },
}

impl PostOutcome {
    pub(crate) fn from_status(status: StatusCode, ad_url: String) -> Self {
        match status {
            StatusCode::CREATED => Self::Success { ad_url },
            StatusCode::BAD_REQUEST => Self::Cooldown,
            StatusCode::UNPROCESSABLE_ENTITY => Self::AuthFailure,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            other => Self::Unknown {
                message: format!("Unexpected response: HTTP {}", other.as_u16()),
            },
        }
    }
}
