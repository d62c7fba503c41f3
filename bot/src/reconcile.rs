use common::AssetId;
use roblox::InventoryItem;
use rolimons::{ValuationIndex, ValuationRecord};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

/// Inventory item merged with its Rolimons valuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnrichedItem {
    pub id: AssetId,
    pub name: String,
    pub rap: i64,
    /// Market value when Rolimons has a positive one, otherwise RAP.
    pub value: i64,
    pub projected: bool,
    pub rare: bool,
    /// Not listed on Rolimons yet.
    pub is_new: bool,
    pub on_hold: bool,
}

impl EnrichedItem {
    fn new(item: &InventoryItem, record: Option<&ValuationRecord>) -> Self {
        Self {
            id: item.id,
            name: record
                .and_then(|r| r.name.clone())
                .unwrap_or_else(|| item.name.clone()),
            rap: item.rap,
            value: effective_value(record.and_then(|r| r.value), item.rap),
            projected: record.is_some_and(|r| r.projected),
            rare: record.is_some_and(|r| r.rare),
            is_new: record.is_none(),
            on_hold: item.on_hold,
        }
    }

    pub fn flags(&self) -> String {
        let mut flags = String::new();
        if self.projected {
            flags.push_str(" 📈");
        }
        if self.rare {
            flags.push_str(" 💎");
        }
        if self.is_new {
            flags.push_str(" 🆕");
        }
        flags
    }
}

pub(crate) fn effective_value(market_value: Option<i64>, rap: i64) -> i64 {
    market_value.filter(|value| *value > 0).unwrap_or(rap)
}

/// Position of one copy among all copies sharing its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub rank: usize,
    pub total: usize,
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.rank, self.total)
    }
}

pub(crate) fn occurrences(ids: &[AssetId]) -> Vec<Occurrence> {
    let mut totals: HashMap<AssetId, usize> = HashMap::new();
    for id in ids {
        *totals.entry(*id).or_default() += 1;
    }

    let mut seen: HashMap<AssetId, usize> = HashMap::new();
    ids.iter()
        .map(|id| {
            let rank = seen.entry(*id).or_default();
            *rank += 1;
            Occurrence {
                rank: *rank,
                total: totals[id],
            }
        })
        .collect()
}

/// Reconciled inventory, both halves sorted by RAP descending.
#[derive(Debug, Default)]
pub(crate) struct Inventory {
    pub tradeable: Vec<EnrichedItem>,
    pub on_hold: Vec<EnrichedItem>,
}

impl Inventory {
    pub fn reconcile(items: &[InventoryItem], index: &ValuationIndex) -> Self {
        let (mut on_hold, mut tradeable): (Vec<_>, Vec<_>) = items
            .iter()
            .map(|item| EnrichedItem::new(item, index.get(&item.id)))
            .partition(|item| item.on_hold);

        // stable, so equal-RAP copies keep the API's order between runs
        tradeable.sort_by_key(|item| Reverse(item.rap));
        on_hold.sort_by_key(|item| Reverse(item.rap));

        Self { tradeable, on_hold }
    }

    pub fn len(&self) -> usize {
        self.tradeable.len() + self.on_hold.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedItem> {
        self.tradeable.iter().chain(&self.on_hold)
    }

    pub fn find(&self, id: AssetId) -> Option<&EnrichedItem> {
        self.iter().find(|item| item.id == id)
    }

    /// Display names of every item, tradeable first. Copies of one id get a `[rank/total]` suffix.
    pub fn labels(&self) -> Vec<String> {
        let ids: Vec<_> = self.iter().map(|item| item.id).collect();
        self.iter()
            .zip(occurrences(&ids))
            .map(|(item, occurrence)| {
                if occurrence.total > 1 {
                    format!("{} {occurrence}", item.name)
                } else {
                    item.name.clone()
                }
            })
            .collect()
    }

    /// Marks tradeable copies that are part of `offer_ids`. Each configured id claims one copy.
    pub fn offered(&self, offer_ids: &[AssetId]) -> Vec<bool> {
        let mut remaining = offer_ids.to_vec();
        self.tradeable
            .iter()
            .map(|item| match remaining.iter().position(|id| *id == item.id) {
                Some(position) => {
                    remaining.remove(position);
                    true
                }
                None => false,
            })
            .collect()
    }

    /// Inventory listing as printed by `--inventory`.
    pub fn render(&self, offer_ids: &[AssetId]) -> Vec<String> {
        let labels = self.labels();
        let offered = self.offered(offer_ids);
        let mut lines = Vec::with_capacity(self.len() + 1);

        for ((item, label), offered) in self.tradeable.iter().zip(&labels).zip(offered) {
            let mark = if offered { "[x]" } else { "[ ]" };
            lines.push(format!("{mark} {}", item_line(item, label)));
        }

        if !self.on_hold.is_empty() {
            lines.push("─── On Hold  (cannot be traded right now) ───".to_string());
            for (item, label) in self.on_hold.iter().zip(&labels[self.tradeable.len()..]) {
                lines.push(format!("    {}", item_line(item, label)));
            }
        }

        lines
    }
}

fn item_line(item: &EnrichedItem, label: &str) -> String {
    format!(
        "{label:<42}  RAP: {:>8}  Value: {:>8}{}",
        thousands(item.rap),
        thousands(item.value),
        item.flags()
    )
}

pub(crate) fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
