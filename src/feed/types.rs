use serde::Deserialize;

/// One monitored price reference, as published in the feed list.
///
/// Only `name` is required on the wire. Everything else is display metadata
/// the listing core never interprets, apart from the category key used for
/// grouping (see [`Feed::group_key`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// Unique within a catalog. Also the identity key of the item widget.
    pub name: String,
    /// Explicit pair-group key (e.g. "USD", "ETH", "Forex").
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Base and quote symbols, e.g. `["ETH", "USD"]`.
    #[serde(default)]
    pub pair: Vec<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub value_prefix: Option<String>,
    #[serde(default)]
    pub decimal_places: Option<u32>,
    /// Maximum seconds between on-chain updates.
    #[serde(default)]
    pub heartbeat: Option<u64>,
    #[serde(default)]
    pub network_id: Option<u64>,
    /// Off-chain reference page used when comparison display is enabled.
    #[serde(default)]
    pub compare_offchain: Option<String>,
}

impl Feed {
    /// Feed with only a name and a category, everything else empty.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            contract_address: None,
            pair: Vec::new(),
            path: None,
            value_prefix: None,
            decimal_places: None,
            heartbeat: None,
            network_id: None,
            compare_offchain: None,
        }
    }

    /// The key this feed is grouped under.
    ///
    /// An explicit, non-blank `category` wins; otherwise the quote symbol of
    /// `pair`. `None` means the feed carries no usable key at all.
    pub fn group_key(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| {
                self.pair
                    .get(1)
                    .map(|q| q.trim())
                    .filter(|q| !q.is_empty())
            })
    }

    /// "ETH/USD" style pair label, if the pair is complete.
    pub fn pair_label(&self) -> Option<String> {
        match self.pair.as_slice() {
            [base, quote, ..] => Some(format!("{}/{}", base, quote)),
            _ => None,
        }
    }
}
