// Settings data models
use serde::{Deserialize, Serialize};

pub const FULL_PRICE_LIST_URL: &str = "https://lis-skins.com/market_export_json/api_csgo_full.json";
pub const UNLOCKED_PRICE_LIST_URL: &str =
    "https://lis-skins.com/market_export_json/api_csgo_unlocked.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Which upstream the gateway talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceConfig {
    /// One static JSON document holding the whole catalog; queries run locally.
    #[serde(rename_all = "camelCase")]
    PriceList { url: Option<String> },
    /// `GET /inventory` style endpoint that filters, sorts and pages remotely.
    #[serde(rename_all = "camelCase")]
    InventoryApi { base_url: String },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::PriceList { url: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Use the unlocked-only price list when no explicit URL is configured.
    #[serde(default)]
    pub unlocked_only: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    super::query::DEFAULT_PAGE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_size: super::query::DEFAULT_PAGE_SIZE,
            unlocked_only: false,
        }
    }
}

impl Settings {
    /// Price list URL the gateway should fetch in price-list mode.
    pub fn price_list_url(&self) -> String {
        match &self.source {
            SourceConfig::PriceList { url: Some(url) } if !url.is_empty() => url.clone(),
            _ if self.unlocked_only => UNLOCKED_PRICE_LIST_URL.to_string(),
            _ => FULL_PRICE_LIST_URL.to_string(),
        }
    }
}
