//! Command-line shell over [`MarketSession`].
//!
//! Every subcommand prints one JSON document on stdout: the session's source
//! state, any pending failure notice, and the `ApiResponse` envelope.

use crate::commands::settings::{get_settings, update_settings, UpdateSettingsParams};
use crate::commands::{InventoryQuery, MarketSession};
use crate::error::{GatewayError, StorageError};
use crate::fallback::{FailureNotice, SourceState};
use crate::gateway::HttpGateway;
use crate::models::{
    ApiResponse, Exterior, FilterSpec, FilterVocabulary, ItemCategory, NumericRange, PageSpec,
    QueryResult, Rarity, Settings, SortDirection, SortField, SortSpec, SourceConfig, TimeRange,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
    /// The command ran but the response reports a failure.
    #[error("{0}")]
    Failed(String),
}

#[derive(Parser, Debug)]
#[clap(
    name = "skinmarket",
    version,
    about = "Browse CS:GO skin listings from a public price list or an inventory API."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Query this inventory API instead of the price list.
    #[clap(long, global = true, env = "SKINMARKET_INVENTORY_API", value_name = "URL")]
    pub inventory_api: Option<String>,

    /// Price list document to fetch instead of the built-in one.
    #[clap(long, global = true, value_name = "URL")]
    pub price_list_url: Option<String>,

    /// Use the unlocked-only price list.
    #[clap(long, global = true)]
    pub unlocked_only: bool,

    /// Request timeout in seconds.
    #[clap(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// If the live fetch fails, continue with the offline catalog.
    #[clap(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of the catalog.
    List(ListArgs),
    /// Show a single listing.
    Show {
        id: String,
    },
    /// Price history of a listing.
    History {
        id: String,
        /// 7d, 30d, 90d, 1y or all.
        #[clap(long, default_value = "30d")]
        range: TimeRange,
    },
    /// Values accepted by the filter flags.
    Filters,
    /// Show or change persisted settings.
    Settings(SettingsArgs),
}

fn parse_label<T: DeserializeOwned>(input: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(input.trim().to_string()))
        .map_err(|_| format!("unknown value: {}", input))
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Weapon category, e.g. "Knife" or "Sniper Rifle". Repeatable.
    #[clap(long = "type", value_name = "CATEGORY", value_parser = parse_label::<ItemCategory>)]
    pub categories: Vec<ItemCategory>,
    /// Rarity, e.g. "Covert". Repeatable.
    #[clap(long = "rarity", value_parser = parse_label::<Rarity>)]
    pub rarities: Vec<Rarity>,
    /// Exterior, e.g. "Factory New". Repeatable.
    #[clap(long = "exterior", value_parser = parse_label::<Exterior>)]
    pub exteriors: Vec<Exterior>,
    #[clap(long)]
    pub min_price: Option<f64>,
    #[clap(long)]
    pub max_price: Option<f64>,
    #[clap(long)]
    pub min_float: Option<f64>,
    #[clap(long)]
    pub max_float: Option<f64>,
    /// Only listings with stickers applied.
    #[clap(long)]
    pub has_stickers: bool,
    #[clap(long, value_name = "BOOL")]
    pub stat_trak: Option<bool>,
    #[clap(long, value_name = "BOOL")]
    pub souvenir: Option<bool>,
    /// price, float or name. Unsorted when omitted.
    #[clap(long, value_parser = parse_label::<SortField>)]
    pub sort: Option<SortField>,
    /// asc or desc.
    #[clap(long, default_value = "asc", value_parser = parse_label::<SortDirection>)]
    pub order: SortDirection,
    #[clap(long, default_value_t = 1)]
    pub page: u32,
    /// Page size; defaults to the configured one.
    #[clap(long)]
    pub limit: Option<u32>,
}

fn range(min: Option<f64>, max: Option<f64>) -> Option<NumericRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(NumericRange::new(
        min.unwrap_or(0.0),
        max.unwrap_or(f64::INFINITY),
    ))
}

fn non_empty<T>(values: &[T]) -> Option<Vec<T>>
where
    T: Clone,
{
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

impl ListArgs {
    pub fn to_query(&self, default_limit: u32) -> InventoryQuery {
        let filter = FilterSpec {
            categories: non_empty(&self.categories),
            rarities: non_empty(&self.rarities),
            exteriors: non_empty(&self.exteriors),
            price_range: range(self.min_price, self.max_price),
            float_range: range(self.min_float, self.max_float),
            has_stickers: self.has_stickers.then_some(true),
            is_stat_trak: self.stat_trak,
            is_souvenir: self.souvenir,
        };

        InventoryQuery {
            filter: (!filter.is_empty()).then_some(filter),
            sort: self.sort.map(|field| SortSpec::new(field, self.order)),
            page: PageSpec::new(self.page, self.limit.unwrap_or(default_limit)),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Persist an explicit price list URL ("" resets it).
    #[clap(long, value_name = "URL")]
    pub set_price_list_url: Option<String>,
    /// Persist an inventory API base URL ("" switches back to the price list).
    #[clap(long, value_name = "URL")]
    pub set_inventory_api: Option<String>,
    #[clap(long, value_name = "SECS")]
    pub set_timeout: Option<u64>,
    #[clap(long, value_name = "N")]
    pub set_page_size: Option<u32>,
    #[clap(long, value_name = "BOOL")]
    pub set_unlocked_only: Option<bool>,
}

impl SettingsArgs {
    fn to_params(&self) -> Option<UpdateSettingsParams> {
        let params = UpdateSettingsParams {
            price_list_url: self.set_price_list_url.clone(),
            inventory_api_url: self.set_inventory_api.clone(),
            request_timeout_secs: self.set_timeout,
            page_size: self.set_page_size,
            unlocked_only: self.set_unlocked_only,
        };
        let changed = params.price_list_url.is_some()
            || params.inventory_api_url.is_some()
            || params.request_timeout_secs.is_some()
            || params.page_size.is_some()
            || params.unlocked_only.is_some();
        changed.then_some(params)
    }
}

impl Cli {
    /// One-run overrides on top of the persisted settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(base_url) = &self.inventory_api {
            settings.source = SourceConfig::InventoryApi {
                base_url: base_url.clone(),
            };
        } else if let Some(url) = &self.price_list_url {
            settings.source = SourceConfig::PriceList {
                url: Some(url.clone()),
            };
        }
        if self.unlocked_only {
            settings.unlocked_only = true;
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout.max(1);
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<T> {
    source: SourceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureNotice>,
    #[serde(flatten)]
    response: ApiResponse<T>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit<T: Serialize>(session: &MarketSession, response: ApiResponse<T>) -> Result<(), CliError> {
    let failed = (!response.success).then(|| {
        response
            .error
            .clone()
            .unwrap_or_else(|| "request failed".to_string())
    });
    print_json(&Output {
        source: session.source_state(),
        failure: session.pending_failure(),
        response,
    })?;
    match failed {
        Some(message) => Err(CliError::Failed(message)),
        None => Ok(()),
    }
}

fn superseded<T>() -> ApiResponse<T> {
    ApiResponse::failure("Request superseded by a newer one", "stale")
}

/// Whether to fall through to the offline catalog after `response`.
fn should_go_offline<T>(cli: &Cli, session: &MarketSession, response: &ApiResponse<T>) -> bool {
    cli.offline && !response.success && session.pending_failure().is_some()
}

async fn switch_offline(session: &MarketSession) -> ApiResponse<QueryResult> {
    warn!("Live source failed, switching to offline data");
    session
        .use_offline_data()
        .await
        .into_current()
        .unwrap_or_else(superseded)
}

fn run_settings(args: &SettingsArgs) -> Result<(), CliError> {
    let settings = match args.to_params() {
        Some(params) => update_settings(params)?,
        None => get_settings()?,
    };
    print_json(&ApiResponse::ok(settings))
}

pub async fn execute(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Settings(args) => return run_settings(args),
        Commands::Filters => return print_json(&ApiResponse::ok(FilterVocabulary::default())),
        _ => {}
    }

    let mut settings = get_settings()?;
    cli.apply_overrides(&mut settings);
    let session = MarketSession::new(Arc::new(HttpGateway::new(&settings)?));

    match &cli.command {
        Commands::List(args) => {
            let query = args.to_query(settings.page_size);
            let mut response = session
                .load_inventory(query)
                .await
                .into_current()
                .unwrap_or_else(superseded);
            if should_go_offline(&cli, &session, &response) {
                response = switch_offline(&session).await;
            }
            emit(&session, response)
        }
        Commands::Show { id } => {
            let mut response = session.item_details(id).await;
            if should_go_offline(&cli, &session, &response) {
                switch_offline(&session).await;
                response = session.item_details(id).await;
            }
            emit(&session, response)
        }
        Commands::History { id, range } => {
            let mut response = session.price_history(id, *range, Utc::now()).await;
            if should_go_offline(&cli, &session, &response) {
                switch_offline(&session).await;
                response = session.price_history(id, *range, Utc::now()).await;
            }
            emit(&session, response)
        }
        Commands::Settings(_) | Commands::Filters => Ok(()),
    }
}
