// Blocking HTTP gateway (ureq) for the price-list and inventory-API upstreams
use super::{LogObserver, RequestObserver, SourceGateway};
use crate::catalog::normalize;
use crate::error::GatewayError;
use crate::models::{
    page_count, FieldValue, FilterSpec, Item, PageSpec, PricePoint, QueryResult, RawRecord,
    Settings, SortSpec, SourceConfig,
};
use crate::query::{run_query, RawListing};
use crate::utils::parse_date_like;
use log::debug;
use serde_json::Value;
use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const PRICE_HISTORY: &str = "Price history";

#[derive(Debug, Clone)]
enum Upstream {
    PriceList { url: String },
    InventoryApi { base: Url },
}

/// Which call a status code came back from; 404 and friends mean different
/// things per endpoint.
enum Endpoint<'a> {
    Catalog,
    Detail(&'a str),
    PriceHistory(&'a str),
}

impl Endpoint<'_> {
    fn status_error(&self, status: u16, body: String) -> GatewayError {
        match (self, status) {
            (Endpoint::Detail(id), 404) | (Endpoint::PriceHistory(id), 404) => {
                GatewayError::NotFound(id.to_string())
            }
            (Endpoint::PriceHistory(_), 405) | (Endpoint::PriceHistory(_), 501) => {
                GatewayError::Unsupported(PRICE_HISTORY.to_string())
            }
            _ => GatewayError::ErrorResponse { status, body },
        }
    }
}

pub struct HttpGateway {
    agent: ureq::Agent,
    upstream: Upstream,
    timeout_secs: u64,
    observer: Arc<dyn RequestObserver>,
}

impl HttpGateway {
    pub fn new(settings: &Settings) -> Result<Self, GatewayError> {
        Self::with_observer(settings, Arc::new(LogObserver))
    }

    pub fn with_observer(
        settings: &Settings,
        observer: Arc<dyn RequestObserver>,
    ) -> Result<Self, GatewayError> {
        let upstream = match &settings.source {
            SourceConfig::PriceList { .. } => Upstream::PriceList {
                url: settings.price_list_url(),
            },
            SourceConfig::InventoryApi { base_url } => Upstream::InventoryApi {
                base: parse_base_url(base_url)?,
            },
        };
        let timeout_secs = settings.request_timeout_secs.max(1);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();

        Ok(Self {
            agent,
            upstream,
            timeout_secs,
            observer,
        })
    }

    fn report<T>(&self, url: &str, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        if let Err(e) = &result {
            self.observer.on_error(url, e);
        }
        result
    }

    fn get_json(&self, url: &str, endpoint: Endpoint<'_>) -> Result<Value, GatewayError> {
        self.observer.on_request("GET", url);

        let result = match self.agent.get(url).call() {
            Ok(response) => {
                let status = response.status();
                response
                    .into_json::<Value>()
                    .map(|body| (status, body))
                    .map_err(|e| self.map_body_error(e))
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(endpoint.status_error(status, body))
            }
            Err(ureq::Error::Transport(transport)) => Err(self.map_transport(transport)),
        };

        match result {
            Ok((status, body)) => {
                self.observer.on_response(url, status, &summarize(&body));
                Ok(body)
            }
            Err(e) => {
                self.observer.on_error(url, &e);
                Err(e)
            }
        }
    }

    fn map_transport(&self, transport: ureq::Transport) -> GatewayError {
        if source_timed_out(&transport) {
            GatewayError::Timeout(self.timeout_secs)
        } else {
            GatewayError::NoResponse(transport.to_string())
        }
    }

    fn map_body_error(&self, err: io::Error) -> GatewayError {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                GatewayError::Timeout(self.timeout_secs)
            }
            io::ErrorKind::InvalidData => {
                GatewayError::UnexpectedShape(format!("response is not JSON: {}", err))
            }
            _ => GatewayError::NoResponse(err.to_string()),
        }
    }

    fn load_price_list(&self, url: &str) -> Result<Vec<RawRecord>, GatewayError> {
        let doc = self.get_json(url, Endpoint::Catalog)?;
        self.report(url, price_list_records(&doc))
    }

    fn price_list_catalog(
        &self,
        url: &str,
        filter: Option<&FilterSpec>,
        sort: Option<&SortSpec>,
        page: PageSpec,
    ) -> Result<QueryResult, GatewayError> {
        let listings: Vec<RawListing> = self
            .load_price_list(url)?
            .into_iter()
            .map(RawListing::new)
            .collect();
        let result = run_query(&listings, filter, sort, page);
        debug!(
            "Price list query matched {} of {} records",
            result.total,
            listings.len()
        );
        Ok(result.map(|listing| normalize(&listing.record)))
    }

    fn price_list_detail(&self, url: &str, id: &str) -> Result<Item, GatewayError> {
        let records = self.load_price_list(url)?;
        let found = records
            .iter()
            .find(|record| record.id_text().as_deref() == Some(id))
            .map(normalize)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()));
        self.report(url, found)
    }
}

impl SourceGateway for HttpGateway {
    fn fetch_catalog(
        &self,
        filter: Option<&FilterSpec>,
        sort: Option<&SortSpec>,
        page: PageSpec,
    ) -> Result<QueryResult, GatewayError> {
        let page = PageSpec::new(page.page, page.limit);
        match &self.upstream {
            Upstream::PriceList { url } => self.price_list_catalog(url, filter, sort, page),
            Upstream::InventoryApi { base } => {
                let url = inventory_url(base, filter, sort, page)?;
                let doc = self.get_json(url.as_str(), Endpoint::Catalog)?;
                self.report(url.as_str(), inventory_page(&doc, page))
            }
        }
    }

    fn fetch_item_detail(&self, id: &str) -> Result<Item, GatewayError> {
        match &self.upstream {
            Upstream::PriceList { url } => self.price_list_detail(url, id),
            Upstream::InventoryApi { base } => {
                let url = endpoint(base, &["skins", id])?;
                let doc = self.get_json(url.as_str(), Endpoint::Detail(id))?;
                let item = if doc.is_object() {
                    Ok(normalize(&RawRecord::from_json(&doc)))
                } else {
                    Err(GatewayError::UnexpectedShape(
                        "skin detail is not an object".to_string(),
                    ))
                };
                self.report(url.as_str(), item)
            }
        }
    }

    fn fetch_price_history(&self, id: &str) -> Result<Vec<PricePoint>, GatewayError> {
        match &self.upstream {
            Upstream::PriceList { url } => self.report(
                url,
                Err(GatewayError::Unsupported(PRICE_HISTORY.to_string())),
            ),
            Upstream::InventoryApi { base } => {
                let url = endpoint(base, &["skins", id, "price-history"])?;
                let doc = self.get_json(url.as_str(), Endpoint::PriceHistory(id))?;
                self.report(url.as_str(), price_points(&doc))
            }
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| GatewayError::InvalidRequest(format!("bad base URL {}: {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        _ => Err(GatewayError::InvalidRequest(format!(
            "base URL must be http(s): {}",
            base_url
        ))),
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidRequest(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn inventory_url(
    base: &Url,
    filter: Option<&FilterSpec>,
    sort: Option<&SortSpec>,
    page: PageSpec,
) -> Result<Url, GatewayError> {
    let mut url = endpoint(base, &["inventory"])?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(filter) = filter {
            for category in filter.active_categories().unwrap_or_default() {
                query.append_pair("type", category.label());
            }
            for rarity in filter.active_rarities().unwrap_or_default() {
                query.append_pair("rarity", rarity.label());
            }
            for exterior in filter.active_exteriors().unwrap_or_default() {
                query.append_pair("exterior", exterior.label());
            }
            if let Some(range) = &filter.price_range {
                query.append_pair("minPrice", &range.min.to_string());
                if range.is_bounded_above() {
                    query.append_pair("maxPrice", &range.max.to_string());
                }
            }
            if let Some(range) = &filter.float_range {
                query.append_pair("minFloat", &range.min.to_string());
                if range.is_bounded_above() {
                    query.append_pair("maxFloat", &range.max.to_string());
                }
            }
            if filter.has_stickers == Some(true) {
                query.append_pair("hasStickers", "true");
            }
            if let Some(stat_trak) = filter.is_stat_trak {
                query.append_pair("isStatTrak", &stat_trak.to_string());
            }
            if let Some(souvenir) = filter.is_souvenir {
                query.append_pair("isSouvenir", &souvenir.to_string());
            }
        }
        if let Some(sort) = sort {
            query.append_pair("sortBy", sort.field.as_str());
            query.append_pair("sortOrder", sort.direction.as_str());
        }
        query.append_pair("page", &page.page.to_string());
        query.append_pair("limit", &page.limit.to_string());
    }
    Ok(url)
}

fn price_list_records(doc: &Value) -> Result<Vec<RawRecord>, GatewayError> {
    let status = doc.get("status").and_then(Value::as_str);
    let items = doc.get("items").and_then(Value::as_array);
    match (status, items) {
        (Some("success"), Some(items)) => Ok(items.iter().map(RawRecord::from_json).collect()),
        (Some("success"), None) => Err(GatewayError::UnexpectedShape(
            "price list has no items array".to_string(),
        )),
        (Some(other), _) => Err(GatewayError::UnexpectedShape(format!(
            "price list status is \"{}\"",
            other
        ))),
        (None, _) => Err(GatewayError::UnexpectedShape(
            "price list has no status field".to_string(),
        )),
    }
}

fn inventory_page(doc: &Value, page: PageSpec) -> Result<QueryResult, GatewayError> {
    let records = doc.get("items").and_then(Value::as_array).ok_or_else(|| {
        GatewayError::UnexpectedShape("inventory response has no items array".to_string())
    })?;
    let items: Vec<Item> = records
        .iter()
        .map(|value| normalize(&RawRecord::from_json(value)))
        .collect();

    let total_pages = count_field(doc, "totalPages");
    let total = match (count_field(doc, "total"), total_pages) {
        (Some(total), _) => total as usize,
        (None, Some(pages)) => (pages as usize).saturating_mul(page.size()),
        (None, None) => {
            return Err(GatewayError::UnexpectedShape(
                "inventory response has no total".to_string(),
            ))
        }
    };
    let page_number = count_field(doc, "page").map_or(page.page, |p| (p as u32).max(1));
    let total_pages = total_pages.map_or_else(|| page_count(total, page.size()), |p| p as u32);

    Ok(QueryResult {
        items,
        total,
        page: page_number,
        page_size: page.limit,
        total_pages,
    })
}

/// Envelope counters, read with the same coercion as record fields.
fn count_field(doc: &Value, key: &str) -> Option<u64> {
    FieldValue::from_json(doc.get(key))
        .as_number()
        .map(|n| n.max(0.0).trunc() as u64)
}

fn price_points(doc: &Value) -> Result<Vec<PricePoint>, GatewayError> {
    let entries = doc.as_array().ok_or_else(|| {
        GatewayError::UnexpectedShape("price history is not an array".to_string())
    })?;

    let mut points: Vec<PricePoint> = entries
        .iter()
        .filter_map(|entry| {
            let date = parse_date_like(&FieldValue::from_json(entry.get("date")));
            let price = FieldValue::from_json(entry.get("price")).as_number();
            match (date, price) {
                (Some(date), Some(price)) => Some(PricePoint { date, price }),
                _ => {
                    debug!("Skipping malformed price point: {}", entry);
                    None
                }
            }
        })
        .collect();
    points.sort_by_key(|point| point.date);
    Ok(points)
}

fn source_timed_out(transport: &ureq::Transport) -> bool {
    let mut source = transport.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        source = err.source();
    }
    transport.to_string().contains("timed out")
}

fn summarize(body: &Value) -> String {
    match body {
        Value::Object(map) => {
            let status = map.get("status").and_then(Value::as_str);
            let count = map.get("items").and_then(Value::as_array).map(Vec::len);
            match (status, count) {
                (Some(status), Some(count)) => format!("status {}, {} items", status, count),
                (None, Some(count)) => format!("{} items", count),
                _ => "object".to_string(),
            }
        }
        Value::Array(entries) => format!("{} entries", entries.len()),
        _ => "scalar".to_string(),
    }
}
