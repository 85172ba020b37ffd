// Listing / detail / history handlers behind the presentation layer
use crate::error::{FallbackError, GatewayError};
use crate::fallback::dataset::offline_items;
use crate::fallback::{FailureNotice, FallbackController, SourceState};
use crate::gateway::SourceGateway;
use crate::models::{
    ApiResponse, FilterSpec, Item, PageSpec, PricePoint, QueryResult, SortSpec, TimeRange,
};
use crate::query::run_query;
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Everything the listing page asks for in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    #[serde(default)]
    pub filter: Option<FilterSpec>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub page: PageSpec,
}

/// Outcome of a catalog request. `Stale` means a newer request already
/// landed, so this response was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    Current(T),
    Stale,
}

impl<T> Delivery<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Delivery::Current(value) => Some(value),
            Delivery::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Delivery::Stale)
    }
}

#[derive(Default)]
struct SessionState {
    controller: FallbackController,
    last_query: Option<InventoryQuery>,
    listing: Option<QueryResult>,
    applied_generation: u64,
}

/// One user's view of the market. Catalog requests are tagged with a
/// generation so a slow response can never overwrite a newer one.
pub struct MarketSession {
    gateway: Arc<dyn SourceGateway>,
    offline: Arc<Vec<Item>>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

impl MarketSession {
    pub fn new(gateway: Arc<dyn SourceGateway>) -> Self {
        Self::with_offline_items(gateway, offline_items())
    }

    pub fn with_offline_items(gateway: Arc<dyn SourceGateway>, offline: Vec<Item>) -> Self {
        Self {
            gateway,
            offline: Arc::new(offline),
            state: Mutex::new(SessionState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source_state(&self) -> SourceState {
        self.state.lock().controller.state()
    }

    pub fn pending_failure(&self) -> Option<FailureNotice> {
        self.state.lock().controller.pending_failure().cloned()
    }

    /// The most recently applied page.
    pub fn current_listing(&self) -> Option<QueryResult> {
        self.state.lock().listing.clone()
    }

    pub fn last_query(&self) -> Option<InventoryQuery> {
        self.state.lock().last_query.clone()
    }

    fn query_offline(&self, query: &InventoryQuery) -> QueryResult {
        run_query(
            self.offline.as_slice(),
            query.filter.as_ref(),
            query.sort.as_ref(),
            query.page,
        )
        .map(Item::clone)
    }

    async fn query_live(&self, query: &InventoryQuery) -> Result<QueryResult, GatewayError> {
        let gateway = Arc::clone(&self.gateway);
        let query = query.clone();
        tokio::task::spawn_blocking(move || {
            gateway.fetch_catalog(query.filter.as_ref(), query.sort.as_ref(), query.page)
        })
        .await
        .unwrap_or_else(|e| Err(GatewayError::Task(e.to_string())))
    }

    /// Runs `query` against the active source and, unless a newer request
    /// has already been applied, makes the result the current listing.
    pub async fn load_inventory(&self, query: InventoryQuery) -> Delivery<ApiResponse<QueryResult>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let offline = {
            let mut state = self.state.lock();
            state.last_query = Some(query.clone());
            state.controller.is_offline()
        };

        let outcome = if offline {
            Ok(self.query_offline(&query))
        } else {
            self.query_live(&query).await
        };

        let mut state = self.state.lock();
        if generation < state.applied_generation {
            debug!(
                "Dropping stale catalog response (generation {} < {})",
                generation, state.applied_generation
            );
            return Delivery::Stale;
        }
        state.applied_generation = generation;

        match outcome {
            Ok(result) => {
                if !offline {
                    state.controller.record_success();
                }
                state.listing = Some(result.clone());
                Delivery::Current(ApiResponse::ok(result))
            }
            Err(e) => {
                state.controller.record_failure(&e);
                Delivery::Current(ApiResponse::failure_with(
                    QueryResult::empty(query.page),
                    e.to_string(),
                    e.kind(),
                ))
            }
        }
    }

    /// Re-issues the last catalog request against the active source.
    pub async fn retry(&self) -> Delivery<ApiResponse<QueryResult>> {
        let query = self.last_query().unwrap_or_default();
        info!("Retrying catalog request (page {})", query.page.page);
        self.load_inventory(query).await
    }

    /// Switches to the offline catalog after a failed fetch and re-runs the
    /// last query there.
    pub async fn use_offline_data(&self) -> Delivery<ApiResponse<QueryResult>> {
        let switched: Result<(), FallbackError> = self.state.lock().controller.use_offline_data();
        if let Err(e) = switched {
            return Delivery::Current(ApiResponse::failure(e.to_string(), e.kind()));
        }
        let query = self.last_query().unwrap_or_default();
        self.load_inventory(query).await
    }

    /// Back to the live source with the last query.
    pub async fn reload(&self) -> Delivery<ApiResponse<QueryResult>> {
        self.state.lock().controller.reload();
        let query = self.last_query().unwrap_or_default();
        self.load_inventory(query).await
    }

    pub async fn item_details(&self, id: &str) -> ApiResponse<Item> {
        if self.state.lock().controller.is_offline() {
            let found = self
                .offline
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(id.to_string()));
            return found.into();
        }

        let gateway = Arc::clone(&self.gateway);
        let owned_id = id.to_string();
        let result = tokio::task::spawn_blocking(move || gateway.fetch_item_detail(&owned_id))
            .await
            .unwrap_or_else(|e| Err(GatewayError::Task(e.to_string())));
        if let Err(e) = &result {
            self.state.lock().controller.record_failure(e);
        }
        result.into()
    }

    /// Price points for `id` inside `range`, measured back from `now`.
    pub async fn price_history(
        &self,
        id: &str,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> ApiResponse<Vec<PricePoint>> {
        if self.state.lock().controller.is_offline() {
            let e = GatewayError::Unsupported("Price history".to_string());
            debug!("{} while offline", e);
            return ApiResponse::failure(e.to_string(), e.kind());
        }

        let gateway = Arc::clone(&self.gateway);
        let owned_id = id.to_string();
        let result = tokio::task::spawn_blocking(move || gateway.fetch_price_history(&owned_id))
            .await
            .unwrap_or_else(|e| Err(GatewayError::Task(e.to_string())));
        result.map(|points| range.window(&points, now)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::dataset::curated_items;
    use crate::models::{ItemCategory, SortDirection, SortField};
    use chrono::Duration;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::thread;

    /// Serves the curated listings; page 1 answers slowly so tests can race it.
    #[derive(Default)]
    struct StubGateway {
        failing: AtomicBool,
        slow_first_page: AtomicBool,
        calls: AtomicUsize,
    }

    impl StubGateway {
        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SourceGateway for StubGateway {
        fn fetch_catalog(
            &self,
            filter: Option<&FilterSpec>,
            sort: Option<&SortSpec>,
            page: PageSpec,
        ) -> Result<QueryResult, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if page.page == 1 && self.slow_first_page.load(Ordering::SeqCst) {
                thread::sleep(std::time::Duration::from_millis(300));
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(GatewayError::NoResponse("connection refused".to_string()));
            }
            let items = curated_items();
            Ok(run_query(&items, filter, sort, page).map(Item::clone))
        }

        fn fetch_item_detail(&self, id: &str) -> Result<Item, GatewayError> {
            curated_items()
                .into_iter()
                .find(|item| item.id == id)
                .ok_or_else(|| GatewayError::NotFound(id.to_string()))
        }

        fn fetch_price_history(&self, _id: &str) -> Result<Vec<PricePoint>, GatewayError> {
            let now = Utc::now();
            Ok([400, 60, 20, 3]
                .iter()
                .map(|days| PricePoint {
                    date: now - Duration::days(*days),
                    price: *days as f64,
                })
                .collect())
        }
    }

    fn session() -> (Arc<StubGateway>, MarketSession) {
        let gateway = Arc::new(StubGateway::default());
        let session = MarketSession::new(gateway.clone());
        (gateway, session)
    }

    fn pistols() -> InventoryQuery {
        InventoryQuery {
            filter: Some(FilterSpec {
                categories: Some(vec![ItemCategory::Pistol]),
                ..Default::default()
            }),
            sort: Some(SortSpec::new(SortField::Price, SortDirection::Asc)),
            page: PageSpec::new(1, 100),
        }
    }

    fn current(delivery: Delivery<ApiResponse<QueryResult>>) -> ApiResponse<QueryResult> {
        delivery.into_current().expect("response should be current")
    }

    #[tokio::test]
    async fn test_live_listing() {
        let (gateway, session) = session();
        let response = current(session.load_inventory(pistols()).await);

        assert!(response.success);
        let result = response.data.unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.items[0].name, "USP-S | Kill Confirmed");
        assert_eq!(session.current_listing(), Some(result));
        assert_eq!(session.source_state(), SourceState::Live);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_live_and_offers_recovery() {
        let (gateway, session) = session();
        gateway.fail(true);
        let response = current(session.load_inventory(pistols()).await);

        assert!(!response.success);
        assert_eq!(response.error_kind.as_deref(), Some("noResponse"));
        assert_eq!(response.data.unwrap().total, 0);
        assert_eq!(session.source_state(), SourceState::Live);
        assert!(session.pending_failure().is_some());
        assert!(session.current_listing().is_none());
    }

    #[tokio::test]
    async fn test_offline_needs_a_failure_first() {
        let (_gateway, session) = session();
        let response = current(session.use_offline_data().await);
        assert!(!response.success);
        assert_eq!(response.error_kind.as_deref(), Some("noFailureRecorded"));
        assert_eq!(session.source_state(), SourceState::Live);
    }

    #[tokio::test]
    async fn test_offline_filters_like_live() {
        let (gateway, session) = session();
        let live = current(session.load_inventory(pistols()).await).data.unwrap();

        gateway.fail(true);
        session.load_inventory(pistols()).await;
        let calls_before = gateway.calls();

        let offline = current(session.use_offline_data().await).data.unwrap();
        assert_eq!(session.source_state(), SourceState::Offline);
        assert_eq!(gateway.calls(), calls_before);

        let dataset = offline_items();
        let query = pistols();
        let expected = run_query(&dataset, query.filter.as_ref(), query.sort.as_ref(), query.page);
        assert_eq!(offline.total, expected.total);
        assert!(offline.items.iter().all(|i| i.category == ItemCategory::Pistol));
        let live_ids: Vec<&str> = live.items.iter().map(|i| i.id.as_str()).collect();
        let offline_curated: Vec<&str> = offline
            .items
            .iter()
            .map(|i| i.id.as_str())
            .filter(|id| !id.starts_with("generated-"))
            .collect();
        assert_eq!(live_ids, offline_curated);
    }

    #[tokio::test]
    async fn test_reload_goes_back_live() {
        let (gateway, session) = session();
        gateway.fail(true);
        session.load_inventory(pistols()).await;
        session.use_offline_data().await;

        gateway.fail(false);
        let calls_before = gateway.calls();
        let response = current(session.reload().await);
        assert!(response.success);
        assert_eq!(session.source_state(), SourceState::Live);
        assert_eq!(gateway.calls(), calls_before + 1);
        assert!(session.pending_failure().is_none());
    }

    #[tokio::test]
    async fn test_retry_reissues_last_query() {
        let (gateway, session) = session();
        gateway.fail(true);
        session.load_inventory(pistols()).await;

        gateway.fail(false);
        let response = current(session.retry().await);
        assert!(response.success);
        assert_eq!(response.data.unwrap().total, 3);
        assert_eq!(gateway.calls(), 2);
        assert_eq!(session.source_state(), SourceState::Live);
        assert!(session.pending_failure().is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let (gateway, session) = session();
        gateway.slow_first_page.store(true, Ordering::SeqCst);

        let slow = InventoryQuery {
            page: PageSpec::new(1, 4),
            ..Default::default()
        };
        let fast = InventoryQuery {
            page: PageSpec::new(2, 4),
            ..Default::default()
        };
        let (first, second) = tokio::join!(session.load_inventory(slow), session.load_inventory(fast));

        assert!(first.is_stale());
        assert!(!second.is_stale());
        assert_eq!(session.current_listing().unwrap().page, 2);
    }

    #[tokio::test]
    async fn test_item_details() {
        let (gateway, session) = session();
        let item = session.item_details("3").await;
        assert_eq!(item.data.unwrap().name, "Karambit | Doppler");

        let missing = session.item_details("404").await;
        assert_eq!(missing.error_kind.as_deref(), Some("notFound"));
        assert!(session.pending_failure().is_none());

        gateway.fail(true);
        session.load_inventory(pistols()).await;
        session.use_offline_data().await;
        let offline = session.item_details("generated-20").await;
        assert!(offline.success);
    }

    #[tokio::test]
    async fn test_price_history_window() {
        let (gateway, session) = session();
        let month = session
            .price_history("1", TimeRange::Month, Utc::now())
            .await
            .data
            .unwrap();
        let prices: Vec<f64> = month.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![20.0, 3.0]);

        let all = session.price_history("1", TimeRange::All, Utc::now()).await;
        assert_eq!(all.data.unwrap().len(), 4);

        gateway.fail(true);
        session.load_inventory(pistols()).await;
        session.use_offline_data().await;
        let offline = session.price_history("1", TimeRange::All, Utc::now()).await;
        assert_eq!(offline.error_kind.as_deref(), Some("unsupported"));
    }
}
