//! Access to the remote catalog.
//!
//! [`SourceGateway`] is the seam the session talks to; [`HttpGateway`] is the
//! blocking HTTP implementation. Request logging goes through an injected
//! [`RequestObserver`] so tests and callers can swap it out.

pub mod http;

pub use http::HttpGateway;

use crate::error::GatewayError;
use crate::models::{FilterSpec, Item, PageSpec, PricePoint, QueryResult, SortSpec};
use log::{debug, error, info};

pub trait SourceGateway: Send + Sync {
    fn fetch_catalog(
        &self,
        filter: Option<&FilterSpec>,
        sort: Option<&SortSpec>,
        page: PageSpec,
    ) -> Result<QueryResult, GatewayError>;

    fn fetch_item_detail(&self, id: &str) -> Result<Item, GatewayError>;

    /// Price points in ascending date order.
    fn fetch_price_history(&self, id: &str) -> Result<Vec<PricePoint>, GatewayError>;
}

pub trait RequestObserver: Send + Sync {
    fn on_request(&self, method: &str, url: &str);
    fn on_response(&self, url: &str, status: u16, summary: &str);
    fn on_error(&self, url: &str, err: &GatewayError);
}

/// Forwards gateway traffic to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_request(&self, method: &str, url: &str) {
        info!("API Request: {} {}", method, url);
    }

    fn on_response(&self, url: &str, status: u16, summary: &str) {
        info!("API Response: {} {} ({})", status, url, summary);
    }

    fn on_error(&self, url: &str, err: &GatewayError) {
        match err {
            GatewayError::Unsupported(_) | GatewayError::NotFound(_) => {
                debug!("API {} for {}: {}", err.kind(), url, err)
            }
            _ => error!("API {} for {}: {}", err.kind(), url, err),
        }
    }
}
