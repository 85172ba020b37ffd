//! Which source is active, live gateway or static offline catalog, and how
//! the user moves between them.
//!
//! A failed fetch never switches sources by itself. It leaves a
//! [`FailureNotice`] behind, and only an explicit `use_offline_data` turns
//! that into [`SourceState::Offline`]. Going back requires `reload`.

pub mod dataset;

use crate::error::{FallbackError, GatewayError};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceState {
    #[default]
    Live,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecoveryAction {
    Retry,
    UseOfflineData,
}

/// What the listing page shows after a batch-level failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureNotice {
    pub message: String,
    pub kind: String,
    pub actions: Vec<RecoveryAction>,
}

impl FailureNotice {
    pub fn from_error(err: &GatewayError) -> Self {
        Self {
            message: err.to_string(),
            kind: err.kind().to_string(),
            actions: vec![RecoveryAction::Retry, RecoveryAction::UseOfflineData],
        }
    }
}

#[derive(Debug, Default)]
pub struct FallbackController {
    state: SourceState,
    failure: Option<FailureNotice>,
}

impl FallbackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    pub fn is_offline(&self) -> bool {
        self.state == SourceState::Offline
    }

    pub fn pending_failure(&self) -> Option<&FailureNotice> {
        self.failure.as_ref()
    }

    /// Records a failed live fetch. The state stays as it was; failures that
    /// do not take the listing down (not found, unsupported) are not recorded.
    pub fn record_failure(&mut self, err: &GatewayError) -> Option<FailureNotice> {
        if !err.is_batch_failure() {
            return None;
        }
        warn!("Live fetch failed ({}): {}", err.kind(), err);
        let notice = FailureNotice::from_error(err);
        self.failure = Some(notice.clone());
        Some(notice)
    }

    pub fn record_success(&mut self) {
        self.failure = None;
    }

    /// Live → Offline. Only offered once a live fetch has failed.
    pub fn use_offline_data(&mut self) -> Result<(), FallbackError> {
        if self.is_offline() {
            return Err(FallbackError::AlreadyOffline);
        }
        if self.failure.is_none() {
            return Err(FallbackError::NoFailureRecorded);
        }
        info!("Switching to offline data");
        self.state = SourceState::Offline;
        self.failure = None;
        Ok(())
    }

    /// Back to the live source, forgetting any pending failure.
    pub fn reload(&mut self) {
        if self.is_offline() {
            info!("Reloading from live source");
        }
        self.state = SourceState::Live;
        self.failure = None;
    }
}
