// ── Console facade ──
//
// One entry point for consumers: builds the HTTP client from a
// `ConsoleConfig` and hands out a controller per collection, all tied to
// a single cancellation token.

use std::sync::Arc;

use enerctl_api::ApiClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ConsoleConfig;
use crate::controller::{Outcome, ResourceController};
use crate::error::CoreError;
use crate::model::{Device, User};
use crate::report::Report;

/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: ApiClient,
    users: ResourceController<User>,
    devices: ResourceController<Device>,
    cancel: CancellationToken,
}

impl Console {
    /// Build the client and controllers. Does no I/O; call
    /// [`activate()`](Self::activate) for the first load.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.base_url.as_str(), &config.transport())?;
        Ok(Self::with_api(config, api))
    }

    /// Wrap an already-built client.
    pub fn with_api(config: ConsoleConfig, api: ApiClient) -> Self {
        let cancel = CancellationToken::new();
        let users = ResourceController::new(api.clone(), cancel.child_token());
        let devices = ResourceController::new(api.clone(), cancel.child_token());
        debug!(url = %api.base_url(), "console ready");

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                api,
                users,
                devices,
                cancel,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn users(&self) -> &ResourceController<User> {
        &self.inner.users
    }

    pub fn devices(&self) -> &ResourceController<Device> {
        &self.inner.devices
    }

    /// The consumption report. Static data; no request is made.
    pub fn report(&self) -> Report {
        Report::sample()
    }

    /// Load both collections concurrently.
    pub async fn activate(&self) -> (Outcome, Outcome) {
        info!(url = %self.inner.api.base_url(), "loading users and devices");
        tokio::join!(self.inner.users.activate(), self.inner.devices.activate())
    }

    /// Cancel every outstanding request across all controllers.
    pub fn shutdown(&self) {
        debug!("console shutting down");
        self.inner.cancel.cancel();
    }
}
