//! Shared state handed to HTTP handlers

use std::sync::Arc;

use odc_core::SelfDescriptionService;

use crate::service::broker::BrokerClient;

/// Application state shared across all handlers
pub struct AppState {
    pub service: Arc<SelfDescriptionService>,
    pub broker_client: BrokerClient,
}

impl AppState {
    pub fn new(service: Arc<SelfDescriptionService>, broker_client: BrokerClient) -> Self {
        Self {
            service,
            broker_client,
        }
    }
}
