//! Application state shared by handlers

use std::sync::Arc;

use crate::config::ClientAddressSource;
use crate::domain::DecisionEngine;

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
    pub client_address: ClientAddressSource,
}

impl AppState {
    pub fn new(engine: DecisionEngine, client_address: ClientAddressSource) -> Self {
        Self {
            engine: Arc::new(engine),
            client_address,
        }
    }
}
