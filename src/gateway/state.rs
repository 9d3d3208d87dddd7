use std::sync::Arc;

use crate::broker::{Broker, BrokerError, HttpBroker, MemoryBroker};
use crate::config::{BrokerConfig, BrokerKind};

/// Shared gateway state. Holds no account data, only the broker handle.
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn Broker>,
    /// Set when the broker is the in-process simulation
    #[cfg(feature = "mock-api")]
    pub simulator: Option<Arc<MemoryBroker>>,
}

impl AppState {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            broker,
            #[cfg(feature = "mock-api")]
            simulator: None,
        }
    }

    /// State backed by the in-process broker
    pub fn simulated(broker: Arc<MemoryBroker>) -> Self {
        Self {
            broker: broker.clone(),
            #[cfg(feature = "mock-api")]
            simulator: Some(broker),
        }
    }

    pub fn from_config(config: &BrokerConfig) -> Result<Self, BrokerError> {
        match config.kind {
            BrokerKind::Memory => Ok(Self::simulated(Arc::new(MemoryBroker::new()))),
            BrokerKind::Http => Ok(Self::new(Arc::new(HttpBroker::from_config(config)?))),
        }
    }
}
