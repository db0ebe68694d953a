//! Protocol repository and address resolution

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ProtocolSettings;
use crate::core::{Address, IndexerResult, StoragePort};
use crate::domain::models::Protocol;

pub struct ProtocolRepository<S: StoragePort> {
    storage: Arc<S>,
    settings: ProtocolSettings,
    /// Parsed pool address -> protocol id
    deployments: HashMap<Address, String>,
}

impl<S: StoragePort> ProtocolRepository<S> {
    /// Deployment keys are parsed as addresses, so case and the `0x` prefix
    /// do not matter. Unparseable keys are skipped; config validation
    /// rejects them up front.
    pub fn new(storage: Arc<S>, settings: ProtocolSettings) -> Self {
        let deployments = settings
            .deployments
            .iter()
            .filter_map(|(key, protocol)| match key.parse::<Address>() {
                Ok(address) => Some((address, protocol.clone())),
                Err(e) => {
                    warn!("Ignoring deployment entry {}: {}", key, e);
                    None
                }
            })
            .collect();

        Self {
            storage,
            settings,
            deployments,
        }
    }

    /// Map a pool contract address to its protocol id. Unlisted addresses
    /// fall back to the configured "unknown" sentinel.
    pub fn protocol_id_for(&self, pool: &Address) -> &str {
        match self.deployments.get(pool) {
            Some(id) => id,
            None => &self.settings.unknown_protocol_id,
        }
    }

    /// Load the protocol, creating it from the static settings on first sight
    pub async fn get_or_create(&self, id: &str) -> IndexerResult<Protocol> {
        if let Some(protocol) = self.storage.load::<Protocol>(id).await? {
            return Ok(protocol);
        }

        if id == self.settings.unknown_protocol_id {
            warn!("Materializing sentinel protocol '{}' for an unlisted pool", id);
        }

        let protocol = Protocol {
            id: id.to_string(),
            network: self.settings.network.clone(),
            protocol_type: self.settings.protocol_type.clone(),
            risk_type: self.settings.risk_type.clone(),
        };
        self.storage.save(&protocol).await?;
        debug!("Created protocol {}", id);
        Ok(protocol)
    }

    /// Resolve and materialize the protocol owning `pool`
    pub async fn resolve(&self, pool: &Address) -> IndexerResult<Protocol> {
        let id = self.protocol_id_for(pool).to_string();
        self.get_or_create(&id).await
    }
}
