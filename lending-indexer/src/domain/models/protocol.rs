//! Protocol domain model

use serde::{Deserialize, Serialize};

use crate::core::{Entity, EntityKind};

/// A protocol deployment. Written once on first sight, read thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Protocol {
    pub id: String,
    pub network: String,
    #[serde(rename = "type")]
    pub protocol_type: String,
    pub risk_type: String,
}

impl Entity for Protocol {
    const KIND: EntityKind = EntityKind::Protocol;

    fn id(&self) -> &str {
        &self.id
    }
}
