use thiserror::Error;
use vault_serde::SerdeErr;

use super::network_id::NetworkId;

/// Errors that can occur while operating on entities and containers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    /// The id does not resolve to a live entity of the requested kind
    #[error("Entity {id} not found as {kind}")]
    NotFound { id: NetworkId, kind: &'static str },

    /// An Item was offered to a container while another container owns it
    #[error("Item {item} is already owned by container {container}")]
    AlreadyOwned {
        item: NetworkId,
        container: NetworkId,
    },

    /// An entity delivered by the remote peer uses an id that is still live
    #[error("Entity {id} already exists")]
    AlreadyExists { id: NetworkId },

    /// Internal consistency error (indicates a bug; the operation chain is aborted)
    #[error("Entity invariant violated: {context}")]
    InvariantViolation { context: String },

    /// A wire packet could not be decoded into an entity
    #[error("Malformed entity packet: {0}")]
    Malformed(#[from] SerdeErr),
}

impl EntityError {
    pub fn invariant(context: impl Into<String>) -> Self {
        EntityError::InvariantViolation {
            context: context.into(),
        }
    }
}
