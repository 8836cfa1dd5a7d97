use crate::world::entity::{entity::EntityKind, network_id::NetworkId};

/// Receives a packet for every entity that changed since it was last
/// collected. Delivery to peers is the implementor's business.
pub trait ChangeSink {
    fn entity_changed(&mut self, id: NetworkId, kind: EntityKind, packet: Vec<u8>);
}

impl<F: FnMut(NetworkId, EntityKind, Vec<u8>)> ChangeSink for F {
    fn entity_changed(&mut self, id: NetworkId, kind: EntityKind, packet: Vec<u8>) {
        self(id, kind, packet)
    }
}
