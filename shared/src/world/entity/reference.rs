use std::cell::Cell;

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::network_id::NetworkId;

/// Reference ids the game assigns to objects spawned at runtime live in the
/// `0xFF` plugin index.
const RUNTIME_REFERENCE_MASK: u32 = 0xFF00_0000;

/// State shared by every entity kind: the network id, the in-game
/// reference id, the base (template) id and the changed flag.
///
/// Every setter that alters a value marks the entity changed. Only
/// [`Reference::clear_changed`], called by the sync layer once the change
/// has been sent, clears it.
#[derive(Debug)]
pub struct Reference {
    network_id: NetworkId,
    ref_id: Cell<u32>,
    base_id: Cell<u32>,
    changed: Cell<bool>,
}

impl Reference {
    pub(crate) fn new(network_id: NetworkId, ref_id: u32, base_id: u32) -> Self {
        Self {
            network_id,
            ref_id: Cell::new(ref_id),
            base_id: Cell::new(base_id),
            changed: Cell::new(false),
        }
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn reference(&self) -> u32 {
        self.ref_id.get()
    }

    pub fn base(&self) -> u32 {
        self.base_id.get()
    }

    pub fn changed(&self) -> bool {
        self.changed.get()
    }

    /// Whether the reference id belongs to the game's own data files rather
    /// than to an object spawned at runtime.
    pub fn is_persistent(&self) -> bool {
        let ref_id = self.ref_id.get();
        ref_id != 0 && (ref_id & RUNTIME_REFERENCE_MASK) != RUNTIME_REFERENCE_MASK
    }

    pub fn set_reference(&self, ref_id: u32) {
        self.set_value(&self.ref_id, ref_id);
    }

    /// Rebases the entity onto another template. Reached through
    /// `EntityStore::set_base`, which also records player bases.
    pub(crate) fn set_base(&self, base_id: u32) {
        self.set_value(&self.base_id, base_id);
    }

    pub fn clear_changed(&self) {
        self.changed.set(false);
    }

    pub(crate) fn mark_changed(&self) {
        self.changed.set(true);
    }

    /// Stores `value` in `field`, marking the entity changed if it differs.
    pub(crate) fn set_value<T: Copy + PartialEq>(&self, field: &Cell<T>, value: T) {
        if field.get() != value {
            field.set(value);
            self.mark_changed();
        }
    }
}

impl Serde for Reference {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.network_id.ser(writer);
        self.ref_id.get().ser(writer);
        self.base_id.get().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let network_id = NetworkId::de(reader)?;
        let ref_id = u32::de(reader)?;
        let base_id = u32::de(reader)?;
        Ok(Self::new(network_id, ref_id, base_id))
    }

    fn bit_length(&self) -> u32 {
        64 + 32 + 32
    }
}
