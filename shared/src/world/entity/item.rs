use std::cell::Cell;

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{network_id::NetworkId, object::Object, reference::Reference};

/// Conditions closer than this are the same stack.
pub const CONDITION_EPS: f64 = 0.01;

pub fn conditions_match(a: f64, b: f64) -> bool {
    (a - b).abs() < CONDITION_EPS
}

/// A stack of identical objects, owned by at most one container.
///
/// The owner id is only ever changed by [`ItemList`](crate::ItemList), which
/// keeps it in agreement with its member list.
#[derive(Debug)]
pub struct Item {
    object: Object,
    container: Cell<NetworkId>,
    count: Cell<u32>,
    condition: Cell<f64>,
    equipped: Cell<bool>,
    stick: Cell<bool>,
    silent: Cell<bool>,
}

impl Item {
    pub(crate) fn new(object: Object) -> Self {
        Self {
            object,
            container: Cell::new(NetworkId::NONE),
            count: Cell::new(1),
            condition: Cell::new(100.0),
            equipped: Cell::new(false),
            stick: Cell::new(false),
            silent: Cell::new(false),
        }
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn reference(&self) -> &Reference {
        self.object.reference()
    }

    /// The owning container, or `NetworkId::NONE`.
    pub fn container(&self) -> NetworkId {
        self.container.get()
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn condition(&self) -> f64 {
        self.condition.get()
    }

    pub fn equipped(&self) -> bool {
        self.equipped.get()
    }

    /// Whether the equip state should stick (the player may not change it).
    pub fn stick(&self) -> bool {
        self.stick.get()
    }

    /// Whether the next sync of this item should be applied without notifying the player.
    pub fn silent(&self) -> bool {
        self.silent.get()
    }

    pub fn stacks_with(&self, base_id: u32, condition: f64) -> bool {
        self.object.reference().base() == base_id && conditions_match(self.condition(), condition)
    }

    /// # Panics
    ///
    /// Panics on a zero count; an empty stack must be destroyed instead.
    pub fn set_count(&self, count: u32) {
        if count == 0 {
            panic!(
                "Item {} may not hold a zero count, destroy it instead",
                self.object.reference().network_id()
            );
        }
        self.object.reference().set_value(&self.count, count);
    }

    pub fn set_condition(&self, condition: f64) {
        self.object.reference().set_value(&self.condition, condition);
    }

    pub fn set_equipped(&self, equipped: bool) {
        self.object.reference().set_value(&self.equipped, equipped);
    }

    pub fn set_stick(&self, stick: bool) {
        self.object.reference().set_value(&self.stick, stick);
    }

    pub fn set_silent(&self, silent: bool) {
        self.object.reference().set_value(&self.silent, silent);
    }

    pub(crate) fn set_container(&self, container: NetworkId) {
        self.object.reference().set_value(&self.container, container);
    }
}

impl Serde for Item {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.object.ser(writer);
        self.container.get().ser(writer);
        self.count.get().ser(writer);
        self.condition.get().ser(writer);
        self.equipped.get().ser(writer);
        self.stick.get().ser(writer);
        self.silent.get().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let object = Object::de(reader)?;
        let container = NetworkId::de(reader)?;
        let count = u32::de(reader)?;
        if count == 0 {
            return Err(SerdeErr::InvalidTag {
                what: "item count",
                value: 0,
            });
        }
        let condition = f64::de(reader)?;
        let equipped = bool::de(reader)?;
        let stick = bool::de(reader)?;
        let silent = bool::de(reader)?;

        Ok(Self {
            object,
            container: Cell::new(container),
            count: Cell::new(count),
            condition: Cell::new(condition),
            equipped: Cell::new(equipped),
            stick: Cell::new(stick),
            silent: Cell::new(silent),
        })
    }

    fn bit_length(&self) -> u32 {
        self.object.bit_length() + 64 + 32 + 64 + 3
    }
}
