use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use super::{container::Container, reference::Reference};

/// A container that is alive: NPCs and, through [`Player`](super::player::Player), players.
#[derive(Debug)]
pub struct Actor {
    container: Container,
    actor_values: RefCell<BTreeMap<u8, f64>>,
    moving_animation: Cell<u8>,
    alerted: Cell<bool>,
    sneaking: Cell<bool>,
    dead: Cell<bool>,
}

impl Actor {
    pub(crate) fn new(container: Container) -> Self {
        Self {
            container,
            actor_values: RefCell::new(BTreeMap::new()),
            moving_animation: Cell::new(0),
            alerted: Cell::new(false),
            sneaking: Cell::new(false),
            dead: Cell::new(false),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn reference(&self) -> &Reference {
        self.container.reference()
    }

    pub fn actor_value(&self, index: u8) -> Option<f64> {
        self.actor_values.borrow().get(&index).copied()
    }

    pub fn actor_values(&self) -> BTreeMap<u8, f64> {
        self.actor_values.borrow().clone()
    }

    pub fn moving_animation(&self) -> u8 {
        self.moving_animation.get()
    }

    pub fn alerted(&self) -> bool {
        self.alerted.get()
    }

    pub fn sneaking(&self) -> bool {
        self.sneaking.get()
    }

    pub fn dead(&self) -> bool {
        self.dead.get()
    }

    pub fn set_actor_value(&self, index: u8, value: f64) {
        let previous = self.actor_values.borrow_mut().insert(index, value);
        if previous != Some(value) {
            self.reference().mark_changed();
        }
    }

    /// Seeds an actor value at creation without marking the actor changed.
    #[cfg(feature = "server")]
    pub(crate) fn init_actor_value(&self, index: u8, value: f64) {
        self.actor_values.borrow_mut().insert(index, value);
    }

    pub fn set_moving_animation(&self, animation: u8) {
        self.reference().set_value(&self.moving_animation, animation);
    }

    pub fn set_alerted(&self, alerted: bool) {
        self.reference().set_value(&self.alerted, alerted);
    }

    pub fn set_sneaking(&self, sneaking: bool) {
        self.reference().set_value(&self.sneaking, sneaking);
    }

    pub fn set_dead(&self, dead: bool) {
        self.reference().set_value(&self.dead, dead);
    }
}

impl Serde for Actor {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.container.ser(writer);

        let actor_values = self.actor_values.borrow();
        UnsignedVariableInteger::<7>::new(actor_values.len() as u64).ser(writer);
        for (index, value) in actor_values.iter() {
            index.ser(writer);
            value.ser(writer);
        }

        self.moving_animation.get().ser(writer);
        self.alerted.get().ser(writer);
        self.sneaking.get().ser(writer);
        self.dead.get().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let container = Container::de(reader)?;

        let length = UnsignedVariableInteger::<7>::de(reader)?.get();
        let mut actor_values = BTreeMap::new();
        for _ in 0..length {
            let index = u8::de(reader)?;
            let value = f64::de(reader)?;
            actor_values.insert(index, value);
        }

        let moving_animation = u8::de(reader)?;
        let alerted = bool::de(reader)?;
        let sneaking = bool::de(reader)?;
        let dead = bool::de(reader)?;

        Ok(Self {
            container,
            actor_values: RefCell::new(actor_values),
            moving_animation: Cell::new(moving_animation),
            alerted: Cell::new(alerted),
            sneaking: Cell::new(sneaking),
            dead: Cell::new(dead),
        })
    }

    fn bit_length(&self) -> u32 {
        let actor_values = self.actor_values.borrow().len();
        self.container.bit_length()
            + UnsignedVariableInteger::<7>::new(actor_values as u64).bit_length()
            + (actor_values as u32) * (8 + 64)
            + 8
            + 3
    }
}
