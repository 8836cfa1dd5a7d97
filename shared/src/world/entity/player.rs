use std::{cell::RefCell, collections::BTreeMap};

cfg_if! {
    if #[cfg(feature = "server")] {
        use std::cell::Cell;
    }
}

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use super::{actor::Actor, reference::Reference};

/// The key bound to a control code and whether the control is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerControl {
    pub key: u8,
    pub enabled: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            key: 0,
            enabled: true,
        }
    }
}

/// An actor driven by a connected client.
///
/// On the server every player additionally carries a respawn delay and a
/// spawn cell, initialised from the store's [`PlayerDefaults`](crate::PlayerDefaults)
/// when the player is created. Those fields never go on the wire.
#[derive(Debug)]
pub struct Player {
    actor: Actor,
    controls: RefCell<BTreeMap<u8, PlayerControl>>,
    #[cfg(feature = "server")]
    respawn: Cell<u32>,
    #[cfg(feature = "server")]
    spawn_cell: Cell<u32>,
}

impl Player {
    pub(crate) fn new(actor: Actor) -> Self {
        Self::with_controls(actor, BTreeMap::new())
    }

    fn with_controls(actor: Actor, controls: BTreeMap<u8, PlayerControl>) -> Self {
        Self {
            actor,
            controls: RefCell::new(controls),
            #[cfg(feature = "server")]
            respawn: Cell::new(0),
            #[cfg(feature = "server")]
            spawn_cell: Cell::new(0),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn reference(&self) -> &Reference {
        self.actor.reference()
    }

    /// The key bound to `control`, if the control is known.
    pub fn control(&self, control: u8) -> Option<u8> {
        self.controls.borrow().get(&control).map(|binding| binding.key)
    }

    pub fn control_enabled(&self, control: u8) -> Option<bool> {
        self.controls
            .borrow()
            .get(&control)
            .map(|binding| binding.enabled)
    }

    pub fn controls(&self) -> BTreeMap<u8, PlayerControl> {
        self.controls.borrow().clone()
    }

    pub fn set_control(&self, control: u8, key: u8) {
        self.update_control(control, |binding| binding.key = key);
    }

    pub fn set_control_enabled(&self, control: u8, enabled: bool) {
        self.update_control(control, |binding| binding.enabled = enabled);
    }

    fn update_control(&self, control: u8, update: impl FnOnce(&mut PlayerControl)) {
        let mut controls = self.controls.borrow_mut();
        let mut inserted = false;
        let binding = controls.entry(control).or_insert_with(|| {
            inserted = true;
            PlayerControl::default()
        });
        let before = *binding;
        update(binding);
        // a new binding reaches the wire even when it equals the default
        if inserted || *binding != before {
            self.reference().mark_changed();
        }
    }
}

cfg_if! {
    if #[cfg(feature = "server")] {
        impl Player {
            /// Respawn delay in milliseconds.
            pub fn respawn(&self) -> u32 {
                self.respawn.get()
            }

            pub fn spawn_cell(&self) -> u32 {
                self.spawn_cell.get()
            }

            pub fn set_respawn(&self, respawn: u32) {
                self.reference().set_value(&self.respawn, respawn);
            }

            pub fn set_spawn_cell(&self, cell: u32) {
                self.reference().set_value(&self.spawn_cell, cell);
            }

            /// Seeds server-side state at creation without marking the player changed.
            pub(crate) fn init_defaults(&self, respawn: u32, spawn_cell: u32) {
                self.respawn.set(respawn);
                self.spawn_cell.set(spawn_cell);
            }
        }
    }
}

impl Serde for Player {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.actor.ser(writer);

        let controls = self.controls.borrow();
        UnsignedVariableInteger::<7>::new(controls.len() as u64).ser(writer);
        for (control, binding) in controls.iter() {
            control.ser(writer);
            binding.key.ser(writer);
            binding.enabled.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let actor = Actor::de(reader)?;

        let length = UnsignedVariableInteger::<7>::de(reader)?.get();
        let mut controls = BTreeMap::new();
        for _ in 0..length {
            let control = u8::de(reader)?;
            let key = u8::de(reader)?;
            let enabled = bool::de(reader)?;
            controls.insert(control, PlayerControl { key, enabled });
        }

        Ok(Self::with_controls(actor, controls))
    }

    fn bit_length(&self) -> u32 {
        let controls = self.controls.borrow().len();
        self.actor.bit_length()
            + UnsignedVariableInteger::<7>::new(controls as u64).bit_length()
            + (controls as u32) * (8 + 8 + 1)
    }
}
