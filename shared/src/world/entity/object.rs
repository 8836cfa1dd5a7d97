use std::cell::{Cell, RefCell};

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::reference::Reference;

/// A placed object in the game world.
#[derive(Debug)]
pub struct Object {
    reference: Reference,
    name: RefCell<String>,
    position: Cell<[f64; 3]>,
    angle: Cell<[f64; 3]>,
    cell: Cell<u32>,
    enabled: Cell<bool>,
}

impl Object {
    pub(crate) fn new(reference: Reference) -> Self {
        Self {
            reference,
            name: RefCell::new(String::new()),
            position: Cell::new([0.0; 3]),
            angle: Cell::new([0.0; 3]),
            cell: Cell::new(0),
            enabled: Cell::new(true),
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn position(&self) -> [f64; 3] {
        self.position.get()
    }

    pub fn angle(&self) -> [f64; 3] {
        self.angle.get()
    }

    /// The game cell the object currently sits in.
    pub fn cell(&self) -> u32 {
        self.cell.get()
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_name(&self, name: &str) {
        let mut current = self.name.borrow_mut();
        if current.as_str() != name {
            *current = name.to_string();
            self.reference.mark_changed();
        }
    }

    pub fn set_position(&self, position: [f64; 3]) {
        self.reference.set_value(&self.position, position);
    }

    pub fn set_angle(&self, angle: [f64; 3]) {
        self.reference.set_value(&self.angle, angle);
    }

    pub fn set_cell(&self, cell: u32) {
        self.reference.set_value(&self.cell, cell);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.reference.set_value(&self.enabled, enabled);
    }
}

impl Serde for Object {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.reference.ser(writer);
        self.name.borrow().ser(writer);
        self.position.get().ser(writer);
        self.angle.get().ser(writer);
        self.cell.get().ser(writer);
        self.enabled.get().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let reference = Reference::de(reader)?;
        let name = String::de(reader)?;
        let position = <[f64; 3]>::de(reader)?;
        let angle = <[f64; 3]>::de(reader)?;
        let cell = u32::de(reader)?;
        let enabled = bool::de(reader)?;

        Ok(Self {
            reference,
            name: RefCell::new(name),
            position: Cell::new(position),
            angle: Cell::new(angle),
            cell: Cell::new(cell),
            enabled: Cell::new(enabled),
        })
    }

    fn bit_length(&self) -> u32 {
        self.reference.bit_length()
            + self.name.borrow().bit_length()
            + self.position.get().bit_length()
            + self.angle.get().bit_length()
            + 32
            + 1
    }
}
