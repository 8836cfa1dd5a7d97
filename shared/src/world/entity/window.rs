use std::cell::{Cell, RefCell};

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{network_id::NetworkId, reference::Reference};

/// A GUI window mirrored to a client. Buttons and texts are windows too and
/// hang off a parent window by id.
#[derive(Debug)]
pub struct Window {
    reference: Reference,
    parent: Cell<NetworkId>,
    label: RefCell<String>,
    text: RefCell<String>,
    position: Cell<WindowPosition>,
    size: Cell<WindowSize>,
    visible: Cell<bool>,
    locked: Cell<bool>,
}

/// Relative position plus pixel offset, per axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WindowPosition {
    pub x: f64,
    pub y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl Window {
    pub(crate) fn new(reference: Reference) -> Self {
        Self {
            reference,
            parent: Cell::new(NetworkId::NONE),
            label: RefCell::new(String::new()),
            text: RefCell::new(String::new()),
            position: Cell::new(WindowPosition::default()),
            size: Cell::new(WindowSize::default()),
            visible: Cell::new(true),
            locked: Cell::new(false),
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn parent(&self) -> NetworkId {
        self.parent.get()
    }

    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn position(&self) -> WindowPosition {
        self.position.get()
    }

    pub fn size(&self) -> WindowSize {
        self.size.get()
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn locked(&self) -> bool {
        self.locked.get()
    }

    pub fn set_parent(&self, parent: NetworkId) {
        self.reference.set_value(&self.parent, parent);
    }

    pub fn set_label(&self, label: &str) {
        Self::set_string(&self.reference, &self.label, label);
    }

    pub fn set_text(&self, text: &str) {
        Self::set_string(&self.reference, &self.text, text);
    }

    pub fn set_position(&self, position: WindowPosition) {
        self.reference.set_value(&self.position, position);
    }

    pub fn set_size(&self, size: WindowSize) {
        self.reference.set_value(&self.size, size);
    }

    pub fn set_visible(&self, visible: bool) {
        self.reference.set_value(&self.visible, visible);
    }

    pub fn set_locked(&self, locked: bool) {
        self.reference.set_value(&self.locked, locked);
    }

    fn set_string(reference: &Reference, field: &RefCell<String>, value: &str) {
        let mut current = field.borrow_mut();
        if current.as_str() != value {
            *current = value.to_string();
            reference.mark_changed();
        }
    }
}

impl Serde for Window {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.reference.ser(writer);
        self.parent.get().ser(writer);
        self.label.borrow().ser(writer);
        self.text.borrow().ser(writer);

        let position = self.position.get();
        [position.x, position.y, position.offset_x, position.offset_y].ser(writer);
        let size = self.size.get();
        [size.width, size.height].ser(writer);

        self.visible.get().ser(writer);
        self.locked.get().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let reference = Reference::de(reader)?;
        let parent = NetworkId::de(reader)?;
        let label = String::de(reader)?;
        let text = String::de(reader)?;
        let [x, y, offset_x, offset_y] = <[f64; 4]>::de(reader)?;
        let [width, height] = <[f64; 2]>::de(reader)?;
        let visible = bool::de(reader)?;
        let locked = bool::de(reader)?;

        Ok(Self {
            reference,
            parent: Cell::new(parent),
            label: RefCell::new(label),
            text: RefCell::new(text),
            position: Cell::new(WindowPosition {
                x,
                y,
                offset_x,
                offset_y,
            }),
            size: Cell::new(WindowSize { width, height }),
            visible: Cell::new(visible),
            locked: Cell::new(locked),
        })
    }

    fn bit_length(&self) -> u32 {
        self.reference.bit_length()
            + 64
            + self.label.borrow().bit_length()
            + self.text.borrow().bit_length()
            + 4 * 64
            + 2 * 64
            + 2
    }
}

/// A clickable window.
#[derive(Debug)]
pub struct Button {
    window: Window,
}

impl Button {
    /// Label of the button that closes its parent window.
    pub const CLOSE_BUTTON: &'static str = "closeBTN";

    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn reference(&self) -> &Reference {
        self.window.reference()
    }

    pub fn is_close_button(&self) -> bool {
        self.window.label() == Self::CLOSE_BUTTON
    }
}

impl Serde for Button {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.window.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(Window::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.window.bit_length()
    }
}

/// A static text window.
#[derive(Debug)]
pub struct Text {
    window: Window,
}

impl Text {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn reference(&self) -> &Reference {
        self.window.reference()
    }
}

impl Serde for Text {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.window.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(Window::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.window.bit_length()
    }
}
