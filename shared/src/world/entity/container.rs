use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::world::item_list::ItemList;

use super::{object::Object, reference::Reference};

/// An object that owns Items. Members are not part of the container's own
/// packet; each Item carries its owner id and is re-adopted on arrival.
#[derive(Debug)]
pub struct Container {
    object: Object,
    item_list: ItemList,
}

impl Container {
    pub(crate) fn new(object: Object) -> Self {
        let source = object.reference().network_id();
        Self {
            object,
            item_list: ItemList::new(source),
        }
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn reference(&self) -> &Reference {
        self.object.reference()
    }

    pub fn item_list(&self) -> &ItemList {
        &self.item_list
    }
}

impl Serde for Container {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.object.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(Object::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.object.bit_length()
    }
}
