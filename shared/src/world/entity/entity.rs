use vault_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use super::{
    actor::Actor,
    container::Container,
    item::Item,
    network_id::NetworkId,
    object::Object,
    player::Player,
    reference::Reference,
    window::{Button, Text, Window},
};

/// Version byte leading every entity packet.
pub const WIRE_VERSION: u8 = 1;

/// Tag identifying an entity variant, both in the store and on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EntityKind {
    Object = 1,
    Container = 2,
    Actor = 3,
    Player = 4,
    Item = 5,
    Window = 6,
    Button = 7,
    Text = 8,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Object,
        EntityKind::Container,
        EntityKind::Actor,
        EntityKind::Player,
        EntityKind::Item,
        EntityKind::Window,
        EntityKind::Button,
        EntityKind::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Object => Object::KIND_NAME,
            EntityKind::Container => Container::KIND_NAME,
            EntityKind::Actor => Actor::KIND_NAME,
            EntityKind::Player => Player::KIND_NAME,
            EntityKind::Item => Item::KIND_NAME,
            EntityKind::Window => Window::KIND_NAME,
            EntityKind::Button => Button::KIND_NAME,
            EntityKind::Text => Text::KIND_NAME,
        }
    }
}

impl TryFrom<u8> for EntityKind {
    type Error = SerdeErr;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| *kind as u8 == value)
            .ok_or(SerdeErr::InvalidTag {
                what: "entity kind",
                value: value as u64,
            })
    }
}

/// Every entity the store can hold.
#[derive(Debug)]
pub enum Entity {
    Object(Object),
    Container(Container),
    Actor(Actor),
    Player(Player),
    Item(Item),
    Window(Window),
    Button(Button),
    Text(Text),
}

impl Entity {
    pub(crate) fn new(kind: EntityKind, network_id: NetworkId, ref_id: u32, base_id: u32) -> Self {
        let reference = Reference::new(network_id, ref_id, base_id);
        match kind {
            EntityKind::Object => Entity::Object(Object::new(reference)),
            EntityKind::Container => Entity::Container(Container::new(Object::new(reference))),
            EntityKind::Actor => {
                Entity::Actor(Actor::new(Container::new(Object::new(reference))))
            }
            EntityKind::Player => Entity::Player(Player::new(Actor::new(Container::new(
                Object::new(reference),
            )))),
            EntityKind::Item => Entity::Item(Item::new(Object::new(reference))),
            EntityKind::Window => Entity::Window(Window::new(reference)),
            EntityKind::Button => Entity::Button(Button::new(Window::new(reference))),
            EntityKind::Text => Entity::Text(Text::new(Window::new(reference))),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Object(_) => EntityKind::Object,
            Entity::Container(_) => EntityKind::Container,
            Entity::Actor(_) => EntityKind::Actor,
            Entity::Player(_) => EntityKind::Player,
            Entity::Item(_) => EntityKind::Item,
            Entity::Window(_) => EntityKind::Window,
            Entity::Button(_) => EntityKind::Button,
            Entity::Text(_) => EntityKind::Text,
        }
    }

    pub fn reference(&self) -> &Reference {
        match self {
            Entity::Object(object) => object.reference(),
            Entity::Container(container) => container.reference(),
            Entity::Actor(actor) => actor.reference(),
            Entity::Player(player) => player.reference(),
            Entity::Item(item) => item.reference(),
            Entity::Window(window) => window.reference(),
            Entity::Button(button) => button.reference(),
            Entity::Text(text) => text.reference(),
        }
    }

    pub fn network_id(&self) -> NetworkId {
        self.reference().network_id()
    }

    /// Typed view of this entity, if it is (or derives from) `K`.
    pub fn get<K: EntityType>(&self) -> Option<&K> {
        K::from_entity(self)
    }

    /// The container view, for every variant that owns an item list.
    pub fn as_container(&self) -> Option<&Container> {
        Container::from_entity(self)
    }

    /// Serializes the entity: version, kind tag, then the base fields and the
    /// kind-specific fields, parent kinds first.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    /// Rebuilds an entity from [`Entity::to_wire`] output. The result is not
    /// registered anywhere and starts unchanged.
    pub fn from_wire(bytes: &[u8]) -> Result<Entity, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        Entity::de(&mut reader)
    }
}

impl Serde for Entity {
    fn ser(&self, writer: &mut dyn BitWrite) {
        WIRE_VERSION.ser(writer);
        (self.kind() as u8).ser(writer);
        match self {
            Entity::Object(object) => object.ser(writer),
            Entity::Container(container) => container.ser(writer),
            Entity::Actor(actor) => actor.ser(writer),
            Entity::Player(player) => player.ser(writer),
            Entity::Item(item) => item.ser(writer),
            Entity::Window(window) => window.ser(writer),
            Entity::Button(button) => button.ser(writer),
            Entity::Text(text) => text.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let version = u8::de(reader)?;
        if version != WIRE_VERSION {
            return Err(SerdeErr::InvalidTag {
                what: "wire version",
                value: version as u64,
            });
        }

        let kind = EntityKind::try_from(u8::de(reader)?)?;
        let entity = match kind {
            EntityKind::Object => Entity::Object(Object::de(reader)?),
            EntityKind::Container => Entity::Container(Container::de(reader)?),
            EntityKind::Actor => Entity::Actor(Actor::de(reader)?),
            EntityKind::Player => Entity::Player(Player::de(reader)?),
            EntityKind::Item => Entity::Item(Item::de(reader)?),
            EntityKind::Window => Entity::Window(Window::de(reader)?),
            EntityKind::Button => Entity::Button(Button::de(reader)?),
            EntityKind::Text => Entity::Text(Text::de(reader)?),
        };
        Ok(entity)
    }

    fn bit_length(&self) -> u32 {
        let body = match self {
            Entity::Object(object) => object.bit_length(),
            Entity::Container(container) => container.bit_length(),
            Entity::Actor(actor) => actor.bit_length(),
            Entity::Player(player) => player.bit_length(),
            Entity::Item(item) => item.bit_length(),
            Entity::Window(window) => window.bit_length(),
            Entity::Button(button) => button.bit_length(),
            Entity::Text(text) => text.bit_length(),
        };
        8 + 8 + body
    }
}

/// A typed view into [`Entity`]. Views follow the variant hierarchy, so an
/// `Actor` view resolves for both actors and players.
pub trait EntityType: Sized {
    const KIND_NAME: &'static str;

    fn from_entity(entity: &Entity) -> Option<&Self>;

    fn reference(&self) -> &Reference;
}

impl EntityType for Entity {
    const KIND_NAME: &'static str = "Entity";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        Some(entity)
    }

    fn reference(&self) -> &Reference {
        Entity::reference(self)
    }
}

impl EntityType for Reference {
    const KIND_NAME: &'static str = "Reference";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        Some(entity.reference())
    }

    fn reference(&self) -> &Reference {
        self
    }
}

impl EntityType for Object {
    const KIND_NAME: &'static str = "Object";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Object(object) => Some(object),
            Entity::Item(item) => Some(item.object()),
            _ => Container::from_entity(entity).map(Container::object),
        }
    }

    fn reference(&self) -> &Reference {
        Object::reference(self)
    }
}

impl EntityType for Container {
    const KIND_NAME: &'static str = "Container";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Container(container) => Some(container),
            _ => Actor::from_entity(entity).map(Actor::container),
        }
    }

    fn reference(&self) -> &Reference {
        self.object().reference()
    }
}

impl EntityType for Actor {
    const KIND_NAME: &'static str = "Actor";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Actor(actor) => Some(actor),
            Entity::Player(player) => Some(player.actor()),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        self.container().object().reference()
    }
}

impl EntityType for Player {
    const KIND_NAME: &'static str = "Player";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        self.actor().container().object().reference()
    }
}

impl EntityType for Item {
    const KIND_NAME: &'static str = "Item";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Item(item) => Some(item),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        self.object().reference()
    }
}

impl EntityType for Window {
    const KIND_NAME: &'static str = "Window";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Window(window) => Some(window),
            Entity::Button(button) => Some(button.window()),
            Entity::Text(text) => Some(text.window()),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        Window::reference(self)
    }
}

impl EntityType for Button {
    const KIND_NAME: &'static str = "Button";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Button(button) => Some(button),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        self.window().reference()
    }
}

impl EntityType for Text {
    const KIND_NAME: &'static str = "Text";

    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Text(text) => Some(text),
            _ => None,
        }
    }

    fn reference(&self) -> &Reference {
        self.window().reference()
    }
}
