//! # Vault Shared
//! Entity store, entity kinds and container logic shared between the vault
//! server & client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use vault_serde::{
    BitReader, BitWrite, BitWriter, Serde, SerdeErr, UnsignedVariableInteger,
};

mod types;
mod world;

pub use types::{Game, HostType};
pub use world::{
    change_sink::ChangeSink,
    entity::{
        actor::Actor,
        container::Container,
        entity::{Entity, EntityKind, EntityType, WIRE_VERSION},
        error::EntityError,
        item::{conditions_match, Item, CONDITION_EPS},
        network_id::{NetworkId, NetworkIdGenerator},
        object::Object,
        player::{Player, PlayerControl},
        reference::Reference,
        window::{Button, Text, Window, WindowPosition, WindowSize},
    },
    entity_store::EntityStore,
    item_list::{AddOutcome, ItemList, RemoveOutcome},
    lock::{ReentrantLock, ReentrantLockGuard},
    store_config::StoreConfig,
    template::{TemplateLookup, TemplateRecord},
};

cfg_if! {
    if #[cfg(feature = "server")] {
        pub use world::player_defaults::{
            default_actor_values, DefaultItem, PlayerDefaults, DEFAULT_PLAYER_ITEMS,
            DEFAULT_PLAYER_RESPAWN,
        };
    }
}
