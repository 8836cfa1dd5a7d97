use std::{
    cell::Cell,
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, info, warn};

use crate::world::{
    change_sink::ChangeSink,
    entity::{
        container::Container,
        entity::{Entity, EntityKind, EntityType},
        error::EntityError,
        item::Item,
        network_id::{NetworkId, NetworkIdGenerator},
        reference::Reference,
    },
    lock::ReentrantLock,
    store_config::StoreConfig,
};

cfg_if! {
    if #[cfg(feature = "server")] {
        use std::collections::HashSet;

        use crate::world::{
            entity::player::Player,
            player_defaults::{default_actor_values, PlayerDefaults, DEFAULT_PLAYER_ITEMS},
        };
    }
}

struct EntitySlot {
    alive: Cell<bool>,
    entity: Entity,
}

struct StoreEntry {
    kind: EntityKind,
    slot: Arc<ReentrantLock<EntitySlot>>,
}

/// Process-wide registry of live entities, keyed by NetworkId.
///
/// Each entity sits behind its own reentrant lock: [`EntityStore::operate`]
/// runs a closure while holding it, and the same thread may nest `operate`
/// calls on the same or other entities freely. Operations on different
/// entities never wait on each other unless a closure nests into the other.
///
/// The store's own map lock is never held while a closure runs or while
/// waiting on an entity lock.
pub struct EntityStore {
    config: StoreConfig,
    id_generator: NetworkIdGenerator,
    entities: RwLock<HashMap<NetworkId, StoreEntry>>,
    #[cfg(feature = "server")]
    player_defaults: RwLock<PlayerDefaults>,
}

impl EntityStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            #[cfg(feature = "server")]
            player_defaults: RwLock::new(PlayerDefaults::new(&config)),
            id_generator: NetworkIdGenerator::new(config.host_type),
            config,
            entities: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Creation

    /// Creates a fresh entity of `kind` with a new NetworkId and no game reference.
    pub fn create(&self, kind: EntityKind, base_id: u32) -> NetworkId {
        self.create_with_reference(kind, 0, base_id)
    }

    /// Creates a fresh entity of `kind` bound to game reference `ref_id`.
    ///
    /// The id comes from this store's half of the id space. Should the peer
    /// have claimed the generated id already, the next one is used.
    pub fn create_with_reference(&self, kind: EntityKind, ref_id: u32, base_id: u32) -> NetworkId {
        let id = loop {
            let id = self.id_generator.generate();
            let entity = Entity::new(kind, id, ref_id, base_id);

            #[cfg(feature = "server")]
            self.apply_player_defaults(&entity);

            match self.register(entity) {
                Ok(()) => break id,
                Err(error) => warn!("Skipping NetworkId {}: {}", id, error),
            }
        };

        #[cfg(feature = "server")]
        self.seed_player_loadout(kind, id);

        debug!("Created {} {} (ref {:#010x}, base {:#010x})", kind.name(), id, ref_id, base_id);
        id
    }

    /// Registers an entity delivered by the remote peer under the id it
    /// carries, which normally comes from the peer's half of the id space.
    /// An Item that names a container is adopted into that container's item
    /// list; if the container is unknown nothing is kept.
    pub fn insert_remote(&self, entity: Entity) -> Result<NetworkId, EntityError> {
        let id = entity.network_id();
        if id.is_none() {
            return Err(EntityError::invariant("remote entity carries no NetworkId"));
        }

        let owner = entity
            .get::<Item>()
            .map(Item::container)
            .filter(NetworkId::is_some);
        let kind = entity.kind();

        #[cfg(feature = "server")]
        self.apply_player_defaults(&entity);

        self.register(entity)?;
        self.id_generator.reserve_past(id);

        if let Some(owner) = owner {
            let adopted = self.try_operate::<Container, _>(owner, |container| {
                container.item_list().add_existing(self, id)
            });
            if let Err(error) = adopted {
                warn!("Dropping remote Item {}: {}", id, error);
                self.discard(id);
                return Err(error);
            }
        }

        debug!("Inserted remote {} {}", kind.name(), id);
        Ok(id)
    }

    /// Decodes a wire packet and registers the result as [`insert_remote`](Self::insert_remote) does.
    pub fn insert_packet(&self, bytes: &[u8]) -> Result<NetworkId, EntityError> {
        let entity = Entity::from_wire(bytes)?;
        self.insert_remote(entity)
    }

    /// Rebinds entity `id` to another base form. A player's new base is
    /// recorded in the server's player defaults.
    pub fn set_base(&self, id: NetworkId, base_id: u32) -> Result<(), EntityError> {
        let kind = self.operate::<Entity, _>(id, |entity| {
            entity.reference().set_base(base_id);
            entity.kind()
        })?;

        #[cfg(feature = "server")]
        self.record_player_base(kind, base_id);

        debug!("Rebased {} {} onto {:#010x}", kind.name(), id, base_id);
        Ok(())
    }

    // Access

    /// Runs `operation` on entity `id` viewed as `K`, holding the entity's
    /// lock for the duration. Fails with `NotFound` if `id` is not a live
    /// entity of kind `K` (or a kind derived from it).
    ///
    /// Nested calls from inside `operation` are allowed, including on `id`
    /// itself.
    pub fn operate<K: EntityType, R>(
        &self,
        id: NetworkId,
        operation: impl FnOnce(&K) -> R,
    ) -> Result<R, EntityError> {
        let not_found = EntityError::NotFound {
            id,
            kind: K::KIND_NAME,
        };

        let Some(slot) = self.slot(id) else {
            return Err(not_found);
        };
        let guard = slot.lock();
        if !guard.alive.get() {
            return Err(not_found);
        }
        let Some(entity) = K::from_entity(&guard.entity) else {
            return Err(not_found);
        };

        Ok(operation(entity))
    }

    /// Like [`operate`](Self::operate), for closures that can fail themselves.
    pub fn try_operate<K: EntityType, R>(
        &self,
        id: NetworkId,
        operation: impl FnOnce(&K) -> Result<R, EntityError>,
    ) -> Result<R, EntityError> {
        self.operate(id, operation)?
    }

    // Destruction

    /// Removes entity `id`. A container first flushes its item list,
    /// destroying every member. An Item still owned by a container must be
    /// removed from that container first.
    ///
    /// May be called from inside an `operate` on the same entity; the
    /// closure keeps its reference, but later lookups fail with `NotFound`.
    pub fn destroy(&self, id: NetworkId) -> Result<(), EntityError> {
        let Some(slot) = self.slot(id) else {
            return Err(EntityError::NotFound {
                id,
                kind: Entity::KIND_NAME,
            });
        };
        let guard = slot.lock();
        if !guard.alive.get() {
            return Err(EntityError::NotFound {
                id,
                kind: Entity::KIND_NAME,
            });
        }

        if let Some(item) = guard.entity.get::<Item>() {
            if item.container().is_some() {
                return Err(EntityError::invariant(format!(
                    "Item {} is still owned by container {}",
                    id,
                    item.container()
                )));
            }
        }
        if let Some(container) = guard.entity.as_container() {
            container.item_list().flush(self)?;
        }

        guard.alive.set(false);
        self.entities_mut().remove(&id);
        debug!("Destroyed {} {}", guard.entity.kind().name(), id);
        Ok(())
    }

    /// Destroys every live entity, containers first so that their members
    /// go with them. Returns how many entities were destroyed by this call.
    pub fn destroy_all(&self) -> Result<usize, EntityError> {
        let mut ids = self.ids();
        ids.sort_by_key(|id| (self.kind_of(*id).map(|kind| !is_container_kind(kind)), *id));

        let before = self.len();
        for id in ids {
            match self.destroy(id) {
                Ok(()) => {}
                // already gone with its container, or destroyed concurrently
                Err(EntityError::NotFound { .. }) => {
                    debug!("Entity {} vanished during destroy_all", id);
                }
                Err(error) => return Err(error),
            }
        }

        let destroyed = before.saturating_sub(self.len());
        info!("Destroyed {} entities", destroyed);
        Ok(destroyed)
    }

    // Queries

    pub fn contains(&self, id: NetworkId) -> bool {
        self.entities().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities().is_empty()
    }

    /// Snapshot of every live id, in ascending order.
    pub fn ids(&self) -> Vec<NetworkId> {
        let mut ids: Vec<NetworkId> = self.entities().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Snapshot of the live ids whose variant is exactly `kind`.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<NetworkId> {
        let mut ids: Vec<NetworkId> = self
            .entities()
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn kind_of(&self, id: NetworkId) -> Option<EntityKind> {
        self.entities().get(&id).map(|entry| entry.kind)
    }

    /// The live entity bound to game reference `ref_id`, if any.
    pub fn find_by_reference(&self, ref_id: u32) -> Option<NetworkId> {
        if ref_id == 0 {
            return None;
        }
        self.ids().into_iter().find(|id| {
            self.operate::<Reference, _>(*id, |reference| reference.reference() == ref_id)
                .unwrap_or(false)
        })
    }

    // Change tracking

    /// Hands a packet for every changed entity to `sink` and clears the
    /// changed flags. Entities are visited in ascending id order, and the
    /// sink is called without any entity lock held.
    pub fn collect_changes(&self, sink: &mut dyn ChangeSink) -> Result<usize, EntityError> {
        let mut collected = 0;

        for id in self.ids() {
            let change = self.operate::<Entity, _>(id, |entity| {
                let reference = entity.reference();
                if !reference.changed() {
                    return None;
                }
                let packet = entity.to_wire();
                reference.clear_changed();
                Some((entity.kind(), packet))
            });

            match change {
                Ok(Some((kind, packet))) => {
                    sink.entity_changed(id, kind, packet);
                    collected += 1;
                }
                Ok(None) => {}
                Err(EntityError::NotFound { .. }) => {
                    debug!("Entity {} destroyed before its changes were collected", id);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(collected)
    }

    // Internal

    fn entities(&self) -> RwLockReadGuard<'_, HashMap<NetworkId, StoreEntry>> {
        let Ok(entities) = self.entities.read() else {
            panic!("EntityStore map lock is poisoned");
        };
        entities
    }

    fn entities_mut(&self) -> RwLockWriteGuard<'_, HashMap<NetworkId, StoreEntry>> {
        let Ok(entities) = self.entities.write() else {
            panic!("EntityStore map lock is poisoned");
        };
        entities
    }

    fn slot(&self, id: NetworkId) -> Option<Arc<ReentrantLock<EntitySlot>>> {
        self.entities().get(&id).map(|entry| entry.slot.clone())
    }

    fn register(&self, entity: Entity) -> Result<(), EntityError> {
        let id = entity.network_id();
        let mut entities = self.entities_mut();
        if entities.contains_key(&id) {
            return Err(EntityError::AlreadyExists { id });
        }

        entities.insert(
            id,
            StoreEntry {
                kind: entity.kind(),
                slot: Arc::new(ReentrantLock::new(EntitySlot {
                    alive: Cell::new(true),
                    entity,
                })),
            },
        );
        Ok(())
    }

    /// Drops an entity without running any destroy logic.
    fn discard(&self, id: NetworkId) {
        if let Some(slot) = self.slot(id) {
            let guard = slot.lock();
            guard.alive.set(false);
            self.entities_mut().remove(&id);
        }
    }
}

fn is_container_kind(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Container | EntityKind::Actor | EntityKind::Player
    )
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

cfg_if! {
    if #[cfg(feature = "server")] {
        impl EntityStore {
            /// Process-wide player settings.
            pub fn player_defaults(&self) -> PlayerDefaults {
                self.player_defaults_ref().clone()
            }

            pub fn player_respawn(&self) -> u32 {
                self.player_defaults_ref().respawn()
            }

            pub fn player_spawn_cell(&self) -> u32 {
                self.player_defaults_ref().spawn_cell()
            }

            /// Every base id a player has been created with or rebased to.
            pub fn player_base_ids(&self) -> HashSet<u32> {
                self.player_defaults_ref().base_ids().clone()
            }

            /// Changes the respawn delay given to players created from now on.
            pub fn set_player_respawn(&self, respawn: u32) {
                self.player_defaults_mut().set_respawn(respawn);
            }

            /// Changes the spawn cell given to players created from now on.
            pub fn set_player_spawn_cell(&self, cell: u32) {
                self.player_defaults_mut().set_spawn_cell(cell);
            }

            fn apply_player_defaults(&self, entity: &Entity) {
                let Some(player) = entity.get::<Player>() else {
                    return;
                };
                let mut defaults = self.player_defaults_mut();
                defaults.register_base(player.reference().base());
                player.init_defaults(defaults.respawn(), defaults.spawn_cell());
            }

            fn record_player_base(&self, kind: EntityKind, base_id: u32) {
                if kind == EntityKind::Player {
                    self.player_defaults_mut().register_base(base_id);
                }
            }

            /// Gives a newly created player the actor values of the configured
            /// game and the default items. Seeded state counts as the initial
            /// state, so nothing is marked changed.
            fn seed_player_loadout(&self, kind: EntityKind, id: NetworkId) {
                if kind != EntityKind::Player {
                    return;
                }
                let seeded = self.try_operate::<Player, _>(id, |player| {
                    for (index, value) in default_actor_values(self.config.game) {
                        player.actor().init_actor_value(*index, *value);
                    }

                    let item_list = player.actor().container().item_list();
                    for default in DEFAULT_PLAYER_ITEMS.iter() {
                        let outcome = item_list.add_new(
                            self,
                            default.base_id,
                            default.count,
                            default.condition,
                            default.silent,
                        )?;
                        self.operate::<Item, _>(outcome.item, |item| {
                            item.set_equipped(default.equipped);
                            item.set_stick(default.stick);
                            item.reference().clear_changed();
                        })?;
                    }
                    Ok(())
                });

                if let Err(error) = seeded {
                    warn!("Player {} keeps a partial loadout: {}", id, error);
                }
            }

            fn player_defaults_ref(&self) -> RwLockReadGuard<'_, PlayerDefaults> {
                let Ok(defaults) = self.player_defaults.read() else {
                    panic!("EntityStore player defaults lock is poisoned");
                };
                defaults
            }

            fn player_defaults_mut(&self) -> RwLockWriteGuard<'_, PlayerDefaults> {
                let Ok(defaults) = self.player_defaults.write() else {
                    panic!("EntityStore player defaults lock is poisoned");
                };
                defaults
            }
        }
    }
}
