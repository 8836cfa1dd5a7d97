use std::cell::RefCell;

use log::debug;

use crate::world::{
    entity::{
        entity::EntityKind, error::EntityError, item::Item, network_id::NetworkId,
    },
    entity_store::EntityStore,
    template::TemplateLookup,
};

/// Result of [`ItemList::add_new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOutcome {
    /// Whether a new Item entity was created, as opposed to merging into a stack
    pub created: bool,
    /// The item now holding the added count, or `NetworkId::NONE` if nothing was added
    pub item: NetworkId,
}

/// Result of [`ItemList::remove_by_count`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// How much was actually removed; less than requested if stock ran out
    pub removed: u32,
    /// Members that were exhausted and destroyed
    pub destroyed: Vec<NetworkId>,
    /// The member whose count was reduced without being exhausted
    pub partial: Option<NetworkId>,
}

enum RemovalStep {
    Skipped,
    Reduced,
    Destroyed(u32),
}

/// Copy of the item fields carried over by [`ItemList::copy_into`].
struct ItemSnapshot {
    base_id: u32,
    name: String,
    count: u32,
    condition: f64,
    equipped: bool,
    stick: bool,
    silent: bool,
}

impl ItemSnapshot {
    fn of(item: &Item) -> Self {
        Self {
            base_id: item.reference().base(),
            name: item.object().name(),
            count: item.count(),
            condition: item.condition(),
            equipped: item.equipped(),
            stick: item.stick(),
            silent: item.silent(),
        }
    }

    fn apply(&self, item: &Item) {
        item.object().set_name(&self.name);
        item.set_count(self.count);
        item.set_condition(self.condition);
        item.set_equipped(self.equipped);
        item.set_stick(self.stick);
        item.set_silent(self.silent);
    }
}

/// The ordered set of Items owned by one container-capable entity.
///
/// An ItemList is embedded in its owning entity and is only touched while
/// that entity's lock is held; every method that reaches member Items takes
/// the store and locks each member in turn. Member ids are snapshotted
/// before the store is called, so a member destroyed mid-walk never
/// invalidates the iteration.
///
/// For every member the Item's container field equals `source`, no id is
/// listed twice, and no two members form a stack (same base id, conditions
/// within [`CONDITION_EPS`](crate::CONDITION_EPS)).
#[derive(Debug)]
pub struct ItemList {
    source: NetworkId,
    members: RefCell<Vec<NetworkId>>,
}

impl ItemList {
    pub(crate) fn new(source: NetworkId) -> Self {
        Self {
            source,
            members: RefCell::new(Vec::new()),
        }
    }

    /// The id of the owning entity.
    pub fn source(&self) -> NetworkId {
        self.source
    }

    /// Member ids in insertion order.
    pub fn members(&self) -> Vec<NetworkId> {
        self.members.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn contains(&self, id: NetworkId) -> bool {
        self.members.borrow().contains(&id)
    }

    /// Takes ownership of an existing Item.
    ///
    /// An unowned Item merges into a stackable member if there is one (the
    /// counts add up, the equipped flags are OR-ed and the incoming Item is
    /// destroyed), otherwise it joins the list. An Item already pointing at
    /// this list's source but not yet listed is re-adopted as-is, without a
    /// stack check; this is how items delivered over the network enter their
    /// container, keeping the ids the peer knows them by.
    ///
    /// Returns the member now holding the Item's count.
    pub fn add_existing(&self, store: &EntityStore, id: NetworkId) -> Result<NetworkId, EntityError> {
        store.try_operate::<Item, _>(id, |incoming| {
            let owner = incoming.container();
            if owner.is_some() {
                if owner == self.source && !self.contains(id) {
                    self.members.borrow_mut().push(id);
                    return Ok(id);
                }
                return Err(EntityError::AlreadyOwned {
                    item: id,
                    container: owner,
                });
            }

            let stack =
                self.find_stackable(store, incoming.reference().base(), incoming.condition())?;
            let Some(stack) = stack else {
                incoming.set_container(self.source);
                self.members.borrow_mut().push(id);
                return Ok(id);
            };

            let count = incoming.count();
            let equipped = incoming.equipped();
            store.try_operate::<Item, _>(stack, |target| {
                let total = stacked_count(target, count)?;
                target.set_count(total);
                if equipped {
                    target.set_equipped(true);
                }
                Ok(())
            })?;

            store.destroy(id)?;
            debug!("Item {} merged into stack {} of {}", id, stack, self.source);
            Ok(stack)
        })
    }

    /// Adds `count` of `base_id` at `condition`, merging into a matching
    /// stack when one exists and creating a new Item otherwise.
    pub fn add_new(
        &self,
        store: &EntityStore,
        base_id: u32,
        count: u32,
        condition: f64,
        silent: bool,
    ) -> Result<AddOutcome, EntityError> {
        if count == 0 {
            return Ok(AddOutcome {
                created: false,
                item: NetworkId::NONE,
            });
        }

        if let Some(stack) = self.find_stackable(store, base_id, condition)? {
            store.try_operate::<Item, _>(stack, |item| {
                let total = stacked_count(item, count)?;
                item.set_count(total);
                item.set_silent(silent);
                Ok(())
            })?;
            return Ok(AddOutcome {
                created: false,
                item: stack,
            });
        }

        let id = store.create(EntityKind::Item, base_id);
        store.operate::<Item, _>(id, |item| {
            item.set_count(count);
            item.set_condition(condition);
            item.set_silent(silent);
            item.set_container(self.source);
        })?;
        self.members.borrow_mut().push(id);

        Ok(AddOutcome {
            created: true,
            item: id,
        })
    }

    /// Detaches a member without destroying it. The Item becomes unowned.
    pub fn remove(&self, store: &EntityStore, id: NetworkId) -> Result<(), EntityError> {
        if !self.contains(id) {
            return Err(EntityError::NotFound {
                id,
                kind: "ItemList member",
            });
        }

        store.operate::<Item, _>(id, |item| item.set_container(NetworkId::NONE))?;
        self.members.borrow_mut().retain(|member| *member != id);
        Ok(())
    }

    /// Removes up to `count` units of `base_id`, walking members in order.
    /// Exhausted members are destroyed; at most one member is left reduced.
    pub fn remove_by_count(
        &self,
        store: &EntityStore,
        base_id: u32,
        count: u32,
        silent: bool,
    ) -> Result<RemoveOutcome, EntityError> {
        let mut outcome = RemoveOutcome::default();
        let walk = self.walk_removal(store, base_id, count, silent, &mut outcome);

        // exhausted members are destroyed even if the walk stopped early
        if !outcome.destroyed.is_empty() {
            self.members
                .borrow_mut()
                .retain(|member| !outcome.destroyed.contains(member));
        }

        outcome.removed = count - walk?;
        Ok(outcome)
    }

    fn walk_removal(
        &self,
        store: &EntityStore,
        base_id: u32,
        count: u32,
        silent: bool,
        outcome: &mut RemoveOutcome,
    ) -> Result<u32, EntityError> {
        let mut remaining = count;

        for id in self.members() {
            if remaining == 0 {
                break;
            }

            let step = store.try_operate::<Item, _>(id, |item| {
                if item.reference().base() != base_id {
                    return Ok(RemovalStep::Skipped);
                }

                let stock = item.count();
                if stock > remaining {
                    item.set_count(stock - remaining);
                    item.set_silent(silent);
                    return Ok(RemovalStep::Reduced);
                }

                item.set_container(NetworkId::NONE);
                store.destroy(id)?;
                Ok(RemovalStep::Destroyed(stock))
            })?;

            match step {
                RemovalStep::Skipped => {}
                RemovalStep::Reduced => {
                    outcome.partial = Some(id);
                    remaining = 0;
                }
                RemovalStep::Destroyed(stock) => {
                    outcome.destroyed.push(id);
                    remaining -= stock;
                }
            }
        }

        Ok(remaining)
    }

    /// Equips the first unequipped member of `base_id`. Returns
    /// `NetworkId::NONE` if one is already equipped or none is present.
    pub fn equip(
        &self,
        store: &EntityStore,
        base_id: u32,
        silent: bool,
        stick: bool,
    ) -> Result<NetworkId, EntityError> {
        if self.is_equipped(store, base_id)?.is_some() {
            return Ok(NetworkId::NONE);
        }

        for id in self.members() {
            let equipped = store.operate::<Item, _>(id, |item| {
                if item.reference().base() != base_id || item.equipped() {
                    return false;
                }
                item.set_equipped(true);
                item.set_silent(silent);
                item.set_stick(stick);
                true
            })?;

            if equipped {
                return Ok(id);
            }
        }

        Ok(NetworkId::NONE)
    }

    /// Unequips the equipped member of `base_id`, or returns `NetworkId::NONE`.
    pub fn unequip(
        &self,
        store: &EntityStore,
        base_id: u32,
        silent: bool,
        stick: bool,
    ) -> Result<NetworkId, EntityError> {
        let id = self.is_equipped(store, base_id)?;
        if id.is_none() {
            return Ok(id);
        }

        store.operate::<Item, _>(id, |item| {
            item.set_equipped(false);
            item.set_silent(silent);
            item.set_stick(stick);
        })?;
        Ok(id)
    }

    /// The first equipped member of `base_id`, or `NetworkId::NONE`.
    pub fn is_equipped(&self, store: &EntityStore, base_id: u32) -> Result<NetworkId, EntityError> {
        for id in self.members() {
            let equipped = store.operate::<Item, _>(id, |item| {
                item.reference().base() == base_id && item.equipped()
            })?;
            if equipped {
                return Ok(id);
            }
        }
        Ok(NetworkId::NONE)
    }

    /// Replaces the contents of `other` with fresh copies of this list's
    /// members. The caller must hold the lock of `other`'s owner.
    pub fn copy_into(&self, store: &EntityStore, other: &ItemList) -> Result<(), EntityError> {
        if other.source == self.source {
            return Ok(());
        }

        other.flush(store)?;

        for id in self.members() {
            let snapshot = store.operate::<Item, _>(id, ItemSnapshot::of)?;
            let copy = store.create(EntityKind::Item, snapshot.base_id);
            store.operate::<Item, _>(copy, |item| snapshot.apply(item))?;
            other.add_existing(store, copy)?;
        }

        Ok(())
    }

    /// Total count across members, optionally restricted to one base id.
    pub fn item_count(&self, store: &EntityStore, base_id: Option<u32>) -> Result<u32, EntityError> {
        let mut total: u32 = 0;
        for id in self.members() {
            let count = store.operate::<Item, _>(id, |item| match base_id {
                Some(base_id) if item.reference().base() != base_id => 0,
                _ => item.count(),
            })?;
            total = total.checked_add(count).ok_or_else(|| {
                EntityError::invariant(format!("item count of {} overflows", self.source))
            })?;
        }
        Ok(total)
    }

    /// Detaches and destroys every member.
    pub fn flush(&self, store: &EntityStore) -> Result<(), EntityError> {
        for id in self.members() {
            store.try_operate::<Item, _>(id, |item| {
                item.set_container(NetworkId::NONE);
                store.destroy(id)
            })?;
            self.members.borrow_mut().retain(|member| *member != id);
        }
        Ok(())
    }

    /// Members whose base template belongs to `category`.
    pub fn items_of_category(
        &self,
        store: &EntityStore,
        templates: &dyn TemplateLookup,
        category: &str,
    ) -> Result<Vec<NetworkId>, EntityError> {
        let mut items = Vec::new();
        for id in self.members() {
            let base_id = store.operate::<Item, _>(id, |item| item.reference().base())?;
            if templates.lookup(base_id, category).is_some() {
                items.push(id);
            }
        }
        Ok(items)
    }

    fn find_stackable(
        &self,
        store: &EntityStore,
        base_id: u32,
        condition: f64,
    ) -> Result<Option<NetworkId>, EntityError> {
        for id in self.members() {
            if store.operate::<Item, _>(id, |item| item.stacks_with(base_id, condition))? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

fn stacked_count(item: &Item, added: u32) -> Result<u32, EntityError> {
    item.count().checked_add(added).ok_or_else(|| {
        EntityError::invariant(format!(
            "count of Item {} overflows when stacking {}",
            item.reference().network_id(),
            added
        ))
    })
}
