/// Stacking behaviour of container item lists

use vault_shared::{
    AddOutcome, Container, EntityError, EntityKind, EntityStore, Item, NetworkId,
};
use vault_test::{assert_destroyed, assert_stacking_invariant, members_of, ContainerBuilder, TestTemplates};

const STIMPAK: u32 = 0x0001_5169;
const CAPS: u32 = 0x0000_000F;
const LASER_RIFLE: u32 = 0x0000_4344;

fn add_new(
    store: &EntityStore,
    container: NetworkId,
    base_id: u32,
    count: u32,
    condition: f64,
) -> Result<AddOutcome, EntityError> {
    store.try_operate::<Container, _>(container, |container| {
        container
            .item_list()
            .add_new(store, base_id, count, condition, false)
    })
}

fn add_existing(
    store: &EntityStore,
    container: NetworkId,
    item: NetworkId,
) -> Result<NetworkId, EntityError> {
    store.try_operate::<Container, _>(container, |container| {
        container.item_list().add_existing(store, item)
    })
}

fn count_of(store: &EntityStore, item: NetworkId) -> u32 {
    store.operate::<Item, _>(item, |item| item.count()).unwrap()
}

fn free_item(store: &EntityStore, base_id: u32, count: u32) -> NetworkId {
    let id = store.create(EntityKind::Item, base_id);
    store
        .operate::<Item, _>(id, |item| item.set_count(count))
        .unwrap();
    id
}

#[test]
fn add_new_merges_into_matching_stack() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Container, 0);

    let first = add_new(&store, container, STIMPAK, 5, 100.0).unwrap();
    assert!(first.created);

    // within the condition tolerance
    let second = add_new(&store, container, STIMPAK, 3, 100.005).unwrap();
    assert_eq!(
        second,
        AddOutcome {
            created: false,
            item: first.item
        }
    );

    assert_eq!(count_of(&store, first.item), 8);
    assert_eq!(members_of(&store, container), vec![first.item]);
    assert_stacking_invariant!(&store, container);
}

#[test]
fn add_new_keeps_different_conditions_apart() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Container, 0);

    let pristine = add_new(&store, container, LASER_RIFLE, 1, 100.0).unwrap();
    let damaged = add_new(&store, container, LASER_RIFLE, 1, 50.0).unwrap();

    assert!(pristine.created);
    assert!(damaged.created);
    assert_ne!(pristine.item, damaged.item);
    assert_eq!(
        members_of(&store, container),
        vec![pristine.item, damaged.item]
    );
    assert_stacking_invariant!(&store, container);
}

#[test]
fn add_new_with_zero_count_is_a_no_op() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Container, 0);

    let outcome = add_new(&store, container, CAPS, 0, 100.0).unwrap();

    assert_eq!(
        outcome,
        AddOutcome {
            created: false,
            item: NetworkId::NONE
        }
    );
    assert!(members_of(&store, container).is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn new_item_points_at_its_container() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Actor, 0);

    let outcome = add_new(&store, container, CAPS, 25, 100.0).unwrap();

    let (owner, count, condition) = store
        .operate::<Item, _>(outcome.item, |item| {
            (item.container(), item.count(), item.condition())
        })
        .unwrap();
    assert_eq!(owner, container);
    assert_eq!(count, 25);
    assert_eq!(condition, 100.0);
}

#[test]
fn add_existing_adopts_unowned_item() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Container, 0);
    let item = free_item(&store, STIMPAK, 2);

    let result = add_existing(&store, container, item);

    assert_eq!(result, Ok(item));
    assert_eq!(members_of(&store, container), vec![item]);
    let owner = store.operate::<Item, _>(item, |item| item.container()).unwrap();
    assert_eq!(owner, container);
}

#[test]
fn add_existing_merges_and_destroys_the_incoming_item() {
    let store = EntityStore::default();
    let container = ContainerBuilder::new().with_items(STIMPAK, 2).build(&store);
    let stack = members_of(&store, container)[0];

    let incoming = free_item(&store, STIMPAK, 3);
    store
        .operate::<Item, _>(incoming, |item| item.set_equipped(true))
        .unwrap();

    let result = add_existing(&store, container, incoming);

    assert_eq!(result, Ok(stack));
    assert_destroyed!(store, incoming);
    let (count, equipped) = store
        .operate::<Item, _>(stack, |item| (item.count(), item.equipped()))
        .unwrap();
    assert_eq!(count, 5);
    assert!(equipped);
    assert_eq!(members_of(&store, container), vec![stack]);
}

#[test]
fn add_existing_rejects_item_owned_elsewhere() {
    let store = EntityStore::default();
    let owner = ContainerBuilder::new().with_items(CAPS, 10).build(&store);
    let other = store.create(EntityKind::Container, 0);
    let item = members_of(&store, owner)[0];

    let result = add_existing(&store, other, item);

    assert_eq!(
        result,
        Err(EntityError::AlreadyOwned {
            item,
            container: owner
        })
    );
    assert!(members_of(&store, other).is_empty());
    assert_eq!(members_of(&store, owner), vec![item]);
}

#[test]
fn add_existing_rejects_item_already_listed() {
    let store = EntityStore::default();
    let container = ContainerBuilder::new().with_items(CAPS, 10).build(&store);
    let item = members_of(&store, container)[0];

    let result = add_existing(&store, container, item);

    assert_eq!(
        result,
        Err(EntityError::AlreadyOwned { item, container })
    );
    assert_eq!(members_of(&store, container), vec![item]);
}

#[test]
fn add_existing_of_non_item_is_not_found() {
    let store = EntityStore::default();
    let container = store.create(EntityKind::Container, 0);
    let object = store.create(EntityKind::Object, 0);

    let result = add_existing(&store, container, object);

    assert_eq!(
        result,
        Err(EntityError::NotFound {
            id: object,
            kind: "Item"
        })
    );
}

#[test]
fn count_overflow_is_rejected_before_mutation() {
    let store = EntityStore::default();
    let container = ContainerBuilder::new().with_items(CAPS, u32::MAX).build(&store);
    let stack = members_of(&store, container)[0];

    let result = add_new(&store, container, CAPS, 1, 100.0);

    assert!(matches!(result, Err(EntityError::InvariantViolation { .. })));
    assert_eq!(count_of(&store, stack), u32::MAX);
}

#[test]
fn item_count_totals_members() {
    let store = EntityStore::default();
    let container = ContainerBuilder::new()
        .with_items(STIMPAK, 4)
        .with_items_at(LASER_RIFLE, 1, 100.0)
        .with_items_at(LASER_RIFLE, 2, 35.0)
        .build(&store);

    let (all, rifles, missing) = store
        .try_operate::<Container, _>(container, |container| {
            let list = container.item_list();
            Ok((
                list.item_count(&store, None)?,
                list.item_count(&store, Some(LASER_RIFLE))?,
                list.item_count(&store, Some(CAPS))?,
            ))
        })
        .unwrap();

    assert_eq!(all, 7);
    assert_eq!(rifles, 3);
    assert_eq!(missing, 0);
}

#[test]
fn items_of_category_filters_by_template() {
    let store = EntityStore::default();
    let templates = TestTemplates::new()
        .with(STIMPAK, "ALCH", "Stimpak")
        .with(LASER_RIFLE, "WEAP", "Laser Rifle");
    let container = ContainerBuilder::new()
        .with_items(STIMPAK, 4)
        .with_items(LASER_RIFLE, 1)
        .with_items(CAPS, 100)
        .build(&store);

    let weapons = store
        .try_operate::<Container, _>(container, |container| {
            container
                .item_list()
                .items_of_category(&store, &templates, "WEAP")
        })
        .unwrap();

    assert_eq!(weapons.len(), 1);
    let base = store
        .operate::<Item, _>(weapons[0], |item| item.reference().base())
        .unwrap();
    assert_eq!(base, LASER_RIFLE);
}
