/// PROPERTY-BASED TESTS: container stacking invariants
///
/// Random sequences of new items, adopted free items and removals must keep:
/// 1. every member pointing at its container, listed once, never stackable with another
/// 2. the per-base total equal to what was added minus what was removed

use std::collections::HashMap;

use proptest::prelude::*;
use vault_shared::{Container, EntityKind, EntityStore, Item, NetworkId};
use vault_test::check_stacking_invariant;

#[derive(Clone, Debug)]
enum Operation {
    Add { base_id: u32, count: u32, condition: f64 },
    AddExisting { base_id: u32, count: u32, condition: f64 },
    Remove { base_id: u32, count: u32 },
}

fn condition_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(100.0), Just(100.004), Just(50.0), Just(12.5)]
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let base = 1u32..4u32;
    prop_oneof![
        (base.clone(), 0u32..50u32, condition_strategy()).prop_map(|(base_id, count, condition)| {
            Operation::Add {
                base_id,
                count,
                condition,
            }
        }),
        (base.clone(), 1u32..50u32, condition_strategy()).prop_map(|(base_id, count, condition)| {
            Operation::AddExisting {
                base_id,
                count,
                condition,
            }
        }),
        (base, 0u32..60u32).prop_map(|(base_id, count)| Operation::Remove { base_id, count }),
    ]
}

fn total_of(store: &EntityStore, container: NetworkId, base_id: u32) -> u32 {
    store
        .try_operate::<Container, _>(container, |container| {
            container.item_list().item_count(store, Some(base_id))
        })
        .unwrap()
}

proptest! {
    /// Test that no sequence of additions, adoptions and removals breaks the stacking invariant
    #[test]
    fn prop_operations_preserve_stacking(operations in prop::collection::vec(operation_strategy(), 1..40)) {
        let store = EntityStore::default();
        let container = store.create(EntityKind::Container, 0);
        let mut expected: HashMap<u32, u32> = HashMap::new();

        for operation in operations {
            match operation {
                Operation::Add { base_id, count, condition } => {
                    let outcome = store
                        .try_operate::<Container, _>(container, |container| {
                            container.item_list().add_new(&store, base_id, count, condition, false)
                        })
                        .unwrap();
                    prop_assert_eq!(outcome.item.is_none(), count == 0);
                    *expected.entry(base_id).or_default() += count;
                }
                Operation::AddExisting { base_id, count, condition } => {
                    let free = store.create(EntityKind::Item, base_id);
                    store
                        .operate::<Item, _>(free, |item| {
                            item.set_count(count);
                            item.set_condition(condition);
                        })
                        .unwrap();

                    let holder = store
                        .try_operate::<Container, _>(container, |container| {
                            container.item_list().add_existing(&store, free)
                        })
                        .unwrap();
                    if holder != free {
                        prop_assert!(!store.contains(free));
                    }
                    *expected.entry(base_id).or_default() += count;
                }
                Operation::Remove { base_id, count } => {
                    let outcome = store
                        .try_operate::<Container, _>(container, |container| {
                            container.item_list().remove_by_count(&store, base_id, count, false)
                        })
                        .unwrap();
                    let stock = expected.entry(base_id).or_default();
                    prop_assert_eq!(outcome.removed, count.min(*stock));
                    *stock -= outcome.removed;
                    for destroyed in &outcome.destroyed {
                        prop_assert!(!store.contains(*destroyed));
                    }
                }
            }

            prop_assert_eq!(check_stacking_invariant(&store, container), Ok(()));
        }

        for (base_id, count) in expected {
            prop_assert_eq!(total_of(&store, container, base_id), count);
        }
    }

    /// Test that destroying a filled container leaves nothing behind
    #[test]
    fn prop_container_destroy_takes_members(counts in prop::collection::vec(1u32..20u32, 0..10)) {
        let store = EntityStore::default();
        let container = store.create(EntityKind::Container, 0);

        for (index, count) in counts.iter().enumerate() {
            store
                .try_operate::<Container, _>(container, |container| {
                    container.item_list().add_new(&store, index as u32, *count, 100.0, false)
                })
                .unwrap();
        }
        prop_assert_eq!(store.len(), counts.len() + 1);

        store.destroy(container).unwrap();
        prop_assert!(store.is_empty());
    }
}
