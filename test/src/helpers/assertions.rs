use std::collections::HashSet;

use vault_shared::{conditions_match, Container, EntityStore, Item, NetworkId};

/// Member ids of container `id`, panicking if it is not a live container
pub fn members_of(store: &EntityStore, id: NetworkId) -> Vec<NetworkId> {
    store
        .operate::<Container, _>(id, |container| container.item_list().members())
        .expect("container should exist")
}

/// Verify every member points back at its container, no id is listed twice
/// and no two members form a stack
pub fn check_stacking_invariant(store: &EntityStore, id: NetworkId) -> Result<(), String> {
    let members = members_of(store, id);

    let unique: HashSet<NetworkId> = members.iter().copied().collect();
    if unique.len() != members.len() {
        return Err(format!("container {} lists a member twice: {:?}", id, members));
    }

    let mut stacks: Vec<(NetworkId, u32, f64)> = Vec::new();
    for member in members {
        let (owner, base_id, condition, count) = store
            .operate::<Item, _>(member, |item| {
                (
                    item.container(),
                    item.reference().base(),
                    item.condition(),
                    item.count(),
                )
            })
            .map_err(|error| format!("member {} is not a live item: {}", member, error))?;

        if owner != id {
            return Err(format!("member {} points at {} instead of {}", member, owner, id));
        }
        if count == 0 {
            return Err(format!("member {} has a zero count", member));
        }
        if let Some((other, _, _)) = stacks.iter().find(|(_, other_base, other_condition)| {
            *other_base == base_id && conditions_match(*other_condition, condition)
        }) {
            return Err(format!("members {} and {} should have stacked", other, member));
        }
        stacks.push((member, base_id, condition));
    }

    Ok(())
}

/// Assert that a container satisfies the stacking invariant
#[macro_export]
macro_rules! assert_stacking_invariant {
    ($store:expr, $container:expr) => {
        if let Err(problem) = $crate::check_stacking_invariant($store, $container) {
            panic!("Stacking invariant violated: {}", problem);
        }
    };
}

/// Assert that an entity is no longer reachable through the store
#[macro_export]
macro_rules! assert_destroyed {
    ($store:expr, $id:expr) => {
        assert!(
            !$store.contains($id),
            "Entity {} should have been destroyed",
            $id
        );
    };
}
