/// Entity packets and installing entities received from the remote peer

use std::thread;

use vault_shared::{
    Button, Container, Entity, EntityError, EntityKind, EntityStore, Game, HostType, Item,
    NetworkId, Object, Player, SerdeErr, StoreConfig, Text, Window, WindowPosition, WIRE_VERSION,
};
use vault_test::{members_of, ContainerBuilder};

fn client_store() -> EntityStore {
    EntityStore::new(StoreConfig::client(Game::NewVegas))
}

fn packet_of(store: &EntityStore, id: NetworkId) -> Vec<u8> {
    store
        .operate::<Entity, _>(id, |entity| entity.to_wire())
        .unwrap()
}

#[test]
fn packet_starts_with_version_and_kind() {
    let store = EntityStore::default();
    let id = store.create(EntityKind::Button, 0);

    let packet = packet_of(&store, id);

    assert_eq!(packet[0], WIRE_VERSION);
    assert_eq!(packet[1], EntityKind::Button as u8);
}

#[test]
fn item_fields_survive_the_wire() {
    let store = EntityStore::default();
    let container = ContainerBuilder::new()
        .with_items_at(0x0000_4344, 3, 62.5)
        .build(&store);
    let item = members_of(&store, container)[0];
    store
        .operate::<Item, _>(item, |item| {
            item.set_equipped(true);
            item.object().set_name("Laser Rifle");
            item.object().set_position([10.0, -4.5, 128.0]);
        })
        .unwrap();

    let decoded = Entity::from_wire(&packet_of(&store, item)).unwrap();

    assert_eq!(decoded.kind(), EntityKind::Item);
    assert_eq!(decoded.network_id(), item);
    let decoded = decoded.get::<Item>().unwrap();
    assert_eq!(decoded.container(), container);
    assert_eq!(decoded.count(), 3);
    assert_eq!(decoded.condition(), 62.5);
    assert!(decoded.equipped());
    assert_eq!(decoded.object().name(), "Laser Rifle");
    assert_eq!(decoded.object().position(), [10.0, -4.5, 128.0]);
    assert_eq!(decoded.reference().base(), 0x0000_4344);
    assert!(!decoded.reference().changed());
}

#[test]
fn player_controls_survive_the_wire() {
    let store = EntityStore::default();
    let player = store.create_with_reference(EntityKind::Player, 0xFF00_0C01, 0x0000_0007);
    store
        .operate::<Player, _>(player, |player| {
            player.set_control(3, 0x1E);
            player.set_control_enabled(7, false);
            player.actor().set_sneaking(true);
        })
        .unwrap();

    let decoded = Entity::from_wire(&packet_of(&store, player)).unwrap();
    let decoded = decoded.get::<Player>().unwrap();

    assert_eq!(decoded.control(3), Some(0x1E));
    assert_eq!(decoded.control_enabled(3), Some(true));
    assert_eq!(decoded.control_enabled(7), Some(false));
    assert_eq!(decoded.control(9), None);
    assert!(decoded.actor().sneaking());
    assert_eq!(decoded.reference().reference(), 0xFF00_0C01);
}

#[test]
fn window_hierarchy_survives_the_wire() {
    let store = EntityStore::default();
    let window = store.create(EntityKind::Window, 0);
    let button = store.create(EntityKind::Button, 0);
    let text = store.create(EntityKind::Text, 0);

    store
        .operate::<Button, _>(button, |button| {
            button.window().set_parent(window);
            button.window().set_label(Button::CLOSE_BUTTON);
            button.window().set_position(WindowPosition {
                x: 0.9,
                y: 0.05,
                offset_x: -12.0,
                offset_y: 4.0,
            });
        })
        .unwrap();
    store
        .operate::<Text, _>(text, |text| {
            text.window().set_parent(window);
            text.window().set_text("Welcome to the wasteland");
            text.window().set_locked(true);
        })
        .unwrap();

    let decoded_button = Entity::from_wire(&packet_of(&store, button)).unwrap();
    let decoded_button = decoded_button.get::<Button>().unwrap();
    assert!(decoded_button.is_close_button());
    assert_eq!(decoded_button.window().parent(), window);
    assert_eq!(decoded_button.window().position().offset_x, -12.0);

    let decoded_text = Entity::from_wire(&packet_of(&store, text)).unwrap();
    assert!(decoded_text.get::<Button>().is_none());
    let decoded_text = decoded_text.get::<Window>().unwrap();
    assert_eq!(decoded_text.text(), "Welcome to the wasteland");
    assert!(decoded_text.locked());
    assert!(decoded_text.visible());
}

#[test]
fn remote_container_and_items_are_reassembled() {
    let server = EntityStore::default();
    let container = ContainerBuilder::new()
        .kind(EntityKind::Actor)
        .with_items(0x0000_000F, 120)
        .with_items(0x0001_5169, 2)
        .build(&server);
    let items = members_of(&server, container);

    let client = client_store();
    assert_eq!(client.insert_packet(&packet_of(&server, container)), Ok(container));
    for item in &items {
        assert_eq!(client.insert_packet(&packet_of(&server, *item)), Ok(*item));
    }

    assert_eq!(members_of(&client, container), items);
    assert_eq!(client.kind_of(container), Some(EntityKind::Actor));
    let count = client
        .try_operate::<Container, _>(container, |container| {
            container.item_list().item_count(&client, None)
        })
        .unwrap();
    assert_eq!(count, 122);

    let local = client.create(EntityKind::Object, 0);
    assert_eq!(local.host_type(), HostType::Client);
    assert!(!items.contains(&local));
    assert_ne!(local, container);
}

#[test]
fn local_entities_do_not_block_server_ids() {
    let client = client_store();
    let window = client.create(EntityKind::Window, 0);

    let server = EntityStore::default();
    let container = server.create(EntityKind::Container, 0x0000_0100);
    assert_eq!(container, NetworkId::from_u64(1));

    assert_eq!(client.insert_packet(&packet_of(&server, container)), Ok(container));
    assert_eq!(client.kind_of(window), Some(EntityKind::Window));
    assert_eq!(client.kind_of(container), Some(EntityKind::Container));

    // and the other way around
    assert_eq!(server.insert_packet(&packet_of(&client, window)), Ok(window));
    assert_eq!(server.len(), 2);
}

#[test]
fn create_skips_ids_claimed_by_concurrent_inserts() {
    let source = EntityStore::default();
    let packets: Vec<Vec<u8>> = (0..64)
        .map(|_| {
            let id = source.create(EntityKind::Object, 0);
            packet_of(&source, id)
        })
        .collect();

    let store = EntityStore::default();
    let (inserted, created) = thread::scope(|scope| {
        let inserter = scope.spawn(|| {
            let mut inserted = 0;
            for packet in &packets {
                match store.insert_packet(packet) {
                    Ok(_) => inserted += 1,
                    // a create got there first
                    Err(error) => assert!(matches!(error, EntityError::AlreadyExists { .. })),
                }
            }
            inserted
        });
        let creator = scope.spawn(|| {
            (0..64)
                .map(|_| store.create(EntityKind::Object, 0))
                .collect::<Vec<_>>()
        });
        (inserter.join().unwrap(), creator.join().unwrap())
    });

    assert_eq!(created.len(), 64);
    assert_eq!(store.len(), 64 + inserted);
    for id in &created {
        assert_eq!(store.kind_of(*id), Some(EntityKind::Object));
    }
    let mut unique = created.clone();
    unique.dedup();
    assert_eq!(unique.len(), created.len());
}

#[test]
fn remote_entity_with_live_id_is_rejected() {
    let store = EntityStore::default();
    let id = store.create(EntityKind::Object, 0);
    store
        .operate::<Object, _>(id, |object| object.set_name("original"))
        .unwrap();

    let result = store.insert_packet(&packet_of(&store, id));

    assert_eq!(result, Err(EntityError::AlreadyExists { id }));
    let name = store.operate::<Object, _>(id, |object| object.name()).unwrap();
    assert_eq!(name, "original");
}

#[test]
fn remote_item_with_unknown_container_is_dropped() {
    let server = EntityStore::default();
    let container = ContainerBuilder::new().with_items(0x0000_000F, 5).build(&server);
    let item = members_of(&server, container)[0];

    let client = client_store();
    let result = client.insert_packet(&packet_of(&server, item));

    assert_eq!(
        result,
        Err(EntityError::NotFound {
            id: container,
            kind: "Container"
        })
    );
    assert!(!client.contains(item));
    assert!(client.is_empty());
}

#[test]
fn truncated_packet_is_malformed() {
    let store = EntityStore::default();
    let id = store.create(EntityKind::Actor, 0);
    let packet = packet_of(&store, id);

    let remote = client_store();
    let result = remote.insert_packet(&packet[..packet.len() / 2]);

    assert!(matches!(
        result,
        Err(EntityError::Malformed(SerdeErr::UnexpectedEnd { .. }))
    ));
    assert!(remote.is_empty());
}
